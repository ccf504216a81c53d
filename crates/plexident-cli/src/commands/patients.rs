// `plexident patients` — patient records.

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use colored::Colorize;
use plexident_client::PatientCreate;

use super::client;

#[derive(Subcommand)]
pub enum PatientsCommand {
    /// List patients
    List(ListArgs),

    /// Register a patient
    Create(CreateArgs),

    /// Delete a patient record
    Delete(DeleteArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Include inactive records
    #[arg(long)]
    all: bool,

    /// API server URL (overrides PLEXIDENT_API_URL)
    #[arg(long)]
    base_url: Option<String>,
}

#[derive(Args)]
pub struct CreateArgs {
    #[arg(long)]
    nombres: String,

    #[arg(long)]
    apellidos: String,

    #[arg(long)]
    cedula: Option<String>,

    #[arg(long)]
    telefono: Option<String>,

    #[arg(long)]
    correo: Option<String>,

    /// Birth date, YYYY-MM-DD
    #[arg(long)]
    fecha_nacimiento: Option<NaiveDate>,

    #[arg(long)]
    direccion: Option<String>,

    /// API server URL (overrides PLEXIDENT_API_URL)
    #[arg(long)]
    base_url: Option<String>,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Patient id
    id: String,

    /// Skip the confirmation prompt
    #[arg(long)]
    yes: bool,

    /// API server URL (overrides PLEXIDENT_API_URL)
    #[arg(long)]
    base_url: Option<String>,
}

pub async fn run(cmd: PatientsCommand) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        PatientsCommand::List(args) => list(args).await,
        PatientsCommand::Create(args) => create(args).await,
        PatientsCommand::Delete(args) => delete(args).await,
    }
}

async fn list(args: ListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let client = client(args.base_url);
    client.initialize().await?;

    let patients = client.list_patients().await?;
    let mut shown = 0;
    for patient in &patients {
        if !args.all && !patient.activo {
            continue;
        }
        shown += 1;
        println!(
            "{:<6} {:<30} {:<14} {}",
            patient.id,
            patient.full_name(),
            patient.cedula.as_deref().unwrap_or("-"),
            patient.telefono.as_deref().unwrap_or("-")
        );
    }
    println!(
        "{}",
        format!("{} de {} pacientes", shown, patients.len()).dimmed()
    );
    Ok(())
}

async fn create(args: CreateArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.nombres.trim().is_empty() || args.apellidos.trim().is_empty() {
        return Err("nombres y apellidos son obligatorios".into());
    }

    let client = client(args.base_url);
    client.initialize().await?;
    let patient = client
        .create_patient(&PatientCreate {
            nombres: args.nombres,
            apellidos: args.apellidos,
            cedula: args.cedula,
            telefono: args.telefono,
            correo: args.correo,
            fecha_nacimiento: args.fecha_nacimiento,
            direccion: args.direccion,
        })
        .await?;

    println!(
        "{} {} (id {})",
        "✅ Paciente registrado:".green().bold(),
        patient.full_name().bold(),
        patient.id
    );
    Ok(())
}

async fn delete(args: DeleteArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !args.yes {
        let sure = dialoguer::Confirm::new()
            .with_prompt(format!("¿Eliminar el paciente {}?", args.id))
            .default(false)
            .interact()?;

        if !sure {
            println!("Cancelado.");
            return Ok(());
        }
    }

    let client = client(args.base_url);
    client.initialize().await?;
    client.delete_patient(&args.id).await?;
    println!("Paciente {} eliminado.", args.id);
    Ok(())
}
