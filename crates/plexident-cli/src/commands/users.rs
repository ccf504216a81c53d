// `plexident users` — staff account management.

use clap::{Args, Subcommand};
use colored::Colorize;
use plexident_client::UserCreate;
use plexident_core::utils::generate_username;
use plexident_core::validate::{validate_user_form, FormMode, UserForm};
use plexident_core::Role;

use super::client;

#[derive(Subcommand)]
pub enum UsersCommand {
    /// List staff users
    List(ListArgs),

    /// Create a staff user
    Create(CreateArgs),

    /// Delete a staff user
    Delete(DeleteArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Include inactive accounts
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
    correo: String,

    #[arg(long)]
    telefono: String,

    /// Role: admin, odontologo or asistente
    #[arg(long)]
    rol: Role,

    /// Username; generated from the names when omitted
    #[arg(long)]
    username: Option<String>,

    /// API server URL (overrides PLEXIDENT_API_URL)
    #[arg(long)]
    base_url: Option<String>,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// User id
    id: String,

    /// Skip the confirmation prompt
    #[arg(long)]
    yes: bool,

    /// API server URL (overrides PLEXIDENT_API_URL)
    #[arg(long)]
    base_url: Option<String>,
}

pub async fn run(cmd: UsersCommand) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        UsersCommand::List(args) => list(args).await,
        UsersCommand::Create(args) => create(args).await,
        UsersCommand::Delete(args) => delete(args).await,
    }
}

async fn list(args: ListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let client = client(args.base_url);
    client.initialize().await?;

    let users = client.list_users().await?;
    let mut shown = 0;
    for user in &users {
        if !args.all && !user.activo {
            continue;
        }
        shown += 1;
        let estado = if user.activo {
            "activo".green()
        } else {
            "inactivo".yellow()
        };
        println!(
            "{:<14} {:<28} {:<12} {}",
            user.username,
            user.full_name(),
            user.rol,
            estado
        );
    }
    println!("{}", format!("{} de {} usuarios", shown, users.len()).dimmed());
    Ok(())
}

async fn create(args: CreateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let password = dialoguer::Password::new()
        .with_prompt("Contraseña")
        .with_confirmation("Confirmar contraseña", "Las contraseñas no coinciden")
        .interact()?;

    let form = UserForm {
        nombres: args.nombres.clone(),
        apellidos: args.apellidos.clone(),
        telefono: args.telefono.clone(),
        correo: args.correo.clone(),
        rol: Some(args.rol),
        password: password.clone(),
        confirm_password: password.clone(),
    };
    let errors = validate_user_form(&form, FormMode::Create);
    if !errors.is_empty() {
        for error in &errors {
            eprintln!("  {} {}", "•".red(), error);
        }
        return Err("datos inválidos".into());
    }

    let username = match args.username {
        Some(username) => username,
        None => {
            let generated = generate_username(&args.nombres, &args.apellidos);
            if generated.is_empty() {
                return Err("no se pudo generar un username; use --username".into());
            }
            generated
        }
    };

    let client = client(args.base_url);
    client.initialize().await?;
    let user = client
        .create_user(&UserCreate {
            nombres: args.nombres,
            apellidos: args.apellidos,
            telefono: Some(args.telefono),
            correo: args.correo,
            username,
            password,
            rol: args.rol,
            activo: None,
        })
        .await?;

    println!(
        "{} {} (id {})",
        "✅ Usuario creado:".green().bold(),
        user.username.bold(),
        user.id
    );
    Ok(())
}

async fn delete(args: DeleteArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !args.yes {
        let sure = dialoguer::Confirm::new()
            .with_prompt(format!("¿Eliminar el usuario {}?", args.id))
            .default(false)
            .interact()?;

        if !sure {
            println!("Cancelado.");
            return Ok(());
        }
    }

    let client = client(args.base_url);
    client.initialize().await?;
    client.delete_user(&args.id).await?;
    println!("Usuario {} eliminado.", args.id);
    Ok(())
}
