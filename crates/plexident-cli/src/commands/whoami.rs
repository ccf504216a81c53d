// `plexident whoami` — show the stored session. Reads local state by
// default; `--remote` fetches the record from the server instead.

use clap::Args;
use colored::Colorize;

use super::client;

#[derive(Args)]
pub struct WhoamiArgs {
    /// Verify against the server instead of reading local state
    #[arg(long)]
    remote: bool,

    /// API server URL (overrides PLEXIDENT_API_URL)
    #[arg(long)]
    base_url: Option<String>,
}

pub async fn run(args: WhoamiArgs) -> Result<(), Box<dyn std::error::Error>> {
    let client = client(args.base_url);
    let session = client.initialize().await?;

    let Some(user) = session.user else {
        println!("No hay sesión activa. Ejecuta {}.", "plexident login".bold());
        return Ok(());
    };

    let user = if args.remote { client.me().await? } else { user };

    println!("{}  {}", user.username.bold(), user.full_name());
    println!("  rol:    {}", user.rol);
    println!("  correo: {}", user.correo);
    if let Some(telefono) = &user.telefono {
        println!("  tel:    {}", telefono);
    }
    if !user.activo {
        println!("  {}", "cuenta inactiva".yellow());
    }
    Ok(())
}
