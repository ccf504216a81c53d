// `plexident logout` — clear the stored session. Local only, the
// server holds nothing to revoke.

use clap::Args;
use colored::Colorize;

use super::client;

#[derive(Args)]
pub struct LogoutArgs {
    /// API server URL (overrides PLEXIDENT_API_URL)
    #[arg(long)]
    base_url: Option<String>,
}

pub async fn run(args: LogoutArgs) -> Result<(), Box<dyn std::error::Error>> {
    let client = client(args.base_url);
    let session = client.initialize().await?;

    if !session.is_authenticated() {
        println!("No hay sesión activa.");
        return Ok(());
    }

    let username = session.username().unwrap_or("?").to_string();
    client.sign_out().await?;
    println!("{} {}", "👋 Sesión cerrada:".bold(), username);
    Ok(())
}
