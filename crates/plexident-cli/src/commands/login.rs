// `plexident login` — sign in and persist the session under
// ~/.plexident/.

use clap::Args;
use colored::Colorize;

use super::client;

#[derive(Args)]
pub struct LoginArgs {
    /// Username; prompted for when omitted
    #[arg(long)]
    username: Option<String>,

    /// API server URL (overrides PLEXIDENT_API_URL)
    #[arg(long)]
    base_url: Option<String>,
}

pub async fn run(args: LoginArgs) -> Result<(), Box<dyn std::error::Error>> {
    let client = client(args.base_url);

    let session = client.initialize().await?;
    if session.is_authenticated() {
        let again = dialoguer::Confirm::new()
            .with_prompt(format!(
                "Ya hay una sesión de {}. ¿Iniciar sesión de nuevo?",
                session.username().unwrap_or("?")
            ))
            .default(false)
            .interact()?;

        if !again {
            println!("Login cancelado.");
            return Ok(());
        }
    }

    let username = match args.username {
        Some(username) => username,
        None => dialoguer::Input::new()
            .with_prompt("Usuario")
            .interact_text()?,
    };
    let password = dialoguer::Password::new()
        .with_prompt("Contraseña")
        .interact()?;

    let spinner = indicatif::ProgressBar::new_spinner();
    spinner.set_message("Iniciando sesión...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));

    let result = client.sign_in(&username, &password).await;
    spinner.finish_and_clear();
    let session = result?;

    println!(
        "{} {}",
        "✅ Sesión iniciada como".green().bold(),
        session.username().unwrap_or(&username).bold()
    );
    Ok(())
}
