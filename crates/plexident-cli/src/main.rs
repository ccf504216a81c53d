use clap::{Parser, Subcommand};

mod commands;

/// Plexident CLI — manage the clinic from the terminal
#[derive(Parser)]
#[command(name = "plexident", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login(commands::login::LoginArgs),

    /// Sign out and clear the stored session
    Logout(commands::logout::LogoutArgs),

    /// Show the signed-in user
    Whoami(commands::whoami::WhoamiArgs),

    /// Manage staff users
    #[command(subcommand)]
    Users(commands::users::UsersCommand),

    /// Manage patients
    #[command(subcommand)]
    Patients(commands::patients::PatientsCommand),
}

#[tokio::main]
async fn main() {
    plexident_core::env::init_logger();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Login(args) => commands::login::run(args).await,
        Commands::Logout(args) => commands::logout::run(args).await,
        Commands::Whoami(args) => commands::whoami::run(args).await,
        Commands::Users(cmd) => commands::users::run(cmd).await,
        Commands::Patients(cmd) => commands::patients::run(cmd).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", colored::Colorize::red("error:"), e);
        std::process::exit(1);
    }
}
