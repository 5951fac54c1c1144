//! Pinboard CLI - notes with image attachments from the command line.

mod auth;
mod cli;
mod commands;
mod error;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pinboard=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { json } => commands::list::run_list(json).await?,
        Commands::Add {
            name,
            description,
            image,
        } => commands::add::run_add(&name, &description, image.as_deref()).await?,
        Commands::Delete { id } => commands::delete::run_delete(&id).await?,
        Commands::Upload { file } => commands::image::run_upload(&file).await?,
        Commands::Remove { key } => commands::image::run_remove(&key).await?,
        Commands::Auth { command } => commands::auth_cmd::run_auth(command).await?,
        Commands::Completions { shell, output } => {
            commands::completions::run_completions(shell, output.as_deref())?;
        }
    }

    Ok(())
}
