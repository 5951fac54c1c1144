use pinboard_core::config::AppConfig;

use crate::auth::{clear_stored_session, load_stored_session, AuthService};
use crate::cli::AuthCommands;
use crate::error::CliError;

pub async fn run_auth(command: AuthCommands) -> Result<(), CliError> {
    match command {
        AuthCommands::Login { email, password } => {
            let service = configured_service()?;
            let session = service
                .sign_in(&email, &password)
                .await
                .map_err(|error| CliError::Auth(error.to_string()))?;
            let email_label = session.user.email.as_deref().unwrap_or("(no email)");
            println!("Signed in as {email_label}");
            Ok(())
        }
        AuthCommands::Status => {
            let config = AppConfig::from_env()?;
            let session = if let Some(auth_config) = &config.auth {
                let service = AuthService::new(auth_config)
                    .map_err(|error| CliError::Auth(error.to_string()))?;
                service
                    .restore_session()
                    .await
                    .map_err(|error| CliError::Auth(error.to_string()))?
            } else {
                load_stored_session().map_err(|error| CliError::Auth(error.to_string()))?
            };

            if let Some(session) = session {
                let email_label = session.user.email.as_deref().unwrap_or("(no email)");
                println!(
                    "Signed in as {} (expires_at={})",
                    email_label, session.expires_at
                );
            } else {
                println!("Not signed in.");
            }
            Ok(())
        }
        AuthCommands::Logout => {
            let config = AppConfig::from_env()?;
            let stored_session =
                load_stored_session().map_err(|error| CliError::Auth(error.to_string()))?;

            if let (Some(auth_config), Some(session)) = (&config.auth, stored_session) {
                let service = AuthService::new(auth_config)
                    .map_err(|error| CliError::Auth(error.to_string()))?;
                service
                    .sign_out(&session.access_token)
                    .await
                    .map_err(|error| CliError::Auth(error.to_string()))?;
            } else {
                clear_stored_session().map_err(|error| CliError::Auth(error.to_string()))?;
            }

            println!("Signed out");
            Ok(())
        }
    }
}

fn configured_service() -> Result<AuthService, CliError> {
    let config = AppConfig::from_env()?;
    let auth_config = config.auth.as_ref().ok_or_else(|| {
        CliError::Config(
            "Auth is not configured. Set SUPABASE_URL and SUPABASE_ANON_KEY.".to_string(),
        )
    })?;
    AuthService::new(auth_config).map_err(|error| CliError::Auth(error.to_string()))
}
