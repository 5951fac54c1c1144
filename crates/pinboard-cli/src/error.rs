use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] pinboard_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Note not found: {0}")]
    NoteNotFound(String),
    #[error(
        "Not signed in. Run `pinboard auth login`, or set SUPABASE_URL and SUPABASE_ANON_KEY if auth is not configured yet."
    )]
    NotSignedIn,
}
