use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "pinboard")]
#[command(about = "Notes with image attachments, from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List notes with their image URLs
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new note
    #[command(alias = "new")]
    Add {
        /// Note name
        name: String,
        /// Note description
        description: String,
        /// Optional image file to attach
        #[arg(long, value_name = "PATH")]
        image: Option<PathBuf>,
    },
    /// Delete a note and its attached image
    Delete {
        /// Note id
        id: String,
    },
    /// Upload a file to object storage and print its retrieval URL
    Upload {
        /// File to upload
        file: PathBuf,
    },
    /// Remove an uploaded object by key
    Remove {
        /// Storage key, as printed by `upload`
        key: String,
    },
    /// Manage the signed-in session
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Show the current session
    Status,
    /// Sign out and clear the stored session
    Logout,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
