use std::path::Path;

use pinboard_core::models::StagedFile;

use crate::commands::common::{load_config, require_session, upload_screen};
use crate::error::CliError;

pub async fn run_upload(file: &Path) -> Result<(), CliError> {
    let config = load_config()?;
    require_session(&config).await?;
    let mut screen = upload_screen(&config)?;

    screen.stage(StagedFile::from_path(file)?);
    screen.upload().await?;

    // A successful upload always resolves the key and URL.
    let state = screen.state();
    if let Some(key) = state.key.as_deref() {
        println!("{key}");
    }
    if let Some(url) = state.url.as_deref() {
        println!("{url}");
    }
    Ok(())
}

pub async fn run_remove(key: &str) -> Result<(), CliError> {
    let config = load_config()?;
    require_session(&config).await?;
    let mut screen = upload_screen(&config)?;

    screen.set_key(key);
    screen.remove().await?;

    println!("Removed {key}");
    Ok(())
}
