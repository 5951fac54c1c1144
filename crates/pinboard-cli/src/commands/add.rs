use std::path::Path;

use pinboard_core::models::{NoteDraft, StagedFile};

use crate::commands::common::{load_config, notes_screen, require_session};
use crate::error::CliError;

pub async fn run_add(
    name: &str,
    description: &str,
    image: Option<&Path>,
) -> Result<(), CliError> {
    let config = load_config()?;
    let session = require_session(&config).await?;
    let mut screen = notes_screen(&config, &session)?;

    let staged = image.map(StagedFile::from_path).transpose()?;
    let created = screen
        .create(NoteDraft {
            name: name.to_string(),
            description: description.to_string(),
            image: staged,
        })
        .await?;

    println!("{}", created.id);
    Ok(())
}
