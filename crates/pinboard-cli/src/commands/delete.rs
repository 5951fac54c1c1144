use pinboard_core::models::NoteId;

use crate::commands::common::{load_config, notes_screen, require_session};
use crate::error::CliError;

pub async fn run_delete(id: &str) -> Result<(), CliError> {
    let note_id: NoteId = id
        .parse()
        .map_err(|_| CliError::NoteNotFound(id.to_string()))?;

    let config = load_config()?;
    let session = require_session(&config).await?;
    let mut screen = notes_screen(&config, &session)?;
    screen.refresh().await?;

    if !screen
        .notes()
        .iter()
        .any(|view| view.note.id == note_id)
    {
        return Err(CliError::NoteNotFound(id.to_string()));
    }

    screen.delete(&note_id).await?;
    println!("{note_id}");
    Ok(())
}
