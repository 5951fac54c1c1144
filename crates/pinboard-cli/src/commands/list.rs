use crate::commands::common::{
    format_note_lines, load_config, note_to_list_item, notes_screen, require_session, NoteListItem,
};
use crate::error::CliError;

pub async fn run_list(as_json: bool) -> Result<(), CliError> {
    let config = load_config()?;
    let session = require_session(&config).await?;
    let mut screen = notes_screen(&config, &session)?;
    screen.refresh().await?;

    if as_json {
        let items = screen
            .notes()
            .iter()
            .map(note_to_list_item)
            .collect::<Vec<NoteListItem>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for line in format_note_lines(screen.notes()) {
            println!("{line}");
        }
    }

    Ok(())
}
