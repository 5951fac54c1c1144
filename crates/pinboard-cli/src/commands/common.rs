use std::sync::Arc;

use pinboard_core::api::NotesApiClient;
use pinboard_core::config::AppConfig;
use pinboard_core::models::NoteView;
use pinboard_core::screens::{NotesScreen, UploadScreen};
use pinboard_core::storage::R2Storage;
use serde::Serialize;

use crate::auth::{load_stored_session, AuthService, AuthSession};
use crate::error::CliError;

pub fn load_config() -> Result<AppConfig, CliError> {
    AppConfig::from_env().map_err(CliError::Core)
}

/// Session gate: every note and storage command runs behind this.
///
/// With auth configured the stored session is restored (and refreshed when
/// stale); without auth config a still-valid stored session is accepted
/// as-is.
pub async fn require_session(config: &AppConfig) -> Result<AuthSession, CliError> {
    let session = if let Some(auth_config) = &config.auth {
        let service = AuthService::new(auth_config)
            .map_err(|error| CliError::Auth(error.to_string()))?;
        service
            .restore_session()
            .await
            .map_err(|error| CliError::Auth(error.to_string()))?
    } else {
        let stored = load_stored_session().map_err(|error| CliError::Auth(error.to_string()))?;
        stored.filter(|session| {
            if session.is_expired() {
                tracing::warn!("Stored session is expired and auth is not configured to refresh it");
                false
            } else {
                true
            }
        })
    };

    session.ok_or(CliError::NotSignedIn)
}

pub fn object_store(config: &AppConfig) -> Result<Arc<R2Storage>, CliError> {
    let r2 = config.require_r2()?;
    Ok(Arc::new(R2Storage::new(r2.clone(), config.media_url_ttl)))
}

pub fn notes_screen(config: &AppConfig, session: &AuthSession) -> Result<NotesScreen, CliError> {
    let api = NotesApiClient::new(config.require_api_url()?, session.access_token.clone())?;
    Ok(NotesScreen::new(Arc::new(api), object_store(config)?))
}

pub fn upload_screen(config: &AppConfig) -> Result<UploadScreen, CliError> {
    Ok(UploadScreen::new(object_store(config)?))
}

#[derive(Debug, Serialize)]
pub struct NoteListItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
}

pub fn note_to_list_item(view: &NoteView) -> NoteListItem {
    NoteListItem {
        id: view.note.id.to_string(),
        name: view.note.name.clone(),
        description: view.note.description.clone(),
        image_url: view.image_url.clone(),
    }
}

pub fn format_note_lines(views: &[NoteView]) -> Vec<String> {
    views
        .iter()
        .map(|view| {
            let id = view.note.id.to_string();
            match view.image_url.as_deref() {
                Some(url) => {
                    format!("{id:<26}  {:<24}  {}  {url}", view.note.name, view.note.description)
                }
                None => format!("{id:<26}  {:<24}  {}", view.note.name, view.note.description),
            }
        })
        .collect()
}
