//! Notes screen: the list of notes plus create and delete flows.

use std::sync::Arc;

use futures::future::join_all;

use crate::api::{NoteInput, NotesApi};
use crate::models::{Note, NoteDraft, NoteId, NoteView};
use crate::storage::ObjectStore;
use crate::{Error, Result};

/// Controller for the notes list.
///
/// Holds the rendered note views and coordinates the notes API with object
/// storage. Deletion is optimistic: the note leaves the list immediately and
/// is reinstated at its old position if the remote delete fails.
pub struct NotesScreen {
    api: Arc<dyn NotesApi>,
    store: Arc<dyn ObjectStore>,
    notes: Vec<NoteView>,
    last_error: Option<String>,
}

impl NotesScreen {
    #[must_use]
    pub fn new(api: Arc<dyn NotesApi>, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            api,
            store,
            notes: Vec::new(),
            last_error: None,
        }
    }

    /// The current note views in backend order.
    #[must_use]
    pub fn notes(&self) -> &[NoteView] {
        &self.notes
    }

    /// Message from the most recent failed delete, cleared on success.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Re-fetch the note list and resolve image URLs for every note.
    ///
    /// The list is replaced wholesale. URL resolution runs concurrently and
    /// a failure for one note never fails the fetch: that note renders
    /// without an image.
    pub async fn refresh(&mut self) -> Result<()> {
        let notes = self.api.list_notes().await?;
        let this = &*self;
        let views = join_all(notes.into_iter().map(|note| this.resolve_view(note))).await;
        self.notes = views;
        Ok(())
    }

    async fn resolve_view(&self, note: Note) -> NoteView {
        let image_url = if note.has_image() {
            match self.store.retrieval_url(note.storage_key()).await {
                Ok(url) => Some(url),
                Err(error) => {
                    tracing::warn!(
                        "Failed to resolve image URL for note {}: {}",
                        note.id,
                        error
                    );
                    None
                }
            }
        } else {
            None
        };
        NoteView { note, image_url }
    }

    /// Create a note, uploading its image (if any) under the note's name.
    ///
    /// The upload happens before the record is created, so a storage failure
    /// leaves no dangling note. On success the list is refreshed from the
    /// backend.
    pub async fn create(&mut self, draft: NoteDraft) -> Result<Note> {
        let draft = draft.into_validated()?;

        let mut image_key = None;
        if let Some(staged) = &draft.image {
            self.store
                .upload(&draft.name, &staged.bytes, staged.content_type.as_deref())
                .await?;
            image_key = Some(draft.name.clone());
        }

        let created = self
            .api
            .create_note(NoteInput {
                name: draft.name,
                description: draft.description,
                image: image_key,
            })
            .await?;

        self.refresh().await?;
        Ok(created)
    }

    /// Delete a note optimistically.
    ///
    /// The note is removed from the list up front. If deleting the stored
    /// image or the remote record fails, the note is reinstated at its
    /// original position and the error is surfaced via [`last_error`].
    ///
    /// [`last_error`]: Self::last_error
    pub async fn delete(&mut self, id: &NoteId) -> Result<()> {
        let position = self
            .notes
            .iter()
            .position(|view| view.note.id == *id)
            .ok_or_else(|| Error::InvalidInput(format!("No note with id {id}")))?;
        let removed = self.notes.remove(position);

        match self.delete_remote(&removed.note).await {
            Ok(()) => {
                self.last_error = None;
                Ok(())
            }
            Err(error) => {
                self.last_error = Some(error.to_string());
                let position = position.min(self.notes.len());
                self.notes.insert(position, removed);
                Err(error)
            }
        }
    }

    async fn delete_remote(&self, note: &Note) -> Result<()> {
        if note.has_image() {
            self.store.delete(note.storage_key()).await?;
        }
        self.api.delete_note(&note.id).await
    }
}
