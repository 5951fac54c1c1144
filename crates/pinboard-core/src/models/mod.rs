//! Shared models for notes and the image-upload workflow.

mod note;
mod upload;

pub use note::{Note, NoteDraft, NoteId, NoteView};
pub use upload::{StagedFile, UploadState};
