//! Screen controllers holding the app's client-side state.

mod notes;
mod upload;

pub use notes::NotesScreen;
pub use upload::UploadScreen;
