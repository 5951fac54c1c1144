//! Staged files and the transient state of the image-upload screen.

use std::path::Path;

use crate::{Error, Result};

/// A locally selected file, held in memory until an explicit upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// File name as selected, before sanitization
    pub file_name: String,
    /// Declared content type, when one could be determined
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl StagedFile {
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        content_type: Option<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        }
    }

    /// Read a file from disk, guessing its content type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(ToOwned::to_owned)
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "Cannot determine a file name for {}",
                    path.display()
                ))
            })?;
        let content_type = mime_guess::from_path(path)
            .first_raw()
            .map(ToOwned::to_owned);
        let bytes = std::fs::read(path)?;
        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }
}

/// Transient state of the image-upload screen.
///
/// Nothing here outlives the screen; the backend is the only durable store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadState {
    /// File selected but not yet uploaded
    pub staged: Option<StagedFile>,
    /// Storage key of the staged or uploaded object
    pub key: Option<String>,
    /// Retrieval URL resolved after a successful upload
    pub url: Option<String>,
    /// Human-readable status line for display
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn from_path_reads_bytes_and_guesses_content_type() {
        let path = std::env::temp_dir().join(format!(
            "pinboard-staged-{}.png",
            std::process::id()
        ));
        std::fs::write(&path, b"not really a png").unwrap();

        let staged = StagedFile::from_path(&path).unwrap();
        assert_eq!(staged.bytes, b"not really a png");
        assert_eq!(staged.content_type.as_deref(), Some("image/png"));
        assert!(staged.file_name.starts_with("pinboard-staged-"));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn from_path_rejects_missing_file() {
        let path = Path::new("/definitely/not/here.png");
        assert!(StagedFile::from_path(path).is_err());
    }

    #[test]
    fn upload_state_starts_empty() {
        let state = UploadState::default();
        assert_eq!(state.staged, None);
        assert_eq!(state.key, None);
        assert_eq!(state.url, None);
        assert_eq!(state.status, None);
    }
}
