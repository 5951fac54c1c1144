//! Note model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::upload::StagedFile;
use crate::{Error, Result};

/// Identifier assigned to a note by the remote backend.
///
/// The backend owns id generation; the client treats the value as an opaque
/// non-empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteId(String);

impl NoteId {
    /// Wrap a backend-assigned id as-is.
    ///
    /// No validation is applied; ids arriving as user input go through
    /// [`FromStr`], which trims and rejects empty values.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidInput("Note id cannot be empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

/// A note record as held by the remote backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Backend-assigned identifier
    pub id: NoteId,
    /// Note name; doubles as the storage key for an attached image
    pub name: String,
    /// Note description
    pub description: String,
    /// Object key of the attached image, when one was uploaded.
    /// Equals the note name; resolved to a retrieval URL at read time.
    #[serde(default)]
    pub image: Option<String>,
}

impl Note {
    /// Whether this note carries a non-empty image reference.
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    /// The key under which this note's image lives in object storage.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.name
    }
}

/// Form input for creating a note.
#[derive(Debug, Clone, Default)]
pub struct NoteDraft {
    pub name: String,
    pub description: String,
    /// Image file staged for upload alongside the record
    pub image: Option<StagedFile>,
}

impl NoteDraft {
    /// Validate and normalize the draft fields.
    ///
    /// Name and description are required, mirroring the creation form.
    pub fn into_validated(self) -> Result<Self> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(Error::InvalidInput("Note name is required".to_string()));
        }
        let description = self.description.trim().to_string();
        if description.is_empty() {
            return Err(Error::InvalidInput(
                "Note description is required".to_string(),
            ));
        }
        Ok(Self {
            name,
            description,
            image: self.image,
        })
    }
}

/// A note paired with its resolved image URL, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteView {
    pub note: Note,
    /// Short-lived retrieval URL for the note's image, when present
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn note_id_parse_trims_and_rejects_empty() {
        let id: NoteId = "  note-123  ".parse().unwrap();
        assert_eq!(id.as_str(), "note-123");
        assert!("   ".parse::<NoteId>().is_err());
    }

    #[test]
    fn note_id_serializes_as_plain_string() {
        let id = NoteId::new("note-1");
        assert_eq!(serde_json::to_value(&id).unwrap(), serde_json::json!("note-1"));
    }

    #[test]
    fn note_deserializes_with_missing_image() {
        let note: Note = serde_json::from_str(
            r#"{"id": "n1", "name": "Trip", "description": "Beach day"}"#,
        )
        .unwrap();
        assert_eq!(note.image, None);
        assert!(!note.has_image());
    }

    #[test]
    fn has_image_ignores_blank_references() {
        let mut note = Note {
            id: NoteId::new("n1"),
            name: "Trip".to_string(),
            description: "Beach day".to_string(),
            image: Some("  ".to_string()),
        };
        assert!(!note.has_image());

        note.image = Some("Trip".to_string());
        assert!(note.has_image());
        assert_eq!(note.storage_key(), "Trip");
    }

    #[test]
    fn draft_validation_trims_fields() {
        let draft = NoteDraft {
            name: "  Trip  ".to_string(),
            description: " Beach day ".to_string(),
            image: None,
        };
        let validated = draft.into_validated().unwrap();
        assert_eq!(validated.name, "Trip");
        assert_eq!(validated.description, "Beach day");
    }

    #[test]
    fn draft_validation_requires_name_and_description() {
        let missing_name = NoteDraft {
            name: "  ".to_string(),
            description: "Beach day".to_string(),
            image: None,
        };
        assert!(missing_name.into_validated().is_err());

        let missing_description = NoteDraft {
            name: "Trip".to_string(),
            description: String::new(),
            image: None,
        };
        assert!(missing_description.into_validated().is_err());
    }
}
