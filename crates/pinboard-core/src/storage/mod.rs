//! Object storage for note images.

mod r2;

use async_trait::async_trait;
use regex::Regex;

use crate::Result;

pub use r2::{R2Config, R2Storage};

/// Key-addressed blob operations used by the screens.
///
/// Keys carry no namespacing: a note's image is stored under the bare note
/// name, so two notes with the same name share (and overwrite) one object.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload object bytes under `key`, replacing any existing object.
    async fn upload(&self, key: &str, bytes: &[u8], content_type: Option<&str>) -> Result<()>;

    /// Resolve a short-lived retrieval URL granting read access to `key`.
    async fn retrieval_url(&self, key: &str) -> Result<String>;

    /// Delete the object stored under `key`.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Sanitize a file name into a storage key.
///
/// Every character outside `[A-Za-z0-9-_.]` becomes `_`; allowed characters
/// keep their case and position, so the result has the same length as the
/// input.
#[must_use]
pub fn sanitize_file_name(file_name: &str) -> String {
    let re = Regex::new(r"[^A-Za-z0-9\-_.]").expect("Invalid regex");
    re.replace_all(file_name, "_").into_owned()
}
