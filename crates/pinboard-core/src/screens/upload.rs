//! Standalone image-upload screen.

use std::sync::Arc;

use crate::models::{StagedFile, UploadState};
use crate::storage::{sanitize_file_name, ObjectStore};
use crate::Result;

const UPLOAD_FAILED_STATUS: &str = "Upload failed. The file is still staged; try again.";
const REMOVE_FAILED_STATUS: &str = "Remove failed. The object may still exist; try again.";

/// Controller for the upload/get-url/remove workflow.
///
/// State is transient: nothing survives the screen except the objects
/// written to storage.
pub struct UploadScreen {
    store: Arc<dyn ObjectStore>,
    state: UploadState,
}

impl UploadScreen {
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            state: UploadState::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &UploadState {
        &self.state
    }

    /// Stage a file for upload, deriving its storage key from the file name.
    ///
    /// Staging replaces any previously staged file and clears the status
    /// line; it performs no network calls.
    pub fn stage(&mut self, file: StagedFile) {
        self.state.key = Some(sanitize_file_name(&file.file_name));
        self.state.staged = Some(file);
        self.state.url = None;
        self.state.status = None;
    }

    /// Storage key the staged file will upload under.
    #[must_use]
    pub fn staged_key(&self) -> Option<&str> {
        self.state.key.as_deref()
    }

    /// Point the screen at an existing object key (no staged bytes).
    ///
    /// Used to remove an object uploaded in an earlier run.
    pub fn set_key(&mut self, key: impl Into<String>) {
        self.state = UploadState {
            key: Some(key.into()),
            ..UploadState::default()
        };
    }

    /// Upload the staged file and resolve its retrieval URL.
    ///
    /// On failure the file stays staged so the user can retry.
    pub async fn upload(&mut self) -> Result<()> {
        let Some(staged) = self.state.staged.take() else {
            self.state.status = Some("Nothing is staged for upload.".to_string());
            return Ok(());
        };
        let key = sanitize_file_name(&staged.file_name);

        match self.try_upload(&key, &staged).await {
            Ok(url) => {
                self.state.key = Some(key);
                self.state.url = Some(url);
                self.state.status = Some("Uploaded.".to_string());
                Ok(())
            }
            Err(error) => {
                tracing::warn!("Upload of {} failed: {}", key, error);
                self.state.staged = Some(staged);
                self.state.status = Some(UPLOAD_FAILED_STATUS.to_string());
                Err(error)
            }
        }
    }

    async fn try_upload(&self, key: &str, staged: &StagedFile) -> Result<String> {
        self.store
            .upload(key, &staged.bytes, staged.content_type.as_deref())
            .await?;
        self.store.retrieval_url(key).await
    }

    /// Delete the object behind the current key.
    pub async fn remove(&mut self) -> Result<()> {
        let Some(key) = self.state.key.clone() else {
            self.state.status = Some("No uploaded object to remove.".to_string());
            return Ok(());
        };

        match self.store.delete(&key).await {
            Ok(()) => {
                self.state.key = None;
                self.state.url = None;
                self.state.status = Some("Removed.".to_string());
                Ok(())
            }
            Err(error) => {
                tracing::warn!("Remove of {} failed: {}", key, error);
                self.state.status = Some(REMOVE_FAILED_STATUS.to_string());
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::Error;

    #[derive(Default)]
    struct FakeStore {
        objects: Mutex<HashMap<String, Vec<u8>>>,
        fail_uploads: AtomicBool,
        fail_deletes: AtomicBool,
    }

    #[async_trait]
    impl ObjectStore for FakeStore {
        async fn upload(
            &self,
            key: &str,
            bytes: &[u8],
            _content_type: Option<&str>,
        ) -> Result<()> {
            if self.fail_uploads.load(Ordering::SeqCst) {
                return Err(Error::Storage("upload failed".to_string()));
            }
            self.objects
                .lock()
                .unwrap()
                .insert(key.to_string(), bytes.to_vec());
            Ok(())
        }

        async fn retrieval_url(&self, key: &str) -> Result<String> {
            Ok(format!("https://store.test/{key}?sig=abc"))
        }

        async fn delete(&self, key: &str) -> Result<()> {
            if self.fail_deletes.load(Ordering::SeqCst) {
                return Err(Error::Storage("delete failed".to_string()));
            }
            self.objects.lock().unwrap().remove(key);
            Ok(())
        }
    }

    fn staged(name: &str) -> StagedFile {
        StagedFile::new(name, Some("image/jpeg".to_string()), b"jpeg-bytes".to_vec())
    }

    #[test]
    fn staging_sanitizes_the_key() {
        let mut screen = UploadScreen::new(Arc::new(FakeStore::default()));
        screen.stage(staged("a b.JPG"));
        assert_eq!(screen.staged_key(), Some("a_b.JPG"));
        assert_eq!(screen.state().status, None);
    }

    #[tokio::test]
    async fn upload_stores_object_and_resolves_url() {
        let store = Arc::new(FakeStore::default());
        let mut screen = UploadScreen::new(store.clone());

        screen.stage(staged("beach day!.jpg"));
        screen.upload().await.unwrap();

        assert_eq!(screen.state().key.as_deref(), Some("beach_day_.jpg"));
        assert_eq!(
            screen.state().url.as_deref(),
            Some("https://store.test/beach_day_.jpg?sig=abc")
        );
        assert_eq!(screen.state().status.as_deref(), Some("Uploaded."));
        assert_eq!(screen.state().staged, None);
        assert!(store.objects.lock().unwrap().contains_key("beach_day_.jpg"));
    }

    #[tokio::test]
    async fn failed_upload_keeps_file_staged() {
        let store = Arc::new(FakeStore::default());
        store.fail_uploads.store(true, Ordering::SeqCst);
        let mut screen = UploadScreen::new(store.clone());

        screen.stage(staged("photo.jpg"));
        assert!(screen.upload().await.is_err());

        assert!(screen.state().staged.is_some());
        assert_eq!(screen.state().url, None);
        assert_eq!(screen.state().status.as_deref(), Some(UPLOAD_FAILED_STATUS));

        store.fail_uploads.store(false, Ordering::SeqCst);
        screen.upload().await.unwrap();
        assert_eq!(screen.state().status.as_deref(), Some("Uploaded."));
    }

    #[tokio::test]
    async fn remove_deletes_object_and_clears_state() {
        let store = Arc::new(FakeStore::default());
        let mut screen = UploadScreen::new(store.clone());

        screen.stage(staged("photo.jpg"));
        screen.upload().await.unwrap();
        screen.remove().await.unwrap();

        assert_eq!(screen.state().key, None);
        assert_eq!(screen.state().url, None);
        assert_eq!(screen.state().status.as_deref(), Some("Removed."));
        assert!(store.objects.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_remove_keeps_key() {
        let store = Arc::new(FakeStore::default());
        let mut screen = UploadScreen::new(store.clone());
        screen.set_key("orphan.png");

        store.fail_deletes.store(true, Ordering::SeqCst);
        assert!(screen.remove().await.is_err());
        assert_eq!(screen.state().key.as_deref(), Some("orphan.png"));
        assert_eq!(screen.state().status.as_deref(), Some(REMOVE_FAILED_STATUS));
    }

    #[tokio::test]
    async fn upload_without_staged_file_is_a_noop() {
        let mut screen = UploadScreen::new(Arc::new(FakeStore::default()));
        screen.upload().await.unwrap();
        assert_eq!(
            screen.state().status.as_deref(),
            Some("Nothing is staged for upload.")
        );
    }
}
