use tracing::{info, warn};

use super::error::UploadError;
use super::staged::StagedImage;
use super::storage::{ObjectStorage, UploadedObject};

/// Tracks the staged image of one form and the provisional upload made from it.
///
/// The handle of the provisional upload is kept so that a failed submission
/// deletes exactly the object it uploaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageUploadCoordinator {
    staged: Option<StagedImage>,
    uploaded: Option<UploadedObject>,
}

impl ImageUploadCoordinator {
    /// Creates a coordinator with nothing staged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages `image`, replacing any previously staged file.
    pub fn stage(&mut self, image: StagedImage) {
        self.staged = Some(image);
    }

    /// Returns the staged image, if any.
    pub fn staged(&self) -> Option<&StagedImage> {
        self.staged.as_ref()
    }

    /// Returns the provisional upload awaiting commit or delete, if any.
    pub fn uploaded(&self) -> Option<&UploadedObject> {
        self.uploaded.as_ref()
    }

    /// Uploads the staged image and returns its durable URL.
    ///
    /// Returns `Ok(None)` when nothing is staged.
    pub async fn upload<S: ObjectStorage>(
        &mut self,
        storage: &S,
    ) -> Result<Option<String>, UploadError> {
        let Some(image) = &self.staged else {
            return Ok(None);
        };
        let object = storage.upload(image).await?;
        info!(handle = %object.handle, "image uploaded provisionally");
        let url = object.url.clone();
        self.uploaded = Some(object);
        Ok(Some(url))
    }

    /// Commits the provisional upload and clears the staged image.
    ///
    /// A no-op when nothing was uploaded.
    pub async fn commit<S: ObjectStorage>(&mut self, storage: &S) -> Result<(), UploadError> {
        let Some(object) = self.uploaded.take() else {
            return Ok(());
        };
        storage.commit(&object).await?;
        info!(handle = %object.handle, "image upload committed");
        self.staged = None;
        Ok(())
    }

    /// Deletes the provisional upload.
    ///
    /// The staged image is kept so a retry uploads it again. A no-op when
    /// nothing was uploaded.
    pub async fn rollback<S: ObjectStorage>(&mut self, storage: &S) -> Result<(), UploadError> {
        let Some(object) = self.uploaded.take() else {
            return Ok(());
        };
        match storage.delete(&object).await {
            Ok(()) => {
                info!(handle = %object.handle, "image upload deleted");
                Ok(())
            }
            Err(e) => {
                warn!(handle = %object.handle, error = %e, "could not delete image upload");
                Err(e)
            }
        }
    }

    /// Forgets the staged image and any upload handle.
    pub fn discard(&mut self) {
        self.staged = None;
        self.uploaded = None;
    }
}


#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::fake::{FakeStorage, StorageCall};
    use super::*;

    fn staged(name: &str) -> (TempDir, StagedImage) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        fs::write(&path, b"img").unwrap();
        let image = StagedImage::stage(&path).unwrap();
        (dir, image)
    }

    #[tokio::test]
    async fn upload_without_staged_file_is_none() {
        let storage = FakeStorage::default();
        let mut coordinator = ImageUploadCoordinator::new();
        assert_eq!(coordinator.upload(&storage).await.unwrap(), None);
        assert!(storage.calls().is_empty());
    }

    #[tokio::test]
    async fn upload_records_handle_and_returns_url() {
        let (_dir, image) = staged("a.png");
        let storage = FakeStorage::default();
        let mut coordinator = ImageUploadCoordinator::new();
        coordinator.stage(image);

        let url = coordinator.upload(&storage).await.unwrap();
        assert_eq!(url.as_deref(), Some("https://cdn.example/handle-1/"));
        assert_eq!(coordinator.uploaded().unwrap().handle, "handle-1");
    }

    #[test]
    fn stage_replaces_previous() {
        let (_d1, first) = staged("a.png");
        let (_d2, second) = staged("b.png");
        let mut coordinator = ImageUploadCoordinator::new();
        coordinator.stage(first);
        coordinator.stage(second.clone());
        assert_eq!(coordinator.staged(), Some(&second));
    }

    #[tokio::test]
    async fn commit_commits_uploaded_handle() {
        let (_dir, image) = staged("a.png");
        let storage = FakeStorage::default();
        let mut coordinator = ImageUploadCoordinator::new();
        coordinator.stage(image);
        coordinator.upload(&storage).await.unwrap();

        coordinator.commit(&storage).await.unwrap();
        assert_eq!(
            storage.calls(),
            vec![
                StorageCall::Upload("a.png".into()),
                StorageCall::Commit("handle-1".into())
            ]
        );
        assert!(coordinator.staged().is_none());
        assert!(coordinator.uploaded().is_none());
    }

    #[tokio::test]
    async fn rollback_deletes_same_handle_without_reupload() {
        let (_dir, image) = staged("a.png");
        let storage = FakeStorage::default();
        let mut coordinator = ImageUploadCoordinator::new();
        coordinator.stage(image);
        coordinator.upload(&storage).await.unwrap();

        coordinator.rollback(&storage).await.unwrap();
        assert_eq!(
            storage.calls(),
            vec![
                StorageCall::Upload("a.png".into()),
                StorageCall::Delete("handle-1".into())
            ]
        );
        assert!(coordinator.uploaded().is_none());
        assert!(coordinator.staged().is_some(), "staged file kept for retry");
    }

    #[tokio::test]
    async fn commit_and_rollback_without_upload_are_noops() {
        let storage = FakeStorage::default();
        let mut coordinator = ImageUploadCoordinator::new();
        coordinator.commit(&storage).await.unwrap();
        coordinator.rollback(&storage).await.unwrap();
        assert!(storage.calls().is_empty());
    }

    #[tokio::test]
    async fn failed_upload_leaves_no_handle() {
        let (_dir, image) = staged("a.png");
        let storage = FakeStorage::failing_upload();
        let mut coordinator = ImageUploadCoordinator::new();
        coordinator.stage(image);
        assert!(coordinator.upload(&storage).await.is_err());
        assert!(coordinator.uploaded().is_none());
    }

    #[test]
    fn discard_clears_everything() {
        let (_dir, image) = staged("a.png");
        let mut coordinator = ImageUploadCoordinator::new();
        coordinator.stage(image);
        coordinator.discard();
        assert_eq!(coordinator, ImageUploadCoordinator::new());
    }
}
