//! Submission pipeline: validate, upload, call the backend, then commit or
//! roll back the upload.

use tracing::{info, instrument, warn};

use crate::api::StudyApi;
use crate::model::{FieldErrors, Recruitment, Study, StudyDraft};
use crate::upload::{ImageUploadCoordinator, ObjectStorage};

/// Phase of the current submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Validating,
    Uploading,
    Submitting,
    Succeeded,
    Failed,
}

impl SubmitStatus {
    /// Returns `true` while a submission is in flight.
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Validating | Self::Uploading | Self::Submitting)
    }

    /// Human-readable label for the status bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "",
            Self::Validating => "Validating...",
            Self::Uploading => "Uploading image...",
            Self::Submitting => "Submitting...",
            Self::Succeeded => "Saved",
            Self::Failed => "Failed",
        }
    }
}

/// How a submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The draft failed validation; nothing was sent.
    Invalid(FieldErrors),
    /// Create was attempted with no staged image; nothing was sent.
    NoImage,
    /// The study was created.
    Created(Study),
    /// The study was updated.
    Updated { id: String, study: Study },
    /// Upload or backend call failed; any upload was rolled back.
    Failed(String),
}

/// Runs create and update submissions against the collaborators.
pub struct SubmissionPipeline<'a, A, S> {
    api: &'a A,
    storage: &'a S,
}

impl<'a, A: StudyApi, S: ObjectStorage> SubmissionPipeline<'a, A, S> {
    pub fn new(api: &'a A, storage: &'a S) -> Self {
        Self { api, storage }
    }

    /// Opens a new study.
    ///
    /// Order: validate, require a staged image, upload, `POST`, then commit
    /// on success or delete the upload on failure.
    #[instrument(skip_all)]
    pub async fn create(
        &self,
        token: &str,
        draft: StudyDraft,
        recruitment: Recruitment,
        image: &mut ImageUploadCoordinator,
        status: &mut SubmitStatus,
    ) -> SubmitOutcome {
        *status = SubmitStatus::Validating;
        let errors = draft.validate();
        if !errors.is_empty() {
            *status = SubmitStatus::Idle;
            return SubmitOutcome::Invalid(errors);
        }
        if image.staged().is_none() {
            info!("no image staged, create aborted");
            *status = SubmitStatus::Idle;
            return SubmitOutcome::NoImage;
        }

        *status = SubmitStatus::Uploading;
        let url = match image.upload(self.storage).await {
            Ok(Some(url)) => url,
            Ok(None) => {
                *status = SubmitStatus::Idle;
                return SubmitOutcome::NoImage;
            }
            Err(e) => {
                warn!(error = %e, "image upload failed");
                *status = SubmitStatus::Failed;
                return SubmitOutcome::Failed(format!("Image upload failed: {e}"));
            }
        };

        let study = match draft.into_study(url, recruitment) {
            Ok(study) => study,
            Err(errors) => {
                self.roll_back(image).await;
                *status = SubmitStatus::Idle;
                return SubmitOutcome::Invalid(errors);
            }
        };

        *status = SubmitStatus::Submitting;
        if let Err(e) = self.api.create(token, &study).await {
            warn!(error = %e, "create failed");
            self.roll_back(image).await;
            *status = SubmitStatus::Failed;
            return SubmitOutcome::Failed(format!("Could not open study: {e}"));
        }

        self.commit(image).await;
        info!(title = %study.title, "study created");
        *status = SubmitStatus::Succeeded;
        SubmitOutcome::Created(study)
    }

    /// Updates an existing study.
    ///
    /// A newly staged image is uploaded and replaces `prior_image_src`;
    /// otherwise the prior URL is sent unchanged.
    #[instrument(skip(self, token, draft, recruitment, prior_image_src, image, status))]
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        token: &str,
        id: &str,
        draft: StudyDraft,
        recruitment: Recruitment,
        prior_image_src: &str,
        image: &mut ImageUploadCoordinator,
        status: &mut SubmitStatus,
    ) -> SubmitOutcome {
        *status = SubmitStatus::Validating;
        let errors = draft.validate();
        if !errors.is_empty() {
            *status = SubmitStatus::Idle;
            return SubmitOutcome::Invalid(errors);
        }

        *status = SubmitStatus::Uploading;
        let image_src = match image.upload(self.storage).await {
            Ok(Some(url)) => url,
            Ok(None) => prior_image_src.to_string(),
            Err(e) => {
                warn!(error = %e, "image upload failed");
                *status = SubmitStatus::Failed;
                return SubmitOutcome::Failed(format!("Image upload failed: {e}"));
            }
        };

        let study = match draft.into_study(image_src, recruitment) {
            Ok(study) => study,
            Err(errors) => {
                self.roll_back(image).await;
                *status = SubmitStatus::Idle;
                return SubmitOutcome::Invalid(errors);
            }
        };

        *status = SubmitStatus::Submitting;
        if let Err(e) = self.api.update(token, id, &study).await {
            warn!(error = %e, "update failed");
            self.roll_back(image).await;
            *status = SubmitStatus::Failed;
            return SubmitOutcome::Failed(format!("Could not update study: {e}"));
        }

        self.commit(image).await;
        info!("study updated");
        *status = SubmitStatus::Succeeded;
        SubmitOutcome::Updated {
            id: id.to_string(),
            study,
        }
    }

    async fn commit(&self, image: &mut ImageUploadCoordinator) {
        // The record is already saved; a failed commit only costs the image.
        if let Err(e) = image.commit(self.storage).await {
            warn!(error = %e, "image commit failed");
        }
    }

    async fn roll_back(&self, image: &mut ImageUploadCoordinator) {
        // Already logged by the coordinator; the submission failure is what gets reported.
        let _ = image.rollback(self.storage).await;
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::NaiveDate;
    use tempfile::TempDir;

    use super::*;
    use crate::api::fake::{ApiCall, FakeApi};
    use crate::model::{Campus, Day, Field, Level, ValidationError};
    use crate::upload::StagedImage;
    use crate::upload::fake::{FakeStorage, StorageCall};

    fn draft() -> StudyDraft {
        StudyDraft {
            image_src: Some("file:///tmp/cover.png".into()),
            title: "Async Rust".into(),
            day: Some(Day::Thu),
            start_time: Some("19:00".into()),
            end_time: Some("21:00".into()),
            campus: Some(Campus::Myeongnyun),
            level: Some(Level::Beginner),
            tags: vec!["rust".into()],
            description: "weekly".into(),
        }
    }

    fn recruitment() -> Recruitment {
        Recruitment::opening_on(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap())
    }

    fn staged_coordinator() -> (TempDir, ImageUploadCoordinator) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.png");
        fs::write(&path, b"png").unwrap();
        let mut coordinator = ImageUploadCoordinator::new();
        coordinator.stage(StagedImage::stage(&path).unwrap());
        (dir, coordinator)
    }

    mod create {
        use super::*;

        #[tokio::test]
        async fn no_image_makes_no_backend_call() {
            let api = FakeApi::default();
            let storage = FakeStorage::default();
            let mut image = ImageUploadCoordinator::new();
            let mut status = SubmitStatus::Idle;

            let outcome = SubmissionPipeline::new(&api, &storage)
                .create("tok", draft(), recruitment(), &mut image, &mut status)
                .await;

            assert_eq!(outcome, SubmitOutcome::NoImage);
            assert!(api.calls().is_empty());
            assert!(storage.calls().is_empty());
            assert_eq!(status, SubmitStatus::Idle);
        }

        #[tokio::test]
        async fn success_commits_upload() {
            let api = FakeApi::default();
            let storage = FakeStorage::default();
            let (_dir, mut image) = staged_coordinator();
            let mut status = SubmitStatus::Idle;

            let outcome = SubmissionPipeline::new(&api, &storage)
                .create("tok", draft(), recruitment(), &mut image, &mut status)
                .await;

            let SubmitOutcome::Created(study) = outcome else {
                panic!("expected Created, got {outcome:?}");
            };
            assert_eq!(study.image_src, "https://cdn.example/handle-1/");
            assert_eq!(
                api.calls(),
                vec![ApiCall::Create {
                    token: "tok".into(),
                    study: study.clone()
                }]
            );
            assert_eq!(
                storage.calls(),
                vec![
                    StorageCall::Upload("cover.png".into()),
                    StorageCall::Commit("handle-1".into())
                ]
            );
            assert_eq!(status, SubmitStatus::Succeeded);
        }

        #[tokio::test]
        async fn backend_failure_deletes_upload() {
            let api = FakeApi {
                create_status: Some(500),
                ..FakeApi::default()
            };
            let storage = FakeStorage::default();
            let (_dir, mut image) = staged_coordinator();
            let mut status = SubmitStatus::Idle;

            let outcome = SubmissionPipeline::new(&api, &storage)
                .create("tok", draft(), recruitment(), &mut image, &mut status)
                .await;

            assert!(matches!(outcome, SubmitOutcome::Failed(ref m) if m.contains("500")));
            assert_eq!(
                storage.calls(),
                vec![
                    StorageCall::Upload("cover.png".into()),
                    StorageCall::Delete("handle-1".into())
                ]
            );
            assert_eq!(status, SubmitStatus::Failed);
        }

        #[tokio::test]
        async fn upload_failure_skips_backend() {
            let api = FakeApi::default();
            let storage = FakeStorage::failing_upload();
            let (_dir, mut image) = staged_coordinator();
            let mut status = SubmitStatus::Idle;

            let outcome = SubmissionPipeline::new(&api, &storage)
                .create("tok", draft(), recruitment(), &mut image, &mut status)
                .await;

            assert!(matches!(outcome, SubmitOutcome::Failed(_)));
            assert!(api.calls().is_empty());
        }

        #[tokio::test]
        async fn invalid_draft_sends_nothing() {
            let api = FakeApi::default();
            let storage = FakeStorage::default();
            let (_dir, mut image) = staged_coordinator();
            let mut status = SubmitStatus::Idle;
            let bad = StudyDraft {
                title: String::new(),
                ..draft()
            };

            let outcome = SubmissionPipeline::new(&api, &storage)
                .create("tok", bad, recruitment(), &mut image, &mut status)
                .await;

            let SubmitOutcome::Invalid(errors) = outcome else {
                panic!("expected Invalid, got {outcome:?}");
            };
            assert_eq!(errors.get(Field::Title), Some(&ValidationError::EmptyTitle));
            assert!(api.calls().is_empty());
            assert!(storage.calls().is_empty());
        }
    }

    mod update {
        use super::*;

        const PRIOR: &str = "https://cdn.example/prior/";

        fn edit_draft() -> StudyDraft {
            StudyDraft {
                image_src: Some(PRIOR.into()),
                ..draft()
            }
        }

        #[tokio::test]
        async fn without_new_image_reuses_prior_src() {
            let api = FakeApi::default();
            let storage = FakeStorage::default();
            let mut image = ImageUploadCoordinator::new();
            let mut status = SubmitStatus::Idle;

            let outcome = SubmissionPipeline::new(&api, &storage)
                .update(
                    "tok",
                    "42",
                    edit_draft(),
                    recruitment(),
                    PRIOR,
                    &mut image,
                    &mut status,
                )
                .await;

            let SubmitOutcome::Updated { id, study } = outcome else {
                panic!("expected Updated, got {outcome:?}");
            };
            assert_eq!(id, "42");
            assert_eq!(study.image_src, PRIOR);
            assert!(storage.calls().is_empty());
            assert!(matches!(
                api.calls().as_slice(),
                [ApiCall::Update { id, .. }] if id == "42"
            ));
        }

        #[tokio::test]
        async fn with_new_image_uses_uploaded_url() {
            let api = FakeApi::default();
            let storage = FakeStorage::default();
            let (_dir, mut image) = staged_coordinator();
            let mut status = SubmitStatus::Idle;

            let outcome = SubmissionPipeline::new(&api, &storage)
                .update(
                    "tok",
                    "42",
                    edit_draft(),
                    recruitment(),
                    PRIOR,
                    &mut image,
                    &mut status,
                )
                .await;

            let SubmitOutcome::Updated { study, .. } = outcome else {
                panic!("expected Updated, got {outcome:?}");
            };
            assert_eq!(study.image_src, "https://cdn.example/handle-1/");
            assert_eq!(
                storage.calls(),
                vec![
                    StorageCall::Upload("cover.png".into()),
                    StorageCall::Commit("handle-1".into())
                ]
            );
        }

        #[tokio::test]
        async fn failure_deletes_the_same_upload_once() {
            let api = FakeApi {
                update_status: Some(403),
                ..FakeApi::default()
            };
            let storage = FakeStorage::default();
            let (_dir, mut image) = staged_coordinator();
            let mut status = SubmitStatus::Idle;

            let outcome = SubmissionPipeline::new(&api, &storage)
                .update(
                    "tok",
                    "42",
                    edit_draft(),
                    recruitment(),
                    PRIOR,
                    &mut image,
                    &mut status,
                )
                .await;

            assert!(matches!(outcome, SubmitOutcome::Failed(_)));
            assert_eq!(
                storage.calls(),
                vec![
                    StorageCall::Upload("cover.png".into()),
                    StorageCall::Delete("handle-1".into())
                ]
            );
            assert_eq!(status, SubmitStatus::Failed);
        }

        #[tokio::test]
        async fn failure_without_new_image_touches_no_storage() {
            let api = FakeApi {
                update_status: Some(500),
                ..FakeApi::default()
            };
            let storage = FakeStorage::default();
            let mut image = ImageUploadCoordinator::new();
            let mut status = SubmitStatus::Idle;

            let outcome = SubmissionPipeline::new(&api, &storage)
                .update(
                    "tok",
                    "42",
                    edit_draft(),
                    recruitment(),
                    PRIOR,
                    &mut image,
                    &mut status,
                )
                .await;

            assert!(matches!(outcome, SubmitOutcome::Failed(_)));
            assert!(storage.calls().is_empty());
        }
    }

    #[test]
    fn busy_statuses() {
        assert!(SubmitStatus::Uploading.is_busy());
        assert!(SubmitStatus::Submitting.is_busy());
        assert!(!SubmitStatus::Idle.is_busy());
        assert!(!SubmitStatus::Failed.is_busy());
    }
}
