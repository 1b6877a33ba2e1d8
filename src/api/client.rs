use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::error::ApiError;
use crate::model::Study;

/// Create, retrieve and update calls against the study backend.
#[allow(async_fn_in_trait)]
pub trait StudyApi {
    /// Creates a study. The response body is ignored on success.
    async fn create(&self, token: &str, study: &Study) -> Result<(), ApiError>;

    /// Fetches a study by identifier.
    async fn retrieve(&self, id: &str) -> Result<Study, ApiError>;

    /// Replaces the study with the given identifier.
    async fn update(&self, token: &str, id: &str, study: &Study) -> Result<(), ApiError>;
}

/// Retrieve responses wrap the record in a `data` field.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// [`StudyApi`] over HTTP.
///
/// Endpoints: `POST {base}/api/study`, `GET {base}/api/study/{id}` and
/// `PUT {base}/api/study/{id}`.
#[derive(Debug, Clone)]
pub struct HttpStudyApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStudyApi {
    /// Creates a client rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Creates a client rooted at `base_url` that reuses `client`.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn collection_url(&self) -> String {
        format!("{}/api/study", self.base_url)
    }

    /// The id is pushed as one escaped path segment.
    fn record_url(&self, id: &str) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.collection_url())
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base_url.clone()))?
            .push(id.trim());
        Ok(url)
    }
}

impl StudyApi for HttpStudyApi {
    #[instrument(skip_all, fields(title = %study.title))]
    async fn create(&self, token: &str, study: &Study) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.collection_url())
            .bearer_auth(token)
            .json(study)
            .send()
            .await?;
        check_status(response.status())
    }

    #[instrument(skip(self))]
    async fn retrieve(&self, id: &str) -> Result<Study, ApiError> {
        let response = self.client.get(self.record_url(id)?).send().await?;
        check_status(response.status())?;
        let envelope: Envelope<Study> = response.json().await?;
        debug!(title = %envelope.data.title, "study retrieved");
        Ok(envelope.data)
    }

    #[instrument(skip(self, token, study))]
    async fn update(&self, token: &str, id: &str, study: &Study) -> Result<(), ApiError> {
        let response = self
            .client
            .put(self.record_url(id)?)
            .bearer_auth(token)
            .json(study)
            .send()
            .await?;
        check_status(response.status())
    }
}

/// Maps a response status onto the error taxonomy.
fn check_status(status: StatusCode) -> Result<(), ApiError> {
    if status.is_success() {
        Ok(())
    } else if status == StatusCode::NOT_FOUND {
        Err(ApiError::NotFound)
    } else {
        warn!(%status, "backend rejected request");
        Err(ApiError::Status(status.as_u16()))
    }
}
