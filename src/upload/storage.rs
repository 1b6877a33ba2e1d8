use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::error::UploadError;
use super::staged::StagedImage;
use crate::config::StorageConfig;

/// A provisional upload: kept only once committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedObject {
    /// Storage-side identifier used to commit or delete the upload.
    pub handle: String,
    /// Durable URL the study record points at.
    pub url: String,
}

/// Object storage with provisional uploads.
#[allow(async_fn_in_trait)]
pub trait ObjectStorage {
    /// Uploads `image`. The object is garbage-collected unless committed.
    async fn upload(&self, image: &StagedImage) -> Result<UploadedObject, UploadError>;

    /// Marks `object` as permanent.
    async fn commit(&self, object: &UploadedObject) -> Result<(), UploadError>;

    /// Removes `object`.
    async fn delete(&self, object: &UploadedObject) -> Result<(), UploadError>;
}

/// Upload endpoint response.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: String,
}

/// [`ObjectStorage`] backed by an Uploadcare-style HTTP service.
///
/// Uploads go to `upload_url` with storing disabled; commit and delete hit
/// `{api_url}/files/{handle}/storage/` with `PUT` and `DELETE`.
#[derive(Debug, Clone)]
pub struct HttpObjectStorage {
    client: reqwest::Client,
    config: StorageConfig,
}

impl HttpObjectStorage {
    /// Creates a storage client from configuration.
    pub fn new(config: StorageConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Creates a storage client that reuses `client`.
    pub fn with_client(client: reqwest::Client, config: StorageConfig) -> Self {
        Self { client, config }
    }

    fn storage_url(&self, handle: &str) -> String {
        format!(
            "{}/files/{}/storage/",
            self.config.api_url.trim_end_matches('/'),
            handle
        )
    }

    fn cdn_url(&self, handle: &str) -> String {
        format!("{}/{}/", self.config.cdn_url.trim_end_matches('/'), handle)
    }

    fn auth_header(&self) -> String {
        format!(
            "Uploadcare.Simple {}:{}",
            self.config.public_key, self.config.secret_key
        )
    }
}

impl ObjectStorage for HttpObjectStorage {
    #[instrument(skip_all, fields(path = %image.path().display()))]
    async fn upload(&self, image: &StagedImage) -> Result<UploadedObject, UploadError> {
        let content = Bytes::from(tokio::fs::read(image.path()).await?);
        debug!(size = content.len(), "uploading image");

        let form = Form::new()
            .text("UPLOADCARE_PUB_KEY", self.config.public_key.clone())
            .text("UPLOADCARE_STORE", "0")
            .part("file", Part::stream(content).file_name(image.file_name()));

        let response = self
            .client
            .post(&self.config.upload_url)
            .multipart(form)
            .send()
            .await?;
        check_status(response.status())?;

        let body: UploadResponse = response.json().await?;
        Ok(UploadedObject {
            url: self.cdn_url(&body.file),
            handle: body.file,
        })
    }

    #[instrument(skip_all, fields(handle = %object.handle))]
    async fn commit(&self, object: &UploadedObject) -> Result<(), UploadError> {
        let response = self
            .client
            .put(self.storage_url(&object.handle))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .send()
            .await?;
        check_status(response.status())
    }

    #[instrument(skip_all, fields(handle = %object.handle))]
    async fn delete(&self, object: &UploadedObject) -> Result<(), UploadError> {
        let response = self
            .client
            .delete(self.storage_url(&object.handle))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .send()
            .await?;
        check_status(response.status())
    }
}

fn check_status(status: StatusCode) -> Result<(), UploadError> {
    if status.is_success() {
        Ok(())
    } else {
        warn!(%status, "storage service rejected request");
        Err(UploadError::Status(status.as_u16()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> HttpObjectStorage {
        HttpObjectStorage::new(StorageConfig {
            upload_url: "https://upload.example/base/".into(),
            api_url: "https://api.example/".into(),
            cdn_url: "https://cdn.example".into(),
            public_key: "pub".into(),
            secret_key: "secret".into(),
        })
    }

    #[test]
    fn storage_url_for_handle() {
        assert_eq!(
            storage().storage_url("abc"),
            "https://api.example/files/abc/storage/"
        );
    }

    #[test]
    fn cdn_url_for_handle() {
        assert_eq!(storage().cdn_url("abc"), "https://cdn.example/abc/");
    }

    #[test]
    fn auth_header_uses_both_keys() {
        assert_eq!(storage().auth_header(), "Uploadcare.Simple pub:secret");
    }

    #[test]
    fn non_success_status_is_error() {
        assert!(check_status(StatusCode::OK).is_ok());
        assert!(matches!(
            check_status(StatusCode::FORBIDDEN),
            Err(UploadError::Status(403))
        ));
    }

    #[test]
    fn upload_response_parses_handle() {
        let body: UploadResponse = serde_json::from_str(r#"{"file":"1234-abcd"}"#).unwrap();
        assert_eq!(body.file, "1234-abcd");
    }
}
