use std::fs;
use std::path::{Path, PathBuf};

use reqwest::Url;

use super::error::UploadError;

/// A locally picked image that has not been uploaded yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedImage {
    path: PathBuf,
    preview_url: String,
}

impl StagedImage {
    /// Stages the file at `path`.
    ///
    /// The path is canonicalized and must name an existing regular file. The
    /// preview URL is the file's `file://` URL.
    pub fn stage(path: impl AsRef<Path>) -> Result<Self, UploadError> {
        let path = fs::canonicalize(path.as_ref())?;
        if !fs::metadata(&path)?.is_file() {
            return Err(UploadError::NotAFile(path));
        }
        let preview_url = match Url::from_file_path(&path) {
            Ok(url) => url.to_string(),
            Err(()) => format!("file://{}", path.display()),
        };
        Ok(Self { path, preview_url })
    }

    /// Returns the canonical path of the staged file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the URL the form shows until the upload finishes.
    pub fn preview_url(&self) -> &str {
        &self.preview_url
    }

    /// Returns the file name used for the upload.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string())
    }
}
