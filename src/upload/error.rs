use std::path::PathBuf;

/// Errors that can occur while staging or uploading an image.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The picked path is not a regular file.
    #[error("not a file: {0}")]
    NotAFile(PathBuf),

    /// An I/O error occurred while reading the picked file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The request to the storage service failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The storage service answered with a non-success status.
    #[error("storage service returned HTTP {0}")]
    Status(u16),
}
