/// Errors returned by the study backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested study does not exist (HTTP 404).
    #[error("study not found")]
    NotFound,

    /// The backend answered with a non-success status.
    #[error("backend returned HTTP {0}")]
    Status(u16),

    /// The configured base URL cannot carry a study path.
    #[error("invalid backend URL: {0}")]
    InvalidUrl(String),

    /// The request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
