/// Errors that can occur in the TUI layer.
///
/// Submission and fetch failures are not errors here; they become
/// notifications.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// An I/O error occurred (terminal, event reading, runtime startup).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
