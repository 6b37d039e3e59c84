//! Errors surfaced by the command-line layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Snapshot(#[from] crate::snapshot::SnapshotError),

    /// Food search failure, already phrased for the user.
    #[error("{0}")]
    Search(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        AppError::Validation(err)
    }
}

/// Result type alias for command handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_errors_display_verbatim() {
        let err = AppError::Search("Food search failed.".into());
        assert_eq!(err.to_string(), "Food search failed.");
    }

    #[test]
    fn validation_message_is_prefixed() {
        assert_eq!(AppError::from("bad meal".to_string()).to_string(), "Invalid input: bad meal");
    }
}
