//! Error types for the drive_csv crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when looking up or downloading files from Google Drive.
#[derive(Error, Debug)]
pub enum DriveError {
    #[error("Service account key file not found at {}", .0.display())]
    CredentialsNotFound(PathBuf),

    #[error("Failed to read credentials file: {0}")]
    CredentialsFileError(std::io::Error),

    #[error("Failed to parse credentials JSON: {0}")]
    CredentialsParseError(#[from] serde_json::Error),

    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("JWT encoding error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Token refresh failed: {0}")]
    TokenRefreshError(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

impl DriveError {
    /// Whether the error should abort the run instead of degrading to an empty result.
    ///
    /// Only a missing credential artifact is fatal.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DriveError::CredentialsNotFound(_))
    }

    /// Whether the error means the requested folder or file does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DriveError::FolderNotFound(_) | DriveError::FileNotFound(_)
        )
    }
}

/// Result type alias for DriveError.
pub type Result<T> = std::result::Result<T, DriveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credentials_names_path() {
        let err = DriveError::CredentialsNotFound(PathBuf::from("keys/sa.json"));
        assert!(err.is_fatal());
        assert_eq!(
            err.to_string(),
            "Service account key file not found at keys/sa.json"
        );
    }

    #[test]
    fn test_recoverable_kinds() {
        assert!(!DriveError::FolderNotFound("Data".to_string()).is_fatal());
        assert!(DriveError::FileNotFound("a.csv".to_string()).is_not_found());
        assert!(!DriveError::ApiError {
            status: 403,
            message: "quota".to_string()
        }
        .is_not_found());
    }
}
