//! Error types for the downloader

use std::process::ExitStatus;

use thiserror::Error;

/// Input rejected before a job is started.
///
/// The `Display` text is what the user sees in the error dialog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid SoundCloud URL.")]
    EmptyUrl,

    #[error("Invalid download folder.")]
    MissingFolder,
}

/// Failure of the download itself.
///
/// The `Display` text is passed through verbatim as the job's failure message.
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("failed to start yt-dlp: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Error text reported by the tool itself.
    #[error("{0}")]
    Tool(String),

    #[error("yt-dlp exited with {0}")]
    Exited(ExitStatus),
}

pub type Result<T> = std::result::Result<T, DownloadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_is_verbatim() {
        let err = DownloadError::Tool("HTTP 404".to_string());
        assert_eq!(err.to_string(), "HTTP 404");
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::EmptyUrl.to_string(),
            "Please enter a valid SoundCloud URL."
        );
        assert_eq!(ValidationError::MissingFolder.to_string(), "Invalid download folder.");
    }
}
