//! Error types and handling for Resamp

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Resamp operations
pub type Result<T> = std::result::Result<T, ResampError>;

/// Main error type for Resamp operations
#[derive(Debug, Error)]
pub enum ResampError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decode/encode errors surfaced outside the per-item loop
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// A run was requested with an empty item list
    #[error("No input files: the item list is empty")]
    NoInput,

    /// Target width or height is zero
    #[error("Invalid target dimensions: {width}x{height} (both must be positive)")]
    InvalidDimensions { width: u32, height: u32 },

    /// Output directory is missing, not a directory, or not writable
    #[error("Invalid output path {path:?}: {reason}")]
    InvalidOutputPath { path: PathBuf, reason: String },

    /// A run was requested while a previous run is still active
    #[error("A conversion run is already in progress")]
    RunInProgress,

    /// Preferences file could not be read or written
    #[error("Settings persistence error: {message}")]
    Settings { message: String },

    /// Background worker failed to join
    #[error("Worker error: {message}")]
    Worker { message: String },
}

impl ResampError {
    /// Create a new invalid dimensions error
    pub fn invalid_dimensions(width: u32, height: u32) -> Self {
        Self::InvalidDimensions { width, height }
    }

    /// Create a new invalid output path error
    pub fn invalid_output_path<S: Into<String>>(path: PathBuf, reason: S) -> Self {
        Self::InvalidOutputPath {
            path,
            reason: reason.into(),
        }
    }

    /// Create a new settings persistence error
    pub fn settings<S: Into<String>>(message: S) -> Self {
        Self::Settings {
            message: message.into(),
        }
    }

    /// Create a new worker error
    pub fn worker<S: Into<String>>(message: S) -> Self {
        Self::Worker {
            message: message.into(),
        }
    }

    /// Check if this error is a pre-run validation failure
    ///
    /// Validation failures halt the workflow before any side effects; every
    /// other error class is absorbed internally once a run has started.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NoInput | Self::InvalidDimensions { .. } | Self::InvalidOutputPath { .. }
        )
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::NoInput => "The file list is empty. Add at least one image first.".to_string(),
            Self::InvalidDimensions { width, height } => {
                format!(
                    "Target dimensions {}x{} are invalid. Width and height must both be greater than zero.",
                    width, height
                )
            }
            Self::InvalidOutputPath { path, reason } => {
                format!("Cannot write to output folder {}: {}", path.display(), reason)
            }
            Self::RunInProgress => {
                "A conversion is already running. Wait for it to finish.".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<toml::de::Error> for ResampError {
    fn from(err: toml::de::Error) -> Self {
        Self::settings(format!("TOML parsing error: {}", err))
    }
}

impl From<toml::ser::Error> for ResampError {
    fn from(err: toml::ser::Error) -> Self {
        Self::settings(format!("TOML serialization error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_validation_classification() {
        assert!(ResampError::NoInput.is_validation());
        assert!(ResampError::invalid_dimensions(0, 600).is_validation());
        assert!(
            ResampError::invalid_output_path(Path::new("/nope").to_path_buf(), "missing")
                .is_validation()
        );
        assert!(!ResampError::RunInProgress.is_validation());
        assert!(!ResampError::settings("oops").is_validation());
    }

    #[test]
    fn test_user_messages() {
        let err = ResampError::invalid_dimensions(0, 600);
        assert!(err.user_message().contains("0x600"));

        let err = ResampError::NoInput;
        assert!(err.user_message().contains("empty"));
    }
}
