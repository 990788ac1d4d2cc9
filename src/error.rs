//! Error types for the assay_colors library

use thiserror::Error;

/// Result type alias for assay_colors operations
pub type Result<T> = std::result::Result<T, ClassifyError>;

/// Error types for sample classification operations
///
/// Every failure is reported to the caller; no condition is fatal to the
/// process, and each classification call is independently retryable with a
/// new image.
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// Input image missing, unreadable, undecodable, or empty
    #[error("Failed to load image: {message}")]
    ImageLoad {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Fewer pixel samples than requested cluster count
    #[error("Insufficient samples: {samples} pixels for {clusters} clusters")]
    InsufficientSamples { samples: usize, clusters: usize },

    /// The k nearest reference labels have no unique mode
    #[error("Ambiguous vote among {k} nearest references (tied: {tied:?})")]
    AmbiguousVote { k: usize, tied: Vec<String> },

    /// Configuration or reference table could not be loaded
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ClassifyError {
    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoad {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an image load error without an underlying source
    pub fn image_load_message(message: impl Into<String>) -> Self {
        Self::ImageLoad {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error without an underlying source
    pub fn config_message(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Check if this error indicates a recoverable condition
    ///
    /// Recoverable errors clear up with a better photograph of the same
    /// sample; load and configuration errors require operator intervention.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ClassifyError::InsufficientSamples { .. } | ClassifyError::AmbiguousVote { .. }
        )
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            ClassifyError::ImageLoad { .. } => {
                "Could not load the image. Please check the file format and try again.".to_string()
            }
            ClassifyError::InsufficientSamples { samples, clusters } => {
                format!(
                    "The image contains too few pixels ({} for {} clusters). Please retake the photo.",
                    samples, clusters
                )
            }
            ClassifyError::AmbiguousVote { tied, .. } => {
                format!(
                    "The sample color falls between calibration levels ({}). Please retake the photo.",
                    tied.join(", ")
                )
            }
            ClassifyError::Config { .. } => {
                "The classifier configuration is invalid. Please check the configuration file."
                    .to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification_errors() {
        let err = ClassifyError::AmbiguousVote {
            k: 3,
            tied: vec!["0 mg/ml".into(), "2.2 mg/ml".into()],
        };
        assert!(err.is_recoverable());

        let err = ClassifyError::InsufficientSamples {
            samples: 3,
            clusters: 5,
        };
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_load_and_config_not_recoverable() {
        assert!(!ClassifyError::image_load_message("missing").is_recoverable());
        assert!(!ClassifyError::config_message("bad json").is_recoverable());
    }

    #[test]
    fn test_user_message_mentions_tied_labels() {
        let err = ClassifyError::AmbiguousVote {
            k: 3,
            tied: vec!["2.5 mg/ml".into(), "2.65 mg/ml".into()],
        };
        let msg = err.user_message();
        assert!(msg.contains("2.5 mg/ml"));
        assert!(msg.contains("2.65 mg/ml"));
    }
}
