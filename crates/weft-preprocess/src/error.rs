//! Error types for preprocessing.

use thiserror::Error;

/// Errors raised while building or running a [`Preprocessor`](crate::Preprocessor).
#[derive(Debug, Error)]
pub enum PreprocessError {
    /// A rewrite stage rejected its input or was misconfigured.
    #[error("stage '{stage}': {message}")]
    InvalidStageArgument { stage: String, message: String },

    /// The pattern for a registered attribute-tag failed to compile.
    #[error("invalid pattern for tag '{tag}': {source}")]
    InvalidPattern {
        tag: String,
        #[source]
        source: regex::Error,
    },
}

impl PreprocessError {
    /// Shorthand for [`PreprocessError::InvalidStageArgument`].
    pub fn stage(stage: impl Into<String>, message: impl Into<String>) -> Self {
        PreprocessError::InvalidStageArgument {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// Name of the stage or tag the error concerns.
    pub fn origin(&self) -> &str {
        match self {
            PreprocessError::InvalidStageArgument { stage, .. } => stage,
            PreprocessError::InvalidPattern { tag, .. } => tag,
        }
    }
}

/// Result type alias for preprocessing.
pub type Result<T> = std::result::Result<T, PreprocessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_error_display() {
        let err = PreprocessError::stage("strip-comments", "unterminated comment");
        assert_eq!(err.to_string(), "stage 'strip-comments': unterminated comment");
        assert_eq!(err.origin(), "strip-comments");
    }

    #[test]
    fn test_pattern_error_keeps_source() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = PreprocessError::InvalidPattern {
            tag: "n:if".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("invalid pattern for tag 'n:if'"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
