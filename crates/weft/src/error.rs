//! Error types for the compiler context.

use std::path::PathBuf;

use thiserror::Error;
use weft_preprocess::PreprocessError;
use weft_tree::PassError;

/// Boxed error returned by external parsers and generators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while resolving, preprocessing or compiling templates.
#[derive(Debug, Error)]
pub enum Error {
    /// The resolved template path could not be read.
    #[error("template '{name}' could not be read from {}: {source}", path.display())]
    TemplateNotFound {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The tag cache artifact could not be persisted.
    #[error("failed to write tag cache {}: {source}", path.display())]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The tag cache artifact exists but could not be read or decoded.
    #[error("failed to read tag cache {}: {source}", path.display())]
    CacheRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A rewrite pass was built with arguments it does not accept, or failed
    /// on the tree.
    #[error("invalid pass argument: {0}")]
    InvalidPassArgument(#[from] PassError),

    /// A preprocessor stage rejected its input.
    #[error("preprocessing failed: {0}")]
    Preprocess(#[from] PreprocessError),

    /// A template directory was added after resolution began.
    #[error("template directory {} cannot be added, the resolver is locked", path.display())]
    LockedRegistryMutation { path: PathBuf },

    /// The external parser rejected the preprocessed source.
    #[error("failed to parse template '{name}': {source}")]
    Parse {
        name: String,
        #[source]
        source: BoxError,
    },

    /// The external generator failed on the rewritten tree.
    #[error("failed to generate template '{name}': {source}")]
    Generate {
        name: String,
        #[source]
        source: BoxError,
    },

    /// The configuration could not be read or parsed.
    #[error("invalid configuration: {message}")]
    Config { message: String },
}

/// Result type for compiler operations.
pub type Result<T> = std::result::Result<T, Error>;
