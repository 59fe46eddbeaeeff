use std::path::PathBuf;
use thiserror::Error;

use crate::resource::Classification;

/// Pipeline error types
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Source directory not found: {path}")]
    SourceNotFound { path: PathBuf },

    #[error("Invalid filename pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: PatternError,
    },

    #[error("Failed to scan {path}")]
    ScanFailed {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to read {path}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory: {path}")]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No space left on device for {path}")]
    DiskFull { path: PathBuf },

    #[error("Failed to minify {kind} resource {path}")]
    Minification {
        kind: Classification,
        path: PathBuf,
        #[source]
        source: MinifierError,
    },

    #[error("Failed to build reference rewriter")]
    Rewriter(#[from] regex::Error),
}

/// Reasons a filename pattern is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("hash length must be positive")]
    ZeroLength,

    #[error("hash length '{0}' is not a decimal integer")]
    NotANumber(String),

    #[error("hash length {requested} exceeds digest length {available}")]
    TooLong { requested: usize, available: usize },

    #[error("unterminated hash token")]
    Unterminated,
}

/// Failure reported by a minifier strategy
#[derive(Error, Debug)]
#[error("{message}")]
pub struct MinifierError {
    message: String,
}

impl MinifierError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
