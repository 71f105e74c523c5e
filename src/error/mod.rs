//! Error types and Result aliases for campwatch.
//!
//! This module defines the error hierarchy used throughout the crate.
//! All public functions return `Result<T, Error>` or `Result<T>`.

use thiserror::Error;

/// Result type alias using campwatch's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for campwatch operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Directory scan error.
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    /// Report extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Report delivery error.
    #[error("delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    /// Fatal startup error.
    #[error("startup error: {0}")]
    Startup(#[from] StartupError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Directory scan errors. The match set is treated as empty when one occurs.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The watch root does not exist.
    #[error("watch root '{path}' does not exist")]
    RootMissing { path: String },

    /// The watch root exists but could not be read.
    #[error("watch root '{path}' is not readable: {reason}")]
    RootUnreadable { path: String, reason: String },
}

/// Report extraction errors. A failed extraction never yields a partial Report.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// File metadata could not be read.
    #[error("failed to read metadata for '{path}': {reason}")]
    Metadata { path: String, reason: String },

    /// The path has no file name component.
    #[error("path '{path}' has no file name")]
    MissingFileName { path: String },

    /// The extractor produced data violating the Report invariants.
    #[error("invalid extraction for '{path}': {reason}")]
    InvalidOutput { path: String, reason: String },

    /// The extractor itself failed.
    #[error("extractor failed on '{path}': {reason}")]
    ExtractorFailed { path: String, reason: String },
}

/// Report delivery errors, classified by whether a retry could succeed.
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// Network-level or server-side failure; a later attempt may succeed.
    #[error("transient delivery failure: {reason}")]
    Transient { reason: String },

    /// Rejected payload or credentials; retrying the same report cannot succeed.
    #[error("permanent delivery failure: {reason}")]
    Permanent { reason: String },
}

/// Fatal startup errors. The only errors that terminate the process.
#[derive(Error, Debug)]
pub enum StartupError {
    /// The credential artifact is absent.
    #[error("credential artifact '{path}' not found")]
    MissingCredentials { path: String },

    /// The credential artifact exists but could not be parsed.
    #[error("credential artifact '{path}' is invalid: {reason}")]
    InvalidCredentials { path: String, reason: String },
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl DeliveryError {
    /// Create a transient delivery error.
    pub fn transient(reason: impl Into<String>) -> Self {
        Self::Transient {
            reason: reason.into(),
        }
    }

    /// Create a permanent delivery error.
    pub fn permanent(reason: impl Into<String>) -> Self {
        Self::Permanent {
            reason: reason.into(),
        }
    }

    /// Whether a later attempt at the same submission could succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

impl ExtractionError {
    /// Create an invalid-output error for the given path.
    pub fn invalid_output(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOutput {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
