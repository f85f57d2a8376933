//! Error types for smilefjes-prep
//!
//! Only fatal conditions live here. Per-lookup failures against the
//! registry or geocoder are [`crate::services::LookupError`] and degrade to
//! a missing result instead of aborting the run.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal pipeline error
#[derive(Debug, Error)]
pub enum PrepError {
    /// Inspection table could not be fetched or read
    #[error("Source error: {0}")]
    Source(String),

    /// Inspection table URL answered with a non-success status
    #[error("Source returned HTTP {0}")]
    SourceStatus(u16),

    /// Malformed delimited text
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Required column absent from the header row
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    /// Cache file unreadable, malformed or unwritable
    #[error("Cache error {}: {message}", path.display())]
    Cache { path: PathBuf, message: String },

    /// Output GeoJSON could not be written
    #[error("Output error {}: {message}", path.display())]
    Output { path: PathBuf, message: String },

    /// HTTP client construction failed
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// smilefjes-common error
    #[error("Common error: {0}")]
    Common(#[from] smilefjes_common::Error),
}

/// Result type for pipeline operations
pub type PrepResult<T> = Result<T, PrepError>;
