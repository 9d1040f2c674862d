//! Error types for the outpdf library.

use std::io;
use thiserror::Error;

/// Result type alias for outpdf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during outline extraction.
///
/// Only configuration errors (a missing, corrupt, or schema-incompatible
/// model artifact) propagate to the caller. Malformed spans are recovered
/// locally inside the pipeline and never surface here.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading a model artifact or span dump.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The model artifact could not be decoded.
    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(#[from] serde_json::Error),

    /// The model artifact is structurally unusable (wrong class set,
    /// mismatched weight dimensions, non-finite weights).
    #[error("Model artifact error: {0}")]
    ModelArtifact(String),

    /// The artifact's feature schema does not match the one this crate
    /// was built against.
    #[error("Feature schema mismatch: expected [{expected}], found [{found}]")]
    SchemaMismatch {
        /// Schema the inference code expects.
        expected: String,
        /// Schema declared by the artifact.
        found: String,
    },

    /// Error serializing an outline to the external contract.
    #[error("Serialization error: {0}")]
    Serialize(String),
}
