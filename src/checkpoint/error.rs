//! Checkpoint error types.

use thiserror::Error;

/// Errors that can occur while encoding, decoding or resuming a checkpoint
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Encoding to JSON or binary failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Decoding from JSON or binary failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Checkpoint was written by an incompatible format version
    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The specification given to resume is itself invalid
    #[error("Specification rejected: {0}")]
    InvalidSpecification(String),

    /// Checkpoint does not fit the specification it is resumed against
    #[error("Checkpoint validation failed: {0}")]
    ValidationFailed(String),
}
