//! Error types for the Access rule core.
//!
//! The authorization predicates and the constraint resolver are total and
//! never fail. Errors only arise at the edges: loading configuration, parsing
//! access-time choices, validating names, and reading entity snapshots.

use thiserror::Error;

/// The unified error type for the Access crates.
#[derive(Debug, Error)]
pub enum AccessError {
    /// A configuration document is missing, malformed, or inconsistent.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// A group name does not satisfy the naming rules.
    #[error("invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// An access-time key or requested end time could not be interpreted.
    #[error("invalid access time '{value}'")]
    InvalidAccessTime { value: String },

    /// An entity snapshot supplied by the caller could not be decoded.
    #[error("snapshot error: {reason}")]
    SnapshotError { reason: String },
}

/// Convenience alias used throughout the Access crates.
pub type AccessResult<T> = Result<T, AccessError>;
