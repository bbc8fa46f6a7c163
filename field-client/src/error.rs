//! Engine error types
//!
//! Transport-level problems never appear here: the engine absorbs them into
//! the offline fallback (`verify`) or leaves the affected event queued
//! (`drain`). What does surface is storage failure: a device that cannot
//! read or persist locally cannot guarantee delivery at all, and the caller
//! must see that as something other than a verification outcome.

use thiserror::Error;

use crate::store::StorageError;

/// Engine error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Local durable storage cannot be opened or a transaction failed
    #[error("Storage unavailable: {0}")]
    Storage(#[from] StorageError),

    /// Invalid engine configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for engine operations
pub type ClientResult<T> = Result<T, ClientError>;
