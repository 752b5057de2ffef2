//! Error types for shardfile
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using ShardError
pub type Result<T> = std::result::Result<T, ShardError>;

/// Unified error type for shard operations
#[derive(Debug, Error)]
pub enum ShardError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("short read: expected {expected} bytes")]
    ShortRead { expected: usize },

    // -------------------------------------------------------------------------
    // Format Errors
    // -------------------------------------------------------------------------
    #[error("bad magic: not a shard file, or shard is not sealed")]
    BadMagic,

    #[error("unsupported shard version: {0}")]
    UnsupportedVersion(u64),

    #[error("corrupt shard: {0}")]
    Corrupt(String),

    // -------------------------------------------------------------------------
    // State Errors
    // -------------------------------------------------------------------------
    #[error("invalid shard state: {0}")]
    BadState(String),

    #[error("object index overflow: {declared} objects were declared at create")]
    IndexOverflow { declared: u64 },

    // -------------------------------------------------------------------------
    // MPHF Errors
    // -------------------------------------------------------------------------
    #[error("MPHF build failed: {0}")]
    MphfBuildFailed(String),

    #[error("MPHF blob codec error: {0}")]
    MphfCodec(String),

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("key not found")]
    KeyNotFound,

    // -------------------------------------------------------------------------
    // Resource Errors
    // -------------------------------------------------------------------------
    #[error("allocation of {0} bytes failed")]
    OutOfMemory(usize),
}
