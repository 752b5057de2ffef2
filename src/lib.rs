//! # shardfile
//!
//! Write-once, read-many object shards: a fixed set of fixed-width-keyed
//! binary objects stored in a single self-contained file, with any object
//! retrieved by key in O(1) disk accesses through a minimal perfect hash
//! function (MPHF) built over the keys at seal time.
//!
//! Built for large content-addressed archives (e.g. SHA-256 addressed
//! blobs): a shard is written once, sealed, and then served read-only.
//!
//! ## Architecture Overview
//!
//! ```text
//!   write path                          read path
//!
//! ┌─────────────┐                    ┌─────────────┐
//! │   caller    │                    │   caller    │
//! └──────┬──────┘                    └──────┬──────┘
//!        │ write(key, object)               │ lookup(key)
//!        ▼                                  ▼
//! ┌─────────────┐                    ┌─────────────┐
//! │ ShardWriter │                    │ ShardReader │
//! │  (Building) │                    │  (Reading)  │
//! └──────┬──────┘                    └──────┬──────┘
//!        │ finalize:                        │ MPHF.search(key)
//!        │  MPHF build → offset table      │  → offset table slot
//!        │  → MPHF blob → header → magic   │  → size prefix → bytes
//!        ▼                                  ▼
//! ┌──────────────────────────────────────────────────┐
//! │ magic │ header │ objects │ offset table │ MPHF   │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! A half-written shard carries no valid magic and fails to open; the
//! magic is the last thing finalize writes.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
mod fileio;
pub mod shard;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, ShardError};
pub use shard::{Header, ShardInfo, ShardKey, ShardReader, ShardWriter, KEY_LEN, SHARD_VERSION};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of shardfile
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
