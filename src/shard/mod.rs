//! Shard Module
//!
//! A shard is a single self-contained file holding a fixed set of
//! fixed-width-keyed binary objects plus a minimal perfect hash function
//! (MPHF) over the keys. Shards are written once, sealed, and then read
//! many times; any object is retrieved in O(1) disk accesses.
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Magic: "SHARDFL\0" (8 bytes)                                 │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Header (7 × u64 BE = 56 bytes)                               │
//! │   version | objects_count | objects_position | objects_size  │
//! │   index_position | index_size | hash_position                │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Objects region (at objects_position = 64)                    │
//! │   [Size: u64 BE][Object bytes]                               │
//! │   ... repeated objects_count times ...                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Offset table (at index_position)                             │
//! │   objects_count × u64 BE object offset, MPHF-slot ordered    │
//! ├──────────────────────────────────────────────────────────────┤
//! │ MPHF blob (at hash_position, opaque, runs to EOF)            │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! All integers on disk are in network byte order. Keys are not stored
//! in the file; the key width is a compile-time constant shared by
//! writer and reader. The magic is written last at finalize, so a file
//! without valid magic is detectably unsealed.

mod header;
mod mphf;
mod reader;
mod writer;

pub use header::Header;
pub use reader::ShardReader;
pub use writer::{ShardInfo, ShardWriter};

// =============================================================================
// Shared Constants (used by header, writer, reader)
// =============================================================================

/// Magic bytes identifying a sealed shard file
pub(crate) const MAGIC: &[u8; 8] = b"SHARDFL\0";

/// Current shard format version
pub const SHARD_VERSION: u64 = 1;

/// Fixed key width in bytes (SHA-256 digests)
pub const KEY_LEN: usize = 32;

/// Header size: 7 × u64 = 56 bytes, located at offset `|MAGIC|`
pub(crate) const HEADER_SIZE: u64 = 56;

/// First byte of the objects region: |MAGIC| + header
pub(crate) const OBJECTS_POSITION: u64 = MAGIC.len() as u64 + HEADER_SIZE;

/// MPHF load factor. Fixed: the serialized blob written at finalize must
/// be loadable by the same library build, so the construction parameter
/// is part of the on-disk contract.
pub(crate) const MPHF_GAMMA: f64 = 1.7;

/// A shard key: opaque fixed-width bytes
pub type ShardKey = [u8; KEY_LEN];
