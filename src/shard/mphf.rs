//! MPHF adapter
//!
//! Presents the writer's in-memory index to the MPHF library and owns
//! the construction parameters and blob codec. The index doubles as the
//! staging area for object offsets and as the key source for the hash
//! build, which avoids a second pass over the objects region on disk.
//!
//! The MPHF maps the exact key set bijectively onto
//! `[0, objects_count)`. For a key outside the set it answers with an
//! arbitrary slot or no slot at all; membership is never checked.

use std::collections::HashSet;
use std::io::{Read, Write};

use boomphf::Mphf;

use crate::error::{Result, ShardError};

use super::{ShardKey, MPHF_GAMMA};

/// One staged object: its key and the offset of its record in the
/// objects region.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IndexEntry {
    pub key: ShardKey,
    pub offset: u64,
}

/// Build the minimal perfect hash over the staged keys.
///
/// Duplicate keys are screened here: the key set must be exact for the
/// construction to be a bijection, and the library does not terminate
/// on a set it cannot make one from.
pub(crate) fn build(entries: &[IndexEntry]) -> Result<Mphf<ShardKey>> {
    let mut seen: HashSet<&ShardKey> = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !seen.insert(&entry.key) {
            return Err(ShardError::MphfBuildFailed(format!(
                "duplicate key {}",
                hex::encode(entry.key)
            )));
        }
    }
    let keys: Vec<ShardKey> = entries.iter().map(|e| e.key).collect();
    Ok(Mphf::new(MPHF_GAMMA, &keys))
}

/// Slot assigned to `key`, `None` when the MPHF does not recognize it.
///
/// Every key that was in the build set gets `Some` slot below the key
/// count; a foreign key may still get `Some` arbitrary slot.
pub(crate) fn search(mphf: &Mphf<ShardKey>, key: &ShardKey) -> Option<u64> {
    mphf.try_hash(key)
}

/// Serialize the MPHF blob at the writer's current position.
///
/// The blob is self-describing; its length is whatever the codec
/// produces and no trailing marker follows it.
pub(crate) fn dump(mphf: &Mphf<ShardKey>, writer: &mut impl Write) -> Result<()> {
    bincode::serialize_into(writer, mphf).map_err(|e| ShardError::MphfCodec(e.to_string()))
}

/// Load a blob written by [`dump`] from the reader's current position.
pub(crate) fn load(reader: &mut impl Read) -> Result<Mphf<ShardKey>> {
    bincode::deserialize_from(reader).map_err(|e| ShardError::MphfCodec(e.to_string()))
}
