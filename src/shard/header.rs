//! Header & magic codec
//!
//! Serializes and deserializes the fixed-size metadata block at the
//! front of every shard file.

use std::io::{Read, Write};

use crate::error::{Result, ShardError};
use crate::fileio::{read_exact_or_short, read_u64_net, write_u64_net};

use super::{MAGIC, OBJECTS_POSITION, SHARD_VERSION};

/// Fixed-size shard metadata block, stored at offset `|MAGIC|`
///
/// Seven u64 fields in network byte order. The offsets are algebraically
/// derivable from `objects_count` and `objects_size` but stored anyway,
/// so future versions can grow the header or add optional regions; the
/// algebra is re-verified on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Format version, must equal [`SHARD_VERSION`](super::SHARD_VERSION)
    pub version: u64,
    /// Number of objects stored in the shard
    pub objects_count: u64,
    /// First byte of the objects region: |MAGIC| + 56
    pub objects_position: u64,
    /// Total byte length of the objects region
    pub objects_size: u64,
    /// First byte of the offset table
    pub index_position: u64,
    /// Byte length of the offset table: objects_count × 8
    pub index_size: u64,
    /// First byte of the MPHF blob, which runs to EOF
    pub hash_position: u64,
}

impl Header {
    /// Fresh header for a shard under construction.
    ///
    /// Only the version, object count and objects position are known
    /// before finalize; the remaining fields stay zero until then.
    pub(crate) fn new(objects_count: u64) -> Self {
        Self {
            version: SHARD_VERSION,
            objects_count,
            objects_position: OBJECTS_POSITION,
            objects_size: 0,
            index_position: 0,
            index_size: 0,
            hash_position: 0,
        }
    }

    /// Read and compare the magic at the reader's current position.
    ///
    /// A mismatch also covers the "file not yet sealed" case, since the
    /// magic is the last thing finalize writes.
    pub(crate) fn check_magic(reader: &mut impl Read) -> Result<()> {
        let mut magic = [0u8; MAGIC.len()];
        read_exact_or_short(reader, &mut magic)?;
        if &magic != MAGIC {
            return Err(ShardError::BadMagic);
        }
        Ok(())
    }

    /// Write the magic at the writer's current position.
    pub(crate) fn write_magic(writer: &mut impl Write) -> Result<()> {
        writer.write_all(MAGIC)?;
        Ok(())
    }

    /// Decode the seven fields, gate on the version, then verify the
    /// offset algebra.
    pub(crate) fn read_from(reader: &mut impl Read) -> Result<Self> {
        let version = read_u64_net(reader)?;
        let objects_count = read_u64_net(reader)?;
        let objects_position = read_u64_net(reader)?;
        let objects_size = read_u64_net(reader)?;
        let index_position = read_u64_net(reader)?;
        let index_size = read_u64_net(reader)?;
        let hash_position = read_u64_net(reader)?;

        if version != SHARD_VERSION {
            return Err(ShardError::UnsupportedVersion(version));
        }

        let header = Self {
            version,
            objects_count,
            objects_position,
            objects_size,
            index_position,
            index_size,
            hash_position,
        };
        header.validate()?;
        Ok(header)
    }

    /// Encode all seven fields.
    ///
    /// No consistency checks here; finalize is responsible for writing
    /// a header whose algebra holds.
    pub(crate) fn write_to(&self, writer: &mut impl Write) -> Result<()> {
        for field in [
            self.version,
            self.objects_count,
            self.objects_position,
            self.objects_size,
            self.index_position,
            self.index_size,
            self.hash_position,
        ] {
            write_u64_net(writer, field)?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.objects_position != OBJECTS_POSITION {
            return Err(ShardError::Corrupt(format!(
                "objects_position is {}, expected {}",
                self.objects_position, OBJECTS_POSITION
            )));
        }
        let index_position = self
            .objects_position
            .checked_add(self.objects_size)
            .ok_or_else(|| ShardError::Corrupt("objects region overflows u64".into()))?;
        if self.index_position != index_position {
            return Err(ShardError::Corrupt(format!(
                "index_position is {}, expected {}",
                self.index_position, index_position
            )));
        }
        let index_size = self
            .objects_count
            .checked_mul(8)
            .ok_or_else(|| ShardError::Corrupt("offset table overflows u64".into()))?;
        if self.index_size != index_size {
            return Err(ShardError::Corrupt(format!(
                "index_size is {}, expected {}",
                self.index_size, index_size
            )));
        }
        let hash_position = self
            .index_position
            .checked_add(self.index_size)
            .ok_or_else(|| ShardError::Corrupt("offset table overflows u64".into()))?;
        if self.hash_position != hash_position {
            return Err(ShardError::Corrupt(format!(
                "hash_position is {}, expected {}",
                self.hash_position, hash_position
            )));
        }
        Ok(())
    }
}
