//! Shard Reader
//!
//! Opens a sealed shard and answers point lookups: two seeks, three
//! short reads and one payload read per object.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use boomphf::Mphf;

use crate::error::{Result, ShardError};
use crate::fileio::{read_exact_or_short, read_u64_net, seek_to};

use super::{mphf, Header, ShardKey};

/// Reader over a sealed shard file
///
/// A reader owns its file handle and position, so multiple independent
/// readers on the same shard are safe; a single reader is not meant to
/// be shared across threads.
pub struct ShardReader {
    /// File handle, repositioned per lookup
    file: BufReader<File>,
    /// Header loaded and validated at open
    header: Header,
    /// MPHF loaded from the blob at `hash_position`
    mphf: Mphf<ShardKey>,
    /// Size of the object the file is currently positioned at, set by a
    /// size lookup and consumed by the following object read
    pending_size: Option<u64>,
}

impl ShardReader {
    /// Open a sealed shard: validate the magic, load the header, then
    /// load the MPHF blob.
    ///
    /// An unsealed or half-finalized file fails with `BadMagic`, since
    /// the magic is the last thing finalize writes.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mut file = BufReader::new(file);

        Header::check_magic(&mut file)?;
        let header = Header::read_from(&mut file)?;

        seek_to(&mut file, header.hash_position)?;
        let mphf = mphf::load(&mut file)?;

        tracing::debug!(
            path = %path.display(),
            objects = header.objects_count,
            "shard opened"
        );

        Ok(Self {
            file,
            header,
            mphf,
            pending_size: None,
        })
    }

    /// Decoded header of the opened shard.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Number of objects stored in the shard.
    pub fn objects_count(&self) -> u64 {
        self.header.objects_count
    }

    /// Size of the object stored under `key`, leaving the file
    /// positioned at the object bytes for [`lookup_object`](Self::lookup_object).
    ///
    /// The MPHF performs no membership check: a key that was never
    /// written either fails `KeyNotFound` or silently resolves to some
    /// other object's slot. Callers needing certainty re-verify the
    /// returned bytes against their own hash of the key.
    pub fn lookup_object_size(&mut self, key: &ShardKey) -> Result<u64> {
        self.pending_size = None;

        let slot = mphf::search(&self.mphf, key).ok_or(ShardError::KeyNotFound)?;
        // slot < objects_count for any key the MPHF answers
        seek_to(&mut self.file, self.header.index_position + slot * 8)?;
        let object_offset = read_u64_net(&mut self.file)?;

        seek_to(&mut self.file, object_offset)?;
        let object_size = read_u64_net(&mut self.file)?;

        self.pending_size = Some(object_size);
        Ok(object_size)
    }

    /// Read the object bytes positioned by the preceding
    /// [`lookup_object_size`](Self::lookup_object_size) into `buf`.
    ///
    /// `buf` must be exactly as long as the size returned by that
    /// lookup; calling this without one fails `BadState`.
    pub fn lookup_object(&mut self, buf: &mut [u8]) -> Result<()> {
        let size = self.pending_size.take().ok_or_else(|| {
            ShardError::BadState("lookup_object without a preceding size lookup".into())
        })?;
        if buf.len() as u64 != size {
            return Err(ShardError::BadState(format!(
                "output buffer is {} bytes, object is {}",
                buf.len(),
                size
            )));
        }
        read_exact_or_short(&mut self.file, buf)
    }

    /// Fetch the object stored under `key`.
    ///
    /// Fused form of the size + object lookups. The output buffer is
    /// reserved fallibly, so a garbage size prefix (corrupt file, or a
    /// missing key resolving to a bogus slot) surfaces as `OutOfMemory`
    /// or `ShortRead` rather than an abort.
    pub fn lookup(&mut self, key: &ShardKey) -> Result<Vec<u8>> {
        let size = self.lookup_object_size(key)?;
        let len =
            usize::try_from(size).map_err(|_| ShardError::OutOfMemory(usize::MAX))?;

        let mut buf = Vec::new();
        buf.try_reserve_exact(len)
            .map_err(|_| ShardError::OutOfMemory(len))?;
        buf.resize(len, 0);

        self.lookup_object(&mut buf)?;
        Ok(buf)
    }
}
