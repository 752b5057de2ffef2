//! Shard Writer
//!
//! Appends keyed objects to a new shard file, then finalizes the
//! searchable footer: offset table, MPHF blob, header, magic.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, ShardError};
use crate::fileio::write_u64_net;

use super::mphf::{self, IndexEntry};
use super::{Header, ShardKey, MAGIC, OBJECTS_POSITION};

/// Metadata summary returned by [`ShardWriter::finalize`]
#[derive(Debug, Clone)]
pub struct ShardInfo {
    /// Path to the sealed shard file
    pub path: PathBuf,
    /// Header as written at finalize
    pub header: Header,
    /// Total file size in bytes
    pub file_size: u64,
}

/// Builder for a new shard file
///
/// Declare the object count up front, call `write()` exactly that many
/// times, then `finalize()` to seal the shard. A shard that was never
/// finalized carries no magic and fails to open.
pub struct ShardWriter {
    /// Output file path
    path: PathBuf,
    /// Buffered writer for the append phase
    writer: BufWriter<File>,
    /// Header under construction; offsets filled in at finalize
    header: Header,
    /// In-memory index: staged (key, offset) pairs, also the MPHF key source
    index: Vec<IndexEntry>,
    /// Current write position (tracked to avoid flushing seeks)
    position: u64,
}

impl ShardWriter {
    /// Create a shard for exactly `objects_count` objects.
    ///
    /// Truncates the file at `path` if it already exists. The magic and
    /// header bytes are zeroed placeholders until finalize, so the file
    /// stays detectably unsealed while objects are appended.
    pub fn create(path: &Path, objects_count: u64) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let mut writer = BufWriter::new(file);
        writer.write_all(&[0u8; OBJECTS_POSITION as usize])?;

        let capacity = objects_count as usize;
        let mut index = Vec::new();
        index.try_reserve_exact(capacity).map_err(|_| {
            ShardError::OutOfMemory(capacity.saturating_mul(std::mem::size_of::<IndexEntry>()))
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            writer,
            header: Header::new(objects_count),
            index,
            position: OBJECTS_POSITION,
        })
    }

    /// Append one object under `key`.
    ///
    /// Records the key and the record's offset in the in-memory index,
    /// then writes the size-prefixed object bytes. Object offsets are
    /// strictly increasing in call order.
    ///
    /// Duplicate keys are not detected here; the MPHF build rejects
    /// them at finalize.
    pub fn write(&mut self, key: &ShardKey, object: &[u8]) -> Result<()> {
        if self.index.len() as u64 >= self.header.objects_count {
            return Err(ShardError::IndexOverflow {
                declared: self.header.objects_count,
            });
        }

        self.index.push(IndexEntry {
            key: *key,
            offset: self.position,
        });

        write_u64_net(&mut self.writer, object.len() as u64)?;
        self.writer.write_all(object)?;
        self.position += 8 + object.len() as u64;

        Ok(())
    }

    /// Number of objects written so far.
    pub fn written_count(&self) -> u64 {
        self.index.len() as u64
    }

    /// Seal the shard.
    ///
    /// Five steps in strict order, each failure aborting: compute the
    /// objects region extent, build the MPHF over the staged keys,
    /// write the offset table, dump the MPHF blob, then rewrite the
    /// header followed by the magic. The magic lands last, so a crash
    /// anywhere before it leaves a file without valid magic.
    ///
    /// Flushes and fsyncs before returning; no atomic rename is
    /// performed.
    pub fn finalize(mut self) -> Result<ShardInfo> {
        let written = self.index.len() as u64;
        if written != self.header.objects_count {
            return Err(ShardError::BadState(format!(
                "{} objects written, {} declared at create",
                written, self.header.objects_count
            )));
        }

        // (a) objects region extent
        self.header.objects_size = self.position - OBJECTS_POSITION;

        // (b) minimal perfect hash over the staged keys
        tracing::debug!(objects = written, "building MPHF");
        let mphf = mphf::build(&self.index)?;

        // (c) offset table: one slot per MPHF value
        self.header.index_position = OBJECTS_POSITION + self.header.objects_size;
        self.header.index_size = written * 8;
        let mut table = vec![0u64; self.index.len()];
        for entry in &self.index {
            let slot = mphf::search(&mphf, &entry.key).ok_or_else(|| {
                ShardError::MphfBuildFailed("staged key missing from built MPHF".into())
            })?;
            table[slot as usize] = entry.offset;
        }
        self.writer.seek(SeekFrom::Start(self.header.index_position))?;
        for offset in &table {
            write_u64_net(&mut self.writer, *offset)?;
        }

        // (d) MPHF blob; self-describing length, no trailing marker
        self.header.hash_position = self.header.index_position + self.header.index_size;
        mphf::dump(&mphf, &mut self.writer)?;
        self.writer.flush()?;

        // (e) header, then magic last
        let mut file = self
            .writer
            .into_inner()
            .map_err(|e| ShardError::Io(e.into_error()))?;
        file.seek(SeekFrom::Start(MAGIC.len() as u64))?;
        self.header.write_to(&mut file)?;
        file.seek(SeekFrom::Start(0))?;
        Header::write_magic(&mut file)?;
        file.sync_all()?;

        let file_size = file.metadata()?.len();
        tracing::info!(
            path = %self.path.display(),
            objects = written,
            file_size,
            "shard sealed"
        );

        Ok(ShardInfo {
            path: self.path,
            header: self.header,
            file_size,
        })
    }
}
