//! File I/O primitives
//!
//! Thin, error-propagating wrappers around positioned reads and writes,
//! with network-byte-order conversion for the 64-bit on-disk fields.

use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Result, ShardError};

/// Read exactly `buf.len()` bytes.
///
/// Fewer bytes than requested is a `ShortRead`, never a silent truncation.
pub(crate) fn read_exact_or_short(reader: &mut impl Read, buf: &mut [u8]) -> Result<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => ShardError::ShortRead {
            expected: buf.len(),
        },
        _ => ShardError::Io(e),
    })
}

/// Read one u64 stored in network byte order.
pub(crate) fn read_u64_net(reader: &mut impl Read) -> Result<u64> {
    reader.read_u64::<BigEndian>().map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => ShardError::ShortRead { expected: 8 },
        _ => ShardError::Io(e),
    })
}

/// Write one u64 in network byte order.
pub(crate) fn write_u64_net(writer: &mut impl Write, value: u64) -> Result<()> {
    writer.write_u64::<BigEndian>(value)?;
    Ok(())
}

/// Seek to an absolute offset, returning the new position.
pub(crate) fn seek_to(seeker: &mut impl Seek, offset: u64) -> Result<u64> {
    Ok(seeker.seek(SeekFrom::Start(offset))?)
}
