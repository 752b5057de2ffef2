//! On-disk format tests
//!
//! These tests verify:
//! - Header field equality across finalize and reopen
//! - The header offset algebra
//! - Magic validation, including the unsealed-file case
//! - Version gating
//! - Network byte order of the raw header bytes
//! - Behavior on truncated and corrupted files

use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use tempfile::TempDir;

use shardfile::{ShardError, ShardInfo, ShardKey, ShardReader, ShardWriter, SHARD_VERSION};

// Header field layout after the 8-byte magic: each field is a u64 BE
const MAGIC_LEN: u64 = 8;
const FIELD_VERSION: u64 = MAGIC_LEN;
const FIELD_OBJECTS_COUNT: u64 = MAGIC_LEN + 8;
const FIELD_INDEX_POSITION: u64 = MAGIC_LEN + 4 * 8;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_shard() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("test.shard");
    (temp_dir, path)
}

fn build_small_shard(path: &PathBuf, count: u8) -> ShardInfo {
    let mut writer = ShardWriter::create(path, count as u64).unwrap();
    for i in 0..count {
        let k: ShardKey = [i; 32];
        writer.write(&k, format!("object{}", i).as_bytes()).unwrap();
    }
    writer.finalize().unwrap()
}

/// Overwrite `bytes` at `offset` in an existing shard file
fn patch_file(path: &PathBuf, offset: u64, bytes: &[u8]) {
    let mut file = OpenOptions::new().read(true).write(true).open(path).unwrap();
    file.seek(SeekFrom::Start(offset)).unwrap();
    file.write_all(bytes).unwrap();
}

// =============================================================================
// Header Tests
// =============================================================================

#[test]
fn test_header_reopen_matches_finalize() {
    let (_temp, path) = setup_temp_shard();
    let info = build_small_shard(&path, 5);

    let reader = ShardReader::open(&path).unwrap();
    assert_eq!(*reader.header(), info.header);
}

#[test]
fn test_header_offset_algebra() {
    let (_temp, path) = setup_temp_shard();
    build_small_shard(&path, 3);

    let reader = ShardReader::open(&path).unwrap();
    let h = reader.header();

    assert_eq!(h.version, SHARD_VERSION);
    assert_eq!(h.objects_position, 8 + 56);
    assert_eq!(h.index_position, h.objects_position + h.objects_size);
    assert_eq!(h.index_size, h.objects_count * 8);
    assert_eq!(h.hash_position, h.index_position + h.index_size);
}

#[test]
fn test_blob_runs_to_end_of_file() {
    let (_temp, path) = setup_temp_shard();
    let info = build_small_shard(&path, 3);

    assert!(info.header.hash_position < info.file_size);
    assert_eq!(info.file_size, std::fs::metadata(&path).unwrap().len());
}

// =============================================================================
// Magic Tests
// =============================================================================

#[test]
fn test_flipped_first_magic_byte_fails() {
    let (_temp, path) = setup_temp_shard();
    build_small_shard(&path, 2);

    patch_file(&path, 0, b"X");

    let result = ShardReader::open(&path);
    assert!(matches!(result, Err(ShardError::BadMagic)));
}

#[test]
fn test_flipped_last_magic_byte_fails() {
    let (_temp, path) = setup_temp_shard();
    build_small_shard(&path, 2);

    patch_file(&path, MAGIC_LEN - 1, b"X");

    let result = ShardReader::open(&path);
    assert!(matches!(result, Err(ShardError::BadMagic)));
}

#[test]
fn test_unsealed_shard_fails_open() {
    let (_temp, path) = setup_temp_shard();

    let mut writer = ShardWriter::create(&path, 1).unwrap();
    writer.write(&[0x01; 32], b"data").unwrap();
    // No finalize: the magic bytes are still the zeroed placeholder
    drop(writer);

    let result = ShardReader::open(&path);
    assert!(matches!(result, Err(ShardError::BadMagic)));
}

#[test]
fn test_open_nonexistent_file() {
    let (_temp, path) = setup_temp_shard();

    let result = ShardReader::open(&path);
    assert!(matches!(result, Err(ShardError::Io(_))));
}

// =============================================================================
// Version Tests
// =============================================================================

#[test]
fn test_version_bump_fails_open() {
    let (_temp, path) = setup_temp_shard();
    build_small_shard(&path, 2);

    patch_file(&path, FIELD_VERSION, &(SHARD_VERSION + 1).to_be_bytes());

    let result = ShardReader::open(&path);
    match result {
        Err(ShardError::UnsupportedVersion(v)) => assert_eq!(v, SHARD_VERSION + 1),
        other => panic!("expected UnsupportedVersion, got {:?}", other.map(|_| ())),
    }
}

// =============================================================================
// Endianness Tests
// =============================================================================

#[test]
fn test_header_fields_are_network_byte_order() {
    let (_temp, path) = setup_temp_shard();
    build_small_shard(&path, 3);

    let mut file = std::fs::File::open(&path).unwrap();
    file.seek(SeekFrom::Start(FIELD_OBJECTS_COUNT)).unwrap();
    let mut raw = [0u8; 8];
    file.read_exact(&mut raw).unwrap();

    // Big-endian on disk regardless of host order
    assert_eq!(raw, 3u64.to_be_bytes());
    assert_eq!(u64::from_be_bytes(raw), 3);
}

#[test]
fn test_object_size_prefix_is_network_byte_order() {
    let (_temp, path) = setup_temp_shard();

    let mut writer = ShardWriter::create(&path, 1).unwrap();
    writer.write(&[0x01; 32], b"hello").unwrap();
    let info = writer.finalize().unwrap();

    let mut file = std::fs::File::open(&path).unwrap();
    file.seek(SeekFrom::Start(info.header.objects_position))
        .unwrap();
    let mut raw = [0u8; 8];
    file.read_exact(&mut raw).unwrap();

    assert_eq!(raw, 5u64.to_be_bytes());
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_truncated_file_fails_with_short_read() {
    let (_temp, path) = setup_temp_shard();
    std::fs::write(&path, b"SHA").unwrap();

    let result = ShardReader::open(&path);
    assert!(matches!(result, Err(ShardError::ShortRead { .. })));
}

#[test]
fn test_truncated_blob_fails_open() {
    let (_temp, path) = setup_temp_shard();
    let info = build_small_shard(&path, 2);

    // Cut the file right where the MPHF blob begins
    let file = OpenOptions::new().write(true).open(&path).unwrap();
    file.set_len(info.header.hash_position).unwrap();

    let result = ShardReader::open(&path);
    assert!(matches!(result, Err(ShardError::MphfCodec(_))));
}

#[test]
fn test_corrupt_index_position_fails_open() {
    let (_temp, path) = setup_temp_shard();
    build_small_shard(&path, 2);

    patch_file(&path, FIELD_INDEX_POSITION, &u64::MAX.to_be_bytes());

    let result = ShardReader::open(&path);
    assert!(matches!(result, Err(ShardError::Corrupt(_))));
}

#[test]
fn test_corrupt_size_prefix_fails_lookup() {
    let (_temp, path) = setup_temp_shard();

    let mut writer = ShardWriter::create(&path, 1).unwrap();
    let k: ShardKey = [0x41; 32];
    writer.write(&k, b"AAAA").unwrap();
    let info = writer.finalize().unwrap();

    // Replace the object size prefix with a value far past EOF
    patch_file(
        &path,
        info.header.objects_position,
        &[0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF],
    );

    let mut reader = ShardReader::open(&path).unwrap();
    let result = reader.lookup(&k);
    assert!(matches!(
        result,
        Err(ShardError::ShortRead { .. }) | Err(ShardError::OutOfMemory(_))
    ));
}
