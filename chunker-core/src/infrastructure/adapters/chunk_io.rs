// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Chunk I/O Adapter
//!
//! `chunker_domain::entities::Chunk` carries identity and position but never
//! touches disk itself (see its doc comment). This module is where the
//! domain-purity decision pays rent: `validate`, `get_data`, and `save_data`
//! all take a `&mut Chunk`/`&Chunk` plus the file path the chunk belongs to,
//! so the entity stays a plain value and these functions hold the only
//! syscalls.
//!
//! `save_data`'s timestamp policy keeps a partially-downloaded file
//! observably incomplete to external tools: its mtime only advances to the
//! version's timestamp once every chunk in the file is present.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use filetime::FileTime;

use chunker_domain::entities::Chunk;
use chunker_domain::services::ChecksumService;
use chunker_domain::ChunkerError;

/// Re-reads the byte range `chunk` claims, recomputes its hash, and updates
/// `chunk.saved`. Any I/O failure (missing file, short read) is treated as
/// "not saved" rather than propagated — validation failures are expected
/// and self-correcting (the chunk is simply re-requested).
pub fn validate(chunk: &mut Chunk, file_path: &Path, checksum: &dyn ChecksumService) {
    chunk.saved = read_range(file_path, chunk.offset, chunk.length)
        .map(|data| checksum.verify(chunk.hash_type, &data, &chunk.hash))
        .unwrap_or(false);
}

/// Returns the raw bytes at `chunk`'s byte range, or an empty vector if the
/// read fails for any reason.
pub fn get_data(chunk: &Chunk, file_path: &Path) -> Vec<u8> {
    read_range(file_path, chunk.offset, chunk.length).unwrap_or_default()
}

fn read_range(file_path: &Path, offset: u64, length: u64) -> Result<Vec<u8>, std::io::Error> {
    let mut file = File::open(file_path)?;
    file.seek(SeekFrom::Start(offset))?;
    let mut buf = vec![0u8; length as usize];
    file.read_exact(&mut buf)?;
    Ok(buf)
}

/// Writes `data` at `chunk.offset`, marks the chunk saved, and applies the
/// timestamp policy: the file's prior atime is preserved, and mtime only
/// advances to `version_timestamp` once `file_complete_after_write` is true;
/// otherwise mtime (and atime, for a brand-new file) stays at its prior
/// value, or `0` if the file did not exist before this write.
pub fn save_data(
    chunk: &mut Chunk,
    file_path: &Path,
    data: &[u8],
    file_complete_after_write: bool,
    version_timestamp: i64,
) -> Result<(), ChunkerError> {
    let existed = file_path.exists();
    let (prior_atime, prior_mtime) = if existed {
        let meta = std::fs::metadata(file_path).map_err(ChunkerError::from)?;
        (FileTime::from_last_access_time(&meta), FileTime::from_last_modification_time(&meta))
    } else {
        (FileTime::from_unix_time(0, 0), FileTime::from_unix_time(0, 0))
    };

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .open(file_path)
        .map_err(ChunkerError::from)?;
    file.seek(SeekFrom::Start(chunk.offset)).map_err(ChunkerError::from)?;
    file.write_all(data).map_err(ChunkerError::from)?;
    drop(file);

    let new_mtime = if file_complete_after_write {
        FileTime::from_unix_time(version_timestamp, 0)
    } else {
        prior_mtime
    };
    filetime::set_file_times(file_path, prior_atime, new_mtime).map_err(ChunkerError::from)?;

    chunk.mark_saved(true);
    Ok(())
}
