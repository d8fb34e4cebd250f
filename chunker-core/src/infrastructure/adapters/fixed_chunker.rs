// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Fixed-Size Chunker Adapter
//!
//! The production `ChunkerService` implementation: reads a file sequentially
//! in 1 MiB slices, hashing each with a configured `HashAlgorithm`. The final
//! slice holds whatever tail bytes remain and may be shorter than 1 MiB; an
//! exact multiple of the slice size produces no trailing empty record.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chunker_domain::services::{ChecksumService, ChunkerService, OffsetChunk};
use chunker_domain::value_objects::{ChunkDescriptor, HashAlgorithm};
use chunker_domain::ChunkerError;

pub const CHUNK_SIZE: usize = 1024 * 1024;

pub struct FixedSizeChunker<C: ChecksumService> {
    checksum: C,
    hash_type: HashAlgorithm,
}

impl<C: ChecksumService> FixedSizeChunker<C> {
    pub fn new(checksum: C, hash_type: HashAlgorithm) -> Result<Self, ChunkerError> {
        hash_type.for_new_chunks()?;
        Ok(Self { checksum, hash_type })
    }
}

impl<C: ChecksumService> ChunkerService for FixedSizeChunker<C> {
    fn slice(&self, path: &Path) -> Result<Vec<OffsetChunk>, ChunkerError> {
        let mut file = File::open(path).map_err(ChunkerError::from)?;
        let mut offset = 0u64;
        let mut chunks = Vec::new();
        let mut buf = vec![0u8; CHUNK_SIZE];

        loop {
            let n = read_fill(&mut file, &mut buf)?;
            if n == 0 {
                break;
            }
            let descriptor = ChunkDescriptor::new(self.hash_type, n as u64, self.checksum.digest(self.hash_type, &buf[..n]));
            chunks.push(OffsetChunk { offset, descriptor });
            offset += n as u64;
            if n < CHUNK_SIZE {
                break;
            }
        }
        Ok(chunks)
    }
}

/// Reads until `buf` is full or EOF, returning the number of bytes read.
/// Unlike `Read::read`, a short read here means EOF, not "try again".
fn read_fill(file: &mut File, buf: &mut [u8]) -> Result<usize, ChunkerError> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = file.read(&mut buf[filled..]).map_err(ChunkerError::from)?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chunker_domain::services::Sha2Sha3Md5ChecksumService;
    use std::io::Write;

    fn chunker() -> FixedSizeChunker<Sha2Sha3Md5ChecksumService> {
        FixedSizeChunker::new(Sha2Sha3Md5ChecksumService, HashAlgorithm::Sha256).unwrap()
    }

    #[test]
    fn rejects_md5_for_new_chunks() {
        assert!(FixedSizeChunker::new(Sha2Sha3Md5ChecksumService, HashAlgorithm::Md5).is_err());
    }

    #[test]
    fn empty_file_produces_no_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty");
        File::create(&path).unwrap();
        let chunks = chunker().slice(&path).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn small_file_produces_one_chunk_at_offset_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.txt");
        std::fs::write(&path, b"hello world").unwrap();
        let chunks = chunker().slice(&path).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].offset, 0);
        assert_eq!(chunks[0].descriptor.length, 11);
        assert_eq!(
            chunks[0].descriptor.hash,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde"
        );
    }

    #[test]
    fn file_spanning_exact_multiple_has_no_trailing_empty_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exact");
        let mut f = File::create(&path).unwrap();
        f.write_all(&vec![7u8; CHUNK_SIZE * 2]).unwrap();
        let chunks = chunker().slice(&path).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].descriptor.length, CHUNK_SIZE as u64);
    }

    #[test]
    fn file_with_tail_produces_short_final_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tail");
        let mut f = File::create(&path).unwrap();
        f.write_all(&vec![1u8; CHUNK_SIZE + 10]).unwrap();
        let chunks = chunker().slice(&path).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].descriptor.length, CHUNK_SIZE as u64);
        assert_eq!(chunks[1].descriptor.length, 10);
        assert_eq!(chunks[1].offset, CHUNK_SIZE as u64);
    }

    #[test]
    fn offsets_are_running_sum_of_lengths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("multi");
        let mut f = File::create(&path).unwrap();
        f.write_all(&vec![3u8; CHUNK_SIZE * 3 + 5]).unwrap();
        let chunks = chunker().slice(&path).unwrap();
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[3].offset, (CHUNK_SIZE * 3) as u64);
    }
}
