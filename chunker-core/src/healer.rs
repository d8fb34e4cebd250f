// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Self-Heal
//!
//! Cross-file chunk deduplication: any chunk identity already present
//! somewhere in the repo can fill a missing chunk elsewhere with the same
//! identity, with no network round trip. `self_heal` is a free function
//! over two chunk lists rather than a `Repo` method so it is independently
//! testable and so `Repo` can run it under its own lock without the healer
//! needing to know about locking at all.
//!
//! The correctness contract is an N×M set-membership match; sorting both
//! lists by identity and walking them in lockstep turns that into a linear
//! scan after the sort, which is the only speedup this implementation
//! takes over the naive nested loop.

use std::path::PathBuf;

use chunker_domain::entities::Chunk;

use crate::infrastructure::adapters::chunk_io;

/// A chunk together with the path of the file it currently lives in (or
/// should be written to).
pub struct ChunkLocation {
    pub chunk: Chunk,
    pub file_path: PathBuf,
}

/// Fills every chunk in `missing` whose identity matches some chunk in
/// `known`, writing its bytes via `chunk_io::save_data` and marking it
/// saved. Mtime/completion bookkeeping for the owning file is left to the
/// caller, since only `Repo` knows whether this write completes the file's
/// current version.
///
/// Returns the total bytes healed, or `-1` if either list is empty (per the
/// documented no-op contract — nothing to do, not zero chunks matched).
pub fn self_heal(known: &[ChunkLocation], missing: &mut [ChunkLocation]) -> i64 {
    if known.is_empty() || missing.is_empty() {
        return -1;
    }

    let mut known_sorted: Vec<&ChunkLocation> = known.iter().collect();
    known_sorted.sort_by(|a, b| a.chunk.id().cmp(&b.chunk.id()));

    let mut missing_order: Vec<usize> = (0..missing.len()).collect();
    missing_order.sort_by(|&a, &b| missing[a].chunk.id().cmp(&missing[b].chunk.id()));

    let mut healed_bytes: i64 = 0;
    let mut k = 0usize;
    for &m_idx in &missing_order {
        let missing_id = missing[m_idx].chunk.id();
        while k < known_sorted.len() && known_sorted[k].chunk.id() < missing_id {
            k += 1;
        }
        if k < known_sorted.len() && known_sorted[k].chunk.id() == missing_id {
            let data = chunk_io::get_data(&known_sorted[k].chunk, &known_sorted[k].file_path);
            if data.len() as u64 == known_sorted[k].chunk.length {
                let loc = &mut missing[m_idx];
                if chunk_io::save_data(&mut loc.chunk, &loc.file_path, &data, false, 0).is_ok() {
                    healed_bytes += loc.chunk.length as i64;
                }
            }
        }
    }

    healed_bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use chunker_domain::services::{ChecksumService, Sha2Sha3Md5ChecksumService};
    use chunker_domain::value_objects::{ChunkDescriptor, HashAlgorithm};

    fn chunk_for(data: &[u8]) -> Chunk {
        let digest = Sha2Sha3Md5ChecksumService.digest(HashAlgorithm::Md5, data);
        Chunk::new(0, ChunkDescriptor::new(HashAlgorithm::Md5, data.len() as u64, digest), false)
    }

    #[test]
    fn empty_known_is_a_no_op() {
        let mut missing = vec![];
        assert_eq!(self_heal(&[], &mut missing), -1);
    }

    #[test]
    fn empty_missing_is_a_no_op() {
        let known = vec![];
        assert_eq!(self_heal(&known, &mut vec![]), -1);
    }

    #[test]
    fn s1_heal_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let hello1 = dir.path().join("hello1.txt");
        let hello2 = dir.path().join("hello2.txt");
        std::fs::write(&hello1, b"hello!").unwrap();

        let mut known_chunk = chunk_for(b"hello!");
        known_chunk.mark_saved(true);
        let known = vec![ChunkLocation {
            chunk: known_chunk,
            file_path: hello1.clone(),
        }];

        let missing_chunk = chunk_for(b"hello!");
        let mut missing = vec![ChunkLocation {
            chunk: missing_chunk,
            file_path: hello2.clone(),
        }];

        let healed = self_heal(&known, &mut missing);
        assert_eq!(healed, 6);
        assert!(missing[0].chunk.saved);
        assert_eq!(std::fs::read(&hello2).unwrap(), b"hello!");
    }

    #[test]
    fn mismatched_identities_are_not_healed() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        std::fs::write(&a, b"foobar").unwrap();

        let mut known_chunk = chunk_for(b"foobar");
        known_chunk.mark_saved(true);
        let known = vec![ChunkLocation {
            chunk: known_chunk,
            file_path: a,
        }];

        let mut missing = vec![ChunkLocation {
            chunk: chunk_for(b"different"),
            file_path: b,
        }];

        assert_eq!(self_heal(&known, &mut missing), 0);
        assert!(!missing[0].chunk.saved);
    }
}
