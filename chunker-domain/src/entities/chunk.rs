// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Chunk Entity
//!
//! A contiguous byte range of a file, identified by `(hash_type, length,
//! hash)`. The entity itself never touches disk — reading and writing the
//! bytes at `offset` is an infrastructure concern (see
//! `chunker_core::infrastructure::adapters::chunk_io`); this type only
//! carries identity, position, and the `saved` flag that records whether
//! the bytes at that position are currently known to match the hash.

use crate::value_objects::{ChunkDescriptor, HashAlgorithm};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub offset: u64,
    pub length: u64,
    pub hash_type: HashAlgorithm,
    pub hash: String,
    pub saved: bool,
}

impl Chunk {
    pub fn new(offset: u64, descriptor: ChunkDescriptor, saved: bool) -> Self {
        Self {
            offset,
            length: descriptor.length,
            hash_type: descriptor.hash_type,
            hash: descriptor.hash,
            saved,
        }
    }

    /// The identity string shared by every chunk with this content,
    /// regardless of which file or repo it belongs to.
    pub fn id(&self) -> String {
        format!("{}:{}:{}", self.hash_type, self.length, self.hash)
    }

    pub fn descriptor(&self) -> ChunkDescriptor {
        ChunkDescriptor::new(self.hash_type, self.length, self.hash.clone())
    }

    pub fn byte_range(&self) -> std::ops::Range<u64> {
        self.offset..(self.offset + self.length)
    }

    pub fn mark_saved(&mut self, saved: bool) {
        self.saved = saved;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> ChunkDescriptor {
        ChunkDescriptor::new(HashAlgorithm::Md5, 6, "5a8dd3ad0756a93ded72b823b19dd877")
    }

    #[test]
    fn id_matches_descriptor_id() {
        let c = Chunk::new(0, descriptor(), false);
        assert_eq!(c.id(), descriptor().id());
    }

    #[test]
    fn byte_range_spans_length_from_offset() {
        let c = Chunk::new(100, descriptor(), false);
        assert_eq!(c.byte_range(), 100..106);
    }

    #[test]
    fn mark_saved_mutates_flag() {
        let mut c = Chunk::new(0, descriptor(), false);
        assert!(!c.saved);
        c.mark_saved(true);
        assert!(c.saved);
    }
}
