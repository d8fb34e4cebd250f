// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Chunk Descriptor Value Object
//!
//! The wire/manifest-facing shape of a chunk: just enough to compute its
//! identity and to re-hydrate a `Chunk` entity against a known offset. This
//! is the structured replacement for the loose `{hash_type, length, hash}`
//! maps the manifest format exposes.

use serde::{Deserialize, Serialize};

use crate::value_objects::HashAlgorithm;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkDescriptor {
    pub hash_type: HashAlgorithm,
    pub length: u64,
    pub hash: String,
}

impl ChunkDescriptor {
    pub fn new(hash_type: HashAlgorithm, length: u64, hash: impl Into<String>) -> Self {
        Self {
            hash_type,
            length,
            hash: hash.into(),
        }
    }

    /// The identity string `"{hash_type}:{length}:{hash}"` shared by every
    /// chunk with this content, regardless of which file it lives in.
    pub fn id(&self) -> String {
        format!("{}:{}:{}", self.hash_type, self.length, self.hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_matches_literal_scenario() {
        let d = ChunkDescriptor::new(HashAlgorithm::Md5, 6, "5a8dd3ad0756a93ded72b823b19dd877");
        assert_eq!(d.id(), "md5:6:5a8dd3ad0756a93ded72b823b19dd877");
    }

    #[test]
    fn identical_descriptors_share_identity() {
        let a = ChunkDescriptor::new(HashAlgorithm::Sha256, 1024, "deadbeef");
        let b = ChunkDescriptor::new(HashAlgorithm::Sha256, 1024, "deadbeef");
        assert_eq!(a.id(), b.id());
    }
}
