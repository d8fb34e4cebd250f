// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Chunker Service
//!
//! Splits a file into an ordered, lazily-produced sequence of chunk
//! descriptors paired with their byte offsets. The domain only defines the
//! contract; the fixed-size, 1 MiB implementation used in production lives
//! in infrastructure since it performs file I/O.

use crate::value_objects::ChunkDescriptor;
use crate::ChunkerError;
use std::path::Path;

/// A chunk descriptor together with the byte offset it starts at, in the
/// order the chunker produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetChunk {
    pub offset: u64,
    pub descriptor: ChunkDescriptor,
}

pub trait ChunkerService: Send + Sync {
    /// Slices `path` into offset-tagged chunk descriptors, hashed with this
    /// chunker's configured algorithm.
    fn slice(&self, path: &Path) -> Result<Vec<OffsetChunk>, ChunkerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_chunk_is_comparable() {
        use crate::value_objects::HashAlgorithm;
        let a = OffsetChunk {
            offset: 0,
            descriptor: ChunkDescriptor::new(HashAlgorithm::Sha256, 4, "aa"),
        };
        let b = a.clone();
        assert_eq!(a, b);
    }
}
