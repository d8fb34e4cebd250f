// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # File Version Entity
//!
//! An immutable snapshot of a file at a point in time: an ordered list of
//! chunks, a deletion flag, and the author who produced the version.
//! Versions are never mutated after construction; a File accumulates new
//! versions rather than editing old ones.

use crate::entities::Chunk;
use crate::value_objects::{ChunkDescriptor, VersionRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct FileVersion {
    pub timestamp: i64,
    pub deleted: bool,
    pub chunks: Vec<Chunk>,
    pub username: String,
    pub hostname: String,
}

impl FileVersion {
    /// Builds a version from manifest-supplied descriptors, assigning each
    /// chunk's offset as the running sum of preceding lengths. Chunks start
    /// unsaved; infrastructure validates them against whatever bytes
    /// already exist on disk.
    pub fn from_descriptors(record: &VersionRecord, descriptors: &[ChunkDescriptor]) -> Self {
        let mut offset = 0u64;
        let mut chunks = Vec::with_capacity(descriptors.len());
        for d in descriptors {
            chunks.push(Chunk::new(offset, d.clone(), false));
            offset += d.length;
        }
        Self {
            timestamp: record.timestamp,
            deleted: record.deleted,
            chunks,
            username: record.username.clone(),
            hostname: record.hostname.clone(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.get_missing_chunks().is_empty()
    }

    pub fn get_missing_chunks(&self) -> Vec<&Chunk> {
        self.chunks.iter().filter(|c| !c.saved).collect()
    }

    pub fn get_known_chunks(&self) -> Vec<&Chunk> {
        self.chunks.iter().filter(|c| c.saved).collect()
    }

    pub fn total_length(&self) -> u64 {
        self.chunks.iter().map(|c| c.length).sum()
    }

    /// Deterministic ordering key used to break timestamp ties when
    /// multiple versions of a file merge from different peers.
    pub fn ordering_key(&self) -> (i64, &str, &str) {
        (self.timestamp, self.username.as_str(), self.hostname.as_str())
    }
}
