// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Version Record Value Object
//!
//! The single tagged structure that flows into `Repo::update` from every
//! source: the filesystem scan, the fs-watcher adapter, and the manifest
//! loader. Replaces the loose JSON-dict style of passing version data
//! around.

use serde::{Deserialize, Serialize};

use crate::value_objects::ChunkDescriptor;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub timestamp: i64,
    #[serde(default)]
    pub deleted: bool,
    /// `None` means "recompute from the bytes currently on disk".
    #[serde(default)]
    pub chunks: Option<Vec<ChunkDescriptor>>,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_hostname")]
    pub hostname: String,
}

fn default_username() -> String {
    "Origin User".to_string()
}

fn default_hostname() -> String {
    "Origin Host".to_string()
}

impl VersionRecord {
    pub fn new(timestamp: i64, chunks: Option<Vec<ChunkDescriptor>>) -> Self {
        Self {
            timestamp,
            deleted: false,
            chunks,
            username: default_username(),
            hostname: default_hostname(),
        }
    }

    pub fn deletion(timestamp: i64) -> Self {
        Self {
            timestamp,
            deleted: true,
            chunks: Some(Vec::new()),
            username: default_username(),
            hostname: default_hostname(),
        }
    }

    pub fn with_author(mut self, username: impl Into<String>, hostname: impl Into<String>) -> Self {
        self.username = username.into();
        self.hostname = hostname.into();
        self
    }

    /// Deterministic ordering key for merging concurrently-authored versions
    /// that happen to share a timestamp: timestamp, then author identity,
    /// so merge order is reproducible across nodes rather than depending on
    /// insertion order.
    pub fn ordering_key(&self) -> (i64, &str, &str) {
        (self.timestamp, self.username.as_str(), self.hostname.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deletion_has_empty_chunk_list() {
        let v = VersionRecord::deletion(30);
        assert!(v.deleted);
        assert_eq!(v.chunks, Some(Vec::new()));
    }

    #[test]
    fn ordering_key_breaks_timestamp_ties_by_author() {
        let a = VersionRecord::new(10, None).with_author("alice", "host-a");
        let b = VersionRecord::new(10, None).with_author("bob", "host-b");
        assert!(a.ordering_key() < b.ordering_key());
    }

    #[test]
    fn defaults_apply_when_fields_omitted() {
        let json = r#"{"timestamp": 5}"#;
        let v: VersionRecord = serde_json::from_str(json).unwrap();
        assert!(!v.deleted);
        assert_eq!(v.username, "Origin User");
        assert_eq!(v.chunks, None);
    }
}
