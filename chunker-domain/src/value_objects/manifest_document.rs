// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Manifest Document
//!
//! The on-disk shape of a repo, shared verbatim between the shareable
//! manifest and the private state file. `state = true` additionally
//! populates `root` and the per-chunk `saved` flags carried inside each
//! `ChunkDescriptor`'s owning `Chunk`; this value object only models the
//! fields both forms agree on, since the difference is entirely about which
//! optional fields are populated, not a different schema.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::value_objects::{RepoId, RepoType, VersionRecord};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestFileEntry {
    pub versions: Vec<VersionRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestDocument {
    pub name: String,
    #[serde(rename = "type")]
    pub repo_type: RepoType,
    pub uuid: RepoId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default)]
    pub peers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    /// Keyed by repo-relative path so a `BTreeMap` gives deterministic
    /// serialization order, which keeps manifest diffs meaningful.
    #[serde(default)]
    pub files: BTreeMap<PathBuf, ManifestFileEntry>,
}

impl ManifestDocument {
    pub fn new(name: impl Into<String>, repo_type: RepoType, uuid: RepoId) -> Self {
        Self {
            name: name.into(),
            repo_type,
            uuid,
            key: None,
            peers: Vec::new(),
            root: None,
            files: BTreeMap::new(),
        }
    }

    /// Produces the shareable form: drops `root` and per-chunk `saved`
    /// flags (those never appear in this value object anyway) and retains
    /// only the latest version of each file.
    pub fn into_shareable(mut self) -> Self {
        self.root = None;
        for entry in self.files.values_mut() {
            if let Some(latest) = entry
                .versions
                .iter()
                .max_by(|a, b| a.ordering_key().cmp(&b.ordering_key()))
                .cloned()
            {
                entry.versions = vec![latest];
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shareable_form_keeps_only_latest_version() {
        let mut doc = ManifestDocument::new("pub", RepoType::Static, RepoId::generate());
        doc.root = Some(PathBuf::from("/srv/repo"));
        doc.files.insert(
            PathBuf::from("a.txt"),
            ManifestFileEntry {
                versions: vec![VersionRecord::new(10, None), VersionRecord::new(20, None)],
            },
        );
        let shareable = doc.into_shareable();
        assert!(shareable.root.is_none());
        assert_eq!(shareable.files[&PathBuf::from("a.txt")].versions.len(), 1);
        assert_eq!(shareable.files[&PathBuf::from("a.txt")].versions[0].timestamp, 20);
    }

    #[test]
    fn round_trips_through_json() {
        let doc = ManifestDocument::new("pub", RepoType::Share, RepoId::generate());
        let json = serde_json::to_string(&doc).unwrap();
        let back: ManifestDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, doc.name);
        assert_eq!(back.uuid, doc.uuid);
    }
}
