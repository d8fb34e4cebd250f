// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # File Entity
//!
//! The ordered version history of one repo-relative path. A File owns its
//! versions outright; it never shares them with another File. The current
//! version is always the version with the largest timestamp, ties broken
//! deterministically by author identity (see `FileVersion::ordering_key`)
//! rather than by insertion order, so merge order is reproducible no
//! matter which node observed versions in which sequence.

use std::path::{Path, PathBuf};

use crate::entities::FileVersion;
use crate::ChunkerError;

#[derive(Debug, Clone)]
pub struct File {
    pub repo_relative_path: PathBuf,
    versions: Vec<FileVersion>,
}

impl File {
    /// Validates that `repo_relative_path`, once joined to `repo_root`,
    /// does not escape the repo root, then constructs an empty File.
    pub fn new(repo_root: &Path, repo_relative_path: PathBuf) -> Result<Self, ChunkerError> {
        Self::assert_contains(repo_root, &repo_relative_path)?;
        Ok(Self {
            repo_relative_path,
            versions: Vec::new(),
        })
    }

    fn assert_contains(repo_root: &Path, repo_relative_path: &Path) -> Result<(), ChunkerError> {
        if repo_relative_path.is_absolute() {
            return Err(ChunkerError::invalid_path(format!(
                "'{}' must be relative to the repo root",
                repo_relative_path.display()
            )));
        }
        if repo_relative_path
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(ChunkerError::invalid_path(format!(
                "'{}' escapes repo root '{}'",
                repo_relative_path.display(),
                repo_root.display()
            )));
        }
        Ok(())
    }

    pub fn absolute_path(&self, repo_root: &Path) -> PathBuf {
        repo_root.join(&self.repo_relative_path)
    }

    /// Inserts a new version and re-sorts ascending by its ordering key.
    /// Stable: versions that tie in ordering key keep their relative
    /// insertion order.
    pub fn merge_version(&mut self, version: FileVersion) {
        self.versions.push(version);
        self.versions
            .sort_by(|a, b| a.ordering_key().cmp(&b.ordering_key()));
    }

    pub fn versions(&self) -> &[FileVersion] {
        &self.versions
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn current_version(&self) -> Option<&FileVersion> {
        self.versions.last()
    }

    /// Mutable access to the current version, for infrastructure adapters
    /// that fill in chunk bytes (`add_chunk`, self-heal) after construction.
    pub fn current_version_mut(&mut self) -> Option<&mut FileVersion> {
        self.versions.last_mut()
    }

    pub fn is_complete(&self) -> bool {
        self.current_version().is_some_and(FileVersion::is_complete)
    }

    pub fn is_deleted(&self) -> bool {
        self.current_version().is_some_and(|v| v.deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::VersionRecord;

    fn root() -> PathBuf {
        PathBuf::from("/srv/repo")
    }

    #[test]
    fn rejects_absolute_relative_path() {
        assert!(File::new(&root(), PathBuf::from("/etc/passwd")).is_err());
    }

    #[test]
    fn rejects_parent_dir_escape() {
        assert!(File::new(&root(), PathBuf::from("../../etc/passwd")).is_err());
    }

    #[test]
    fn accepts_nested_relative_path() {
        assert!(File::new(&root(), PathBuf::from("a/b/c.txt")).is_ok());
    }

    #[test]
    fn current_version_mut_allows_in_place_chunk_mutation() {
        let mut f = File::new(&root(), PathBuf::from("x")).unwrap();
        f.merge_version(FileVersion::from_descriptors(&VersionRecord::new(10, None), &[]));
        assert!(f.current_version_mut().is_some());
    }

    #[test]
    fn current_version_is_latest_by_timestamp() {
        let mut f = File::new(&root(), PathBuf::from("x")).unwrap();
        f.merge_version(FileVersion::from_descriptors(&VersionRecord::new(10, None), &[]));
        f.merge_version(FileVersion::from_descriptors(&VersionRecord::new(30, None), &[]));
        f.merge_version(FileVersion::from_descriptors(&VersionRecord::new(20, None).with_author("a", "h"), &[]));
        assert_eq!(f.current_version().unwrap().timestamp, 30);
    }

    #[test]
    fn s4_lww_merge_scenario() {
        let mut f = File::new(&root(), PathBuf::from("x")).unwrap();
        let v1 = FileVersion::from_descriptors(&VersionRecord::new(10, None), &[]);
        let v2 = FileVersion::from_descriptors(&VersionRecord::deletion(20), &[]);
        let v3 = FileVersion::from_descriptors(&VersionRecord::new(30, None), &[]);
        for v in [v2, v3, v1] {
            f.merge_version(v);
        }
        let current = f.current_version().unwrap();
        assert_eq!(current.timestamp, 30);
        assert!(!current.deleted);
    }

    #[test]
    fn tiebreak_is_deterministic_regardless_of_insertion_order() {
        let mut first = File::new(&root(), PathBuf::from("x")).unwrap();
        let mut second = File::new(&root(), PathBuf::from("x")).unwrap();
        let va = FileVersion::from_descriptors(&VersionRecord::new(10, None).with_author("alice", "h"), &[]);
        let vb = FileVersion::from_descriptors(&VersionRecord::new(10, None).with_author("bob", "h"), &[]);
        first.merge_version(va.clone());
        first.merge_version(vb.clone());
        second.merge_version(vb);
        second.merge_version(va);
        assert_eq!(
            first.current_version().unwrap().username,
            second.current_version().unwrap().username
        );
    }
}
