// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Manifest Repository Port
//!
//! Persists a `ManifestDocument` to and from a path. A single path may hold
//! either a plaintext JSON manifest or a gzip-compressed state file; the
//! infrastructure adapter detects the form on load and is told which form
//! to write on save. The domain only needs this much: it never decides
//! compression or location policy itself (that is `Repo`'s job, in
//! `chunker-core`).

use std::path::Path;

use async_trait::async_trait;

use crate::value_objects::ManifestDocument;
use crate::ChunkerError;

#[async_trait]
pub trait ManifestRepository: Send + Sync {
    /// Loads a manifest from `path`, accepting either plaintext or
    /// gzip-compressed JSON.
    async fn load(&self, path: &Path) -> Result<ManifestDocument, ChunkerError>;

    /// Writes `document` to `path`. `gzip` selects the state-file encoding;
    /// shareable manifests are written as indented plaintext JSON.
    async fn save(&self, path: &Path, document: &ManifestDocument, gzip: bool) -> Result<(), ChunkerError>;
}
