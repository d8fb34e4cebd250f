// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Value Objects
//!
//! Immutable, self-validating types with no identity of their own.
//!
//! - [`HashAlgorithm`]: the closed set of digest algorithms a chunk may be
//!   identified by.
//! - [`ChunkDescriptor`]: a chunk's content identity, independent of its
//!   position in any particular file.
//! - [`VersionRecord`]: the wire/manifest shape of one file version.
//! - [`RepoId`]: a repo's SHA-256-derived identity.
//! - [`RepoType`]: static vs. share.
//! - [`ManifestDocument`]: the persisted shape of a manifest or state file.

pub mod chunk_descriptor;
pub mod hash_algorithm;
pub mod manifest_document;
pub mod repo_id;
pub mod repo_type;
pub mod version_record;

pub use chunk_descriptor::ChunkDescriptor;
pub use hash_algorithm::HashAlgorithm;
pub use manifest_document::{ManifestDocument, ManifestFileEntry};
pub use repo_id::RepoId;
pub use repo_type::RepoType;
pub use version_record::VersionRecord;
