// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Chunker Domain
//!
//! The domain represents the core business rules of the content-addressed
//! file distribution engine: what a chunk, a file version, and a repo's
//! version history mean, independent of sockets, the filesystem, or any
//! particular serialization format. Nothing in this crate performs I/O.
//!
//! ## Module Structure
//!
//! ### Entities
//! Objects with identity that change over their lifetime:
//!
//! - [`entities::Chunk`]: a content-addressed byte range within a file
//!   version, carrying a `saved` flag that infrastructure flips once the
//!   bytes at its offset are confirmed to match its hash.
//! - [`entities::FileVersion`]: an immutable snapshot of a file's chunk
//!   list at one point in time.
//! - [`entities::File`]: the ordered, path-validated version history for
//!   one repo-relative path.
//!
//! ### Value Objects
//! Immutable, self-validating types with no identity:
//!
//! - [`value_objects::HashAlgorithm`]: the closed set of digest algorithms
//!   a chunk may be identified by.
//! - [`value_objects::ChunkDescriptor`]: a chunk's content identity.
//! - [`value_objects::VersionRecord`]: the wire/manifest shape of one file
//!   version.
//! - [`value_objects::RepoId`]: a repo's SHA-256-derived identity.
//! - [`value_objects::RepoType`]: static vs. share.
//! - [`value_objects::ManifestDocument`]: the persisted shape of a
//!   manifest or state file.
//!
//! ### Domain Services
//! Stateless operations that coordinate domain objects:
//!
//! - [`services::ChecksumService`]: digesting and verifying chunk payloads.
//! - [`services::CryptoService`]: symmetric encrypt/decrypt of chunk
//!   payloads.
//! - [`services::ChunkerService`]: slicing a file into offset-tagged chunk
//!   descriptors.
//! - [`services::ts_round`]: filesystem timestamp quantization.
//!
//! ### Repositories
//! Ports implemented by infrastructure:
//!
//! - [`repositories::ManifestRepository`]: loading and saving manifests.
//! - [`repositories::Peer`]: one live connection to another node.

pub mod entities;
pub mod error;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use entities::{Chunk, File, FileVersion};
pub use error::ChunkerError;
pub use value_objects::{ChunkDescriptor, HashAlgorithm, ManifestDocument, RepoId, RepoType, VersionRecord};
