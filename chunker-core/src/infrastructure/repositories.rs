// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Repositories
//!
//! Concrete [`chunker_domain::repositories::ManifestRepository`] implementations.

pub mod manifest_file;

pub use manifest_file::JsonManifestRepository;
