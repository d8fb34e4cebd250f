// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Infrastructure
//!
//! Concrete implementations of `chunker_domain`'s ports: `adapters` for the
//! domain services (chunking, crypto, chunk I/O, fs watching, networking),
//! `repositories` for manifest persistence.

pub mod adapters;
pub mod repositories;
