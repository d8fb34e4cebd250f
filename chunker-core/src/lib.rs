// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Chunker Core
//!
//! The engine: `Repo`, the self-heal pass, and the infrastructure adapters
//! that give the pure `chunker_domain` types somewhere to read and write
//! bytes — a fixed-size chunker, AES-ECB payload encryption, gzip/JSON
//! manifest persistence, a filesystem watcher, and the per-repo network
//! loop. `Core` (in [`application::core`]) is the process-wide entry point:
//! it owns every loaded `Repo` by uuid and turns a [`application::commands::Command`]
//! into a [`application::commands::CommandResult`].
//!
//! ## Layering
//!
//! - `chunker_domain` — pure types and traits, no I/O, no async.
//! - `chunker_core::infrastructure` — adapters implementing those traits
//!   against the filesystem and network.
//! - `chunker_core::repo` / `chunker_core::healer` — the application-facing
//!   aggregate and its cross-file deduplication pass.
//! - `chunker_core::application` — commands, dispatch, and the HTTP
//!   argument adapter.
//! - `chunker_bootstrap` — everything outside this crate that a process
//!   entry point needs: CLI parsing, config, signals, exit codes.

pub mod application;
pub mod healer;
pub mod infrastructure;
pub mod repo;

pub use repo::{Repo, RepoDeps};
