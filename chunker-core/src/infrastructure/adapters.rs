// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Adapters
//!
//! - [`aes_ecb_crypto`]: legacy-compatible `CryptoService` implementation.
//! - [`chunk_io`]: the only module that reads or writes a chunk's bytes.
//! - [`fixed_chunker`]: the production `ChunkerService`, 1 MiB slices.
//! - [`fs_watcher`]: `notify`-based create/delete watcher per repo root.
//! - [`net_loop`]: per-repo peer connections (`UdpPeer`) and their loops.

pub mod aes_ecb_crypto;
pub mod chunk_io;
pub mod fixed_chunker;
pub mod fs_watcher;
pub mod net_loop;

pub use aes_ecb_crypto::AesEcbCryptoService;
pub use fixed_chunker::FixedSizeChunker;
pub use fs_watcher::FsWatcher;
