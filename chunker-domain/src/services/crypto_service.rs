// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Crypto Service
//!
//! Symmetric encrypt/decrypt of chunk payload bytes when a repo carries a
//! key. The trait is intentionally algorithm-agnostic; the shipped
//! infrastructure adapter implements the legacy AES-ECB scheme, and a
//! versioned replacement can be added behind a manifest version bump
//! without touching `Repo`.

use crate::ChunkerError;

pub trait CryptoService: Send + Sync {
    fn encrypt(&self, key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, ChunkerError>;
    fn decrypt(&self, key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, ChunkerError>;
}

/// Identity crypto service used when a repo has no key configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCryptoService;

impl CryptoService for NoopCryptoService {
    fn encrypt(&self, _key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, ChunkerError> {
        Ok(plaintext.to_vec())
    }

    fn decrypt(&self, _key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, ChunkerError> {
        Ok(ciphertext.to_vec())
    }
}
