// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Checksum Service
//!
//! Computes and verifies the digest half of a chunk's identity. Domain
//! traits stay synchronous; infrastructure wraps this in an async adapter
//! where I/O is involved.

use md5::Md5;
use sha2::{Digest, Sha256};
use sha3::Sha3_256;

use crate::value_objects::HashAlgorithm;

/// Computes the lowercase hex digest of `data` under the given algorithm.
pub trait ChecksumService: Send + Sync {
    fn digest(&self, algorithm: HashAlgorithm, data: &[u8]) -> String;

    fn verify(&self, algorithm: HashAlgorithm, data: &[u8], expected_hex: &str) -> bool {
        self.digest(algorithm, data) == expected_hex.to_lowercase()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Sha2Sha3Md5ChecksumService;

impl ChecksumService for Sha2Sha3Md5ChecksumService {
    fn digest(&self, algorithm: HashAlgorithm, data: &[u8]) -> String {
        match algorithm {
            HashAlgorithm::Sha256 => {
                let mut hasher = Sha256::new();
                hasher.update(data);
                hex::encode(hasher.finalize())
            }
            HashAlgorithm::Sha3_256 => {
                let mut hasher = Sha3_256::new();
                hasher.update(data);
                hex::encode(hasher.finalize())
            }
            HashAlgorithm::Md5 => {
                let mut hasher = Md5::new();
                hasher.update(data);
                hex::encode(hasher.finalize())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_matches_literal_scenario() {
        let svc = Sha2Sha3Md5ChecksumService;
        let digest = svc.digest(HashAlgorithm::Sha256, b"hello world");
        assert_eq!(
            digest,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde"
        );
    }

    #[test]
    fn md5_matches_literal_scenario() {
        let svc = Sha2Sha3Md5ChecksumService;
        let digest = svc.digest(HashAlgorithm::Md5, b"hello!");
        assert_eq!(digest, "5a8dd3ad0756a93ded72b823b19dd877");
    }

    #[test]
    fn verify_is_case_insensitive() {
        let svc = Sha2Sha3Md5ChecksumService;
        assert!(svc.verify(
            HashAlgorithm::Md5,
            b"hello!",
            "5A8DD3AD0756A93DED72B823B19DD877"
        ));
    }

    #[test]
    fn verify_rejects_tampered_data() {
        let svc = Sha2Sha3Md5ChecksumService;
        assert!(!svc.verify(HashAlgorithm::Md5, b"hello?", "5a8dd3ad0756a93ded72b823b19dd877"));
    }
}
