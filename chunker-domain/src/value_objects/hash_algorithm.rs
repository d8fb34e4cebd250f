// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Hash Algorithm Value Object
//!
//! A closed set of the hash algorithms a chunk identity may be built from.
//! `Md5` exists only so legacy manifests can still be read; new chunks must
//! use `Sha256` or `Sha3_256`.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

use crate::ChunkerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Sha256,
    Sha3_256,
    /// Legacy-manifest compatibility only; rejected by `for_new_chunks`.
    Md5,
}

impl HashAlgorithm {
    /// The algorithm set accepted when slicing a file for the first time.
    pub const NEW_CHUNK_ALGORITHMS: [HashAlgorithm; 2] = [HashAlgorithm::Sha256, HashAlgorithm::Sha3_256];

    pub fn for_new_chunks(self) -> Result<Self, ChunkerError> {
        if Self::NEW_CHUNK_ALGORITHMS.contains(&self) {
            Ok(self)
        } else {
            Err(ChunkerError::UnsupportedHashAlgorithm(format!(
                "{} cannot be used for new chunks, only for reading legacy manifests",
                self
            )))
        }
    }

    pub fn from_legacy_str(s: &str) -> Result<Self, ChunkerError> {
        match s {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha3_256" | "sha3-256" => Ok(HashAlgorithm::Sha3_256),
            "md5" => Ok(HashAlgorithm::Md5),
            other => Err(ChunkerError::UnsupportedHashAlgorithm(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha3_256 => "sha3_256",
            HashAlgorithm::Md5 => "md5",
        }
    }
}

impl Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for HashAlgorithm {
    fn default() -> Self {
        HashAlgorithm::Sha256
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_chunks_reject_md5() {
        assert!(HashAlgorithm::Md5.for_new_chunks().is_err());
        assert!(HashAlgorithm::Sha256.for_new_chunks().is_ok());
    }

    #[test]
    fn legacy_str_round_trips() {
        for algo in [HashAlgorithm::Sha256, HashAlgorithm::Sha3_256, HashAlgorithm::Md5] {
            assert_eq!(HashAlgorithm::from_legacy_str(algo.as_str()).unwrap(), algo);
        }
    }

    #[test]
    fn unknown_legacy_str_errors() {
        assert!(HashAlgorithm::from_legacy_str("blake3").is_err());
    }
}
