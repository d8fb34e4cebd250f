// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Repo Identifier Value Object
//!
//! A repo's identity is the SHA-256 hex digest of a freshly generated random
//! UUID — a 64-character hex string with no structural meaning beyond
//! uniqueness, matching the format emitted by the original implementation
//! and expected in `.state` file names and manifest `uuid` fields.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::{self, Display};
use uuid::Uuid;

use crate::ChunkerError;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RepoId(String);

impl RepoId {
    /// Generates a new repo identity from a random UUID.
    pub fn generate() -> Self {
        let uuid = Uuid::new_v4();
        let mut hasher = Sha256::new();
        hasher.update(uuid.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn parse(s: &str) -> Result<Self, ChunkerError> {
        if s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(Self(s.to_lowercase()))
        } else {
            Err(ChunkerError::InvalidConfiguration(format!(
                "'{}' is not a 64-character hex repo id",
                s
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
