// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Error System
//!
//! A single hierarchical error type for every failure the repository engine
//! can produce, from path validation up through manifest I/O.
//!
//! ## Error Categories
//!
//! - **Path / configuration**: `InvalidPath`, `InvalidConfiguration`
//! - **Manifest**: `ManifestCorrupt`
//! - **Data integrity**: `IntegrityFailure`, `UnsupportedHashAlgorithm`
//! - **I/O**: `IoFailure`
//! - **Repo lookup**: `NoSuchRepo`
//! - **External interface**: `ArgParseFailure`
//! - **Cryptography**: `CryptoFailure`
//!
//! Per-chunk integrity failures are expected to self-correct (the chunk is
//! simply re-requested); only per-repo failures should disable a repo.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ChunkerError {
    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("manifest corrupt: {0}")]
    ManifestCorrupt(String),

    #[error("io failure: {0}")]
    IoFailure(String),

    #[error("integrity check failed: {0}")]
    IntegrityFailure(String),

    #[error("no such repo: {0}")]
    NoSuchRepo(String),

    #[error("argument parse failure: {0}")]
    ArgParseFailure(String),

    #[error("unsupported hash algorithm: {0}")]
    UnsupportedHashAlgorithm(String),

    #[error("crypto failure: {0}")]
    CryptoFailure(String),
}

impl ChunkerError {
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }

    pub fn manifest_corrupt(msg: impl Into<String>) -> Self {
        Self::ManifestCorrupt(msg.into())
    }

    pub fn io_failure(msg: impl Into<String>) -> Self {
        Self::IoFailure(msg.into())
    }

    pub fn no_such_repo(uuid: impl Into<String>) -> Self {
        Self::NoSuchRepo(uuid.into())
    }

    /// Errors that indicate a transient condition worth retrying.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ChunkerError::IoFailure(_) | ChunkerError::IntegrityFailure(_))
    }

    pub fn category(&self) -> &'static str {
        match self {
            ChunkerError::InvalidPath(_) => "path",
            ChunkerError::InvalidConfiguration(_) => "configuration",
            ChunkerError::ManifestCorrupt(_) => "manifest",
            ChunkerError::IoFailure(_) => "io",
            ChunkerError::IntegrityFailure(_) => "integrity",
            ChunkerError::NoSuchRepo(_) => "repo",
            ChunkerError::ArgParseFailure(_) => "args",
            ChunkerError::UnsupportedHashAlgorithm(_) => "hash",
            ChunkerError::CryptoFailure(_) => "crypto",
        }
    }
}

impl From<std::io::Error> for ChunkerError {
    fn from(err: std::io::Error) -> Self {
        ChunkerError::IoFailure(err.to_string())
    }
}

impl From<serde_json::Error> for ChunkerError {
    fn from(err: serde_json::Error) -> Self {
        ChunkerError::ManifestCorrupt(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverable_errors_are_flagged() {
        assert!(ChunkerError::io_failure("disk full").is_recoverable());
        assert!(!ChunkerError::invalid_path("../escape").is_recoverable());
    }

    #[test]
    fn category_matches_variant() {
        assert_eq!(ChunkerError::no_such_repo("abc").category(), "repo");
        assert_eq!(ChunkerError::manifest_corrupt("bad json").category(), "manifest");
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ChunkerError = io_err.into();
        assert!(matches!(err, ChunkerError::IoFailure(_)));
    }
}
