// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Common Test Helpers
//!
//! Shared utilities for black-box CLI integration tests.

/// Path to the compiled `chunker` binary, via `CARGO_BIN_EXE` (set by
/// `cargo test`) or a `target/<profile>/chunker` fallback.
pub fn get_chunker_bin() -> String {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_chunker") {
        return path;
    }

    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let mut bin_path = std::path::PathBuf::from(manifest_dir);
    bin_path.pop();
    bin_path.push("target");
    bin_path.push(if cfg!(debug_assertions) { "debug" } else { "release" });
    bin_path.push("chunker");
    bin_path.to_str().expect("invalid UTF-8 in binary path").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_chunker_bin_returns_path() {
        let bin_path = get_chunker_bin();
        assert!(!bin_path.is_empty());
        assert!(bin_path.contains("chunker"));
    }
}
