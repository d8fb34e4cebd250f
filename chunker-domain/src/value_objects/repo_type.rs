// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Repo Type
//!
//! Whether a repo is a fixed publication (`static`) or a live,
//! continuously-updated tree (`share`). Purely descriptive; it does not
//! change how a manifest is merged or healed.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoType {
    Static,
    Share,
}

impl fmt::Display for RepoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RepoType::Static => "static",
            RepoType::Share => "share",
        })
    }
}
