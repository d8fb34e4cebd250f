// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Application Commands
//!
//! One `Command` variant per CLI subcommand. Both the CLI binary and any
//! future HTTP adapter build a `Command` and hand it to `Core::dispatch`;
//! the command shape itself carries no knowledge of which adapter produced
//! it. `CommandResult` is the `{"status": "ok"|"error", ...}` payload every
//! adapter serializes to its caller.

use std::path::PathBuf;

use chunker_domain::value_objects::RepoType;
use serde::Serialize;

#[derive(Debug, Clone)]
pub enum Command {
    Create {
        chunkfile: PathBuf,
        directory: PathBuf,
        name: Option<String>,
        key: Option<String>,
        repo_type: RepoType,
        add: bool,
    },
    Add {
        chunkfile: PathBuf,
        directory: Option<PathBuf>,
        name: Option<String>,
        key: Option<String>,
    },
    Remove {
        uuid: String,
    },
    Heal,
    Fetch,
    List,
    State,
    Quit,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepoSummary {
    pub uuid: String,
    pub name: String,
    pub repo_type: RepoType,
    pub files_complete: usize,
    pub files_total: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CommandResult {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes_healed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunks_requested: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repos: Option<Vec<RepoSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub states: Option<Vec<serde_json::Value>>,
}

impl CommandResult {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            ..Default::default()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }

    pub fn with_bytes_healed(mut self, bytes: u64) -> Self {
        self.bytes_healed = Some(bytes);
        self
    }

    pub fn with_chunks_requested(mut self, count: u64) -> Self {
        self.chunks_requested = Some(count);
        self
    }

    pub fn with_repos(mut self, repos: Vec<RepoSummary>) -> Self {
        self.repos = Some(repos);
        self
    }

    pub fn with_states(mut self, states: Vec<serde_json::Value>) -> Self {
        self.states = Some(states);
        self
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
