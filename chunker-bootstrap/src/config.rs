// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Application Configuration
//!
//! A layered `AppConfig`: built-in defaults, overridden by
//! `<config-dir>/main.conf` (JSON) if present, overridden again by
//! environment variables prefixed `CHUNKER_`. Mirrors the teacher's
//! defaults-then-file-then-env layering philosophy, just without the
//! TOML/YAML format fan-out this project has no use for (the manifest and
//! app config formats are both plain JSON; see `DESIGN.md`).

use std::path::PathBuf;

use chunker_domain::ChunkerError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_hostname")]
    pub hostname: String,
    #[serde(default = "default_channel_depth")]
    pub channel_depth: usize,
}

fn default_username() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "Origin User".to_string())
}

fn default_hostname() -> String {
    hostname_fallback()
}

fn hostname_fallback() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "Origin Host".to_string())
}

fn default_channel_depth() -> usize {
    64
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            hostname: default_hostname(),
            channel_depth: default_channel_depth(),
        }
    }
}

/// Returns `<user-config-home>/chunker`, creating it if it does not exist.
pub fn config_dir() -> Result<PathBuf, ChunkerError> {
    let dirs = directories::ProjectDirs::from("", "", "chunker")
        .ok_or_else(|| ChunkerError::InvalidConfiguration("could not resolve a config directory for this platform".into()))?;
    let dir = dirs.config_dir().to_path_buf();
    std::fs::create_dir_all(&dir).map_err(ChunkerError::from)?;
    Ok(dir)
}

/// Loads `AppConfig`, layering defaults, `<config-dir>/main.conf`, and
/// `CHUNKER_*` environment variables in that order.
pub fn load(dir: &std::path::Path) -> Result<AppConfig, ChunkerError> {
    let main_conf = dir.join("main.conf");
    let builder = config::Config::builder()
        .add_source(config::Config::try_from(&AppConfig::default()).map_err(|e| ChunkerError::InvalidConfiguration(e.to_string()))?)
        .add_source(config::File::from(main_conf).required(false))
        .add_source(config::Environment::with_prefix("CHUNKER"));

    let cfg = builder
        .build()
        .map_err(|e| ChunkerError::InvalidConfiguration(e.to_string()))?;
    cfg.try_deserialize()
        .map_err(|e| ChunkerError::InvalidConfiguration(e.to_string()))
}
