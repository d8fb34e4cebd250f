// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Bootstrap Module
//!
//! The bootstrap module sits **outside** the domain/application/
//! infrastructure layers and provides:
//!
//! - **Entry point** - CLI parsing and validation
//! - **Signal handling** - Graceful shutdown (SIGTERM, SIGINT, SIGHUP)
//! - **Configuration** - Layered `AppConfig` (defaults, `main.conf`, env)
//! - **Exit codes** - BSD `sysexits.h`-style mapping from error category
//! - **Shutdown coordination** - Cancellation token propagation
//!
//! ## Module Structure
//!
//! - `cli` - Argument parsing and validation
//! - `config` - Application configuration and config-dir resolution
//! - `exit_code` - Process exit code mapping
//! - `logger` - Bootstrap-phase logging abstraction
//! - `shutdown` - Shutdown coordination (`CancellationToken`)
//! - `signals` - Signal handling (SIGTERM, SIGINT, SIGHUP)

pub mod cli;
pub mod config;
pub mod exit_code;
pub mod logger;
pub mod shutdown;
pub mod signals;

pub use cli::{parse_and_validate, ValidatedCli, ValidatedCommand};
pub use exit_code::{result_to_exit_code, ExitCode};
pub use logger::{BootstrapLogger, ConsoleLogger};

/// Bootstrap and parse CLI arguments, logging the outcome through a
/// [`ConsoleLogger`] before the application-wide `tracing_subscriber` is
/// initialized. The caller runs the application logic and maps its result
/// to an exit code with `result_to_exit_code`.
pub fn bootstrap_cli() -> Result<ValidatedCli, cli::ParseError> {
    let logger = ConsoleLogger::new();
    match cli::parse_and_validate() {
        Ok(cli) => {
            logger.debug("parsed and validated CLI arguments");
            Ok(cli)
        }
        Err(err) => {
            logger.error(&format!("CLI argument validation failed: {err}"));
            Err(err)
        }
    }
}
