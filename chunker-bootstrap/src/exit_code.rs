// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Exit Codes
//!
//! BSD `sysexits.h`-style process exit codes, keyed off
//! `ChunkerError::category()` rather than the error variant directly, so
//! new variants in the same category don't need a matching new arm here.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Ok = 0,
    Usage = 64,
    DataErr = 65,
    NoInput = 66,
    Unavailable = 69,
    Software = 70,
    IoErr = 74,
    Config = 78,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}

impl ExitCode {
    pub fn from_category(category: &str) -> Self {
        match category {
            "path" => ExitCode::NoInput,
            "configuration" => ExitCode::Config,
            "manifest" => ExitCode::DataErr,
            "io" => ExitCode::IoErr,
            "integrity" => ExitCode::DataErr,
            "repo" => ExitCode::Unavailable,
            "args" => ExitCode::Usage,
            "hash" => ExitCode::DataErr,
            "crypto" => ExitCode::Software,
            _ => ExitCode::Software,
        }
    }
}

/// Logs `err` at error level, tagged with `category`, and converts the
/// outcome to a process exit code.
pub fn result_to_exit_code<T, E: std::fmt::Display>(
    result: Result<T, E>,
    category: impl FnOnce(&E) -> &'static str,
) -> std::process::ExitCode {
    match result {
        Ok(_) => ExitCode::Ok.into(),
        Err(err) => {
            let cat = category(&err);
            tracing::error!(category = cat, "{err}");
            ExitCode::from_category(cat).into()
        }
    }
}
