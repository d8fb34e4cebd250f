// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Command-Line Interface Module
//!
//! Bootstrap-layer CLI parsing and validation for the repo-management
//! commands: `create`, `add`, `remove`, `heal`, `fetch`, `list`, `state`,
//! `quit`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid value for --{arg}: {reason}")]
    InvalidValue { arg: String, reason: String },
    #[error("path escapes its expected boundary: {0}")]
    PathEscape(String),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RepoTypeArg {
    Static,
    Share,
}

#[derive(Debug, Parser)]
#[command(name = "chunker", about = "Content-addressed peer-to-peer file sync")]
pub struct Cli {
    /// Path to main.conf; defaults to the resolved config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Create {
        #[arg(long)]
        chunkfile: PathBuf,
        #[arg(long)]
        directory: PathBuf,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        key: Option<String>,
        #[arg(long, value_enum, default_value_t = RepoTypeArg::Static)]
        r#type: RepoTypeArg,
        #[arg(long)]
        add: bool,
    },
    Add {
        #[arg(long)]
        chunkfile: PathBuf,
        #[arg(long)]
        directory: Option<PathBuf>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        key: Option<String>,
    },
    Remove {
        #[arg(long)]
        uuid: String,
    },
    Heal,
    Fetch,
    List,
    State,
    Quit,
}

/// A validated command, with every path checked for traversal before the
/// application layer ever sees it.
#[derive(Debug, Clone)]
pub enum ValidatedCommand {
    Create {
        chunkfile: PathBuf,
        directory: PathBuf,
        name: Option<String>,
        key: Option<String>,
        repo_type: RepoTypeArgValidated,
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoTypeArgValidated {
    Static,
    Share,
}

impl From<RepoTypeArg> for RepoTypeArgValidated {
    fn from(v: RepoTypeArg) -> Self {
        match v {
            RepoTypeArg::Static => RepoTypeArgValidated::Static,
            RepoTypeArg::Share => RepoTypeArgValidated::Share,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidatedCli {
    pub command: ValidatedCommand,
    pub verbose: bool,
    pub config: Option<PathBuf>,
}

/// Rejects a directory argument that contains a `..` component (the same
/// rule `chunker_domain::entities::File` applies to file paths within a
/// repo) before the application layer ever sees it.
fn validate_no_traversal(path: &std::path::Path) -> Result<(), ParseError> {
    if path.components().any(|c| matches!(c, std::path::Component::ParentDir)) {
        return Err(ParseError::PathEscape(path.display().to_string()));
    }
    Ok(())
}

fn validate_uuid(uuid: &str) -> Result<(), ParseError> {
    if uuid.len() == 64 && uuid.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(ParseError::InvalidValue {
            arg: "uuid".to_string(),
            reason: "must be a 64-character hex repo id".to_string(),
        })
    }
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}

pub fn parse_and_validate() -> Result<ValidatedCli, ParseError> {
    validate_cli(parse_cli())
}

fn validate_cli(cli: Cli) -> Result<ValidatedCli, ParseError> {
    if let Some(ref path) = cli.config {
        validate_no_traversal(path)?;
    }

    let command = match cli.command {
        Commands::Create {
            chunkfile,
            directory,
            name,
            key,
            r#type,
            add,
        } => {
            validate_no_traversal(&directory)?;
            ValidatedCommand::Create {
                chunkfile,
                directory,
                name,
                key,
                repo_type: r#type.into(),
                add,
            }
        }
        Commands::Add {
            chunkfile,
            directory,
            name,
            key,
        } => {
            if let Some(ref dir) = directory {
                validate_no_traversal(dir)?;
            }
            ValidatedCommand::Add {
                chunkfile,
                directory,
                name,
                key,
            }
        }
        Commands::Remove { uuid } => {
            validate_uuid(&uuid)?;
            ValidatedCommand::Remove { uuid }
        }
        Commands::Heal => ValidatedCommand::Heal,
        Commands::Fetch => ValidatedCommand::Fetch,
        Commands::List => ValidatedCommand::List,
        Commands::State => ValidatedCommand::State,
        Commands::Quit => ValidatedCommand::Quit,
    };

    Ok(ValidatedCli {
        command,
        verbose: cli.verbose,
        config: cli.config,
    })
}
