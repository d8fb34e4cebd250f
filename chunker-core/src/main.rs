// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # `chunker` CLI
//!
//! Thin binary: parse and validate argv, build a [`Core`], load whatever
//! repos are already on disk, dispatch the one requested command, print its
//! result as JSON, map the outcome to a process exit code.

use std::sync::Arc;
use std::time::Duration;

use chunker_bootstrap::cli::{RepoTypeArgValidated, ValidatedCommand};
use chunker_bootstrap::shutdown::ShutdownCoordinator;
use chunker_bootstrap::{result_to_exit_code, ValidatedCli};
use chunker_core::application::commands::Command;
use chunker_core::application::core::Core;
use chunker_domain::value_objects::RepoType;
use chunker_domain::ChunkerError;

const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(10);

fn main() -> std::process::ExitCode {
    let cli = match chunker_bootstrap::bootstrap_cli() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("{err}");
            return chunker_bootstrap::ExitCode::Usage.into();
        }
    };

    let filter = if cli.verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("failed to start async runtime: {err}");
            return chunker_bootstrap::ExitCode::Software.into();
        }
    };

    let result = runtime.block_on(run(cli));
    result_to_exit_code(result, |err: &ChunkerError| err.category())
}

async fn run(cli: ValidatedCli) -> Result<(), ChunkerError> {
    let config_dir = match cli.config {
        Some(dir) => dir,
        None => chunker_bootstrap::config::config_dir()?,
    };
    let app_config = chunker_bootstrap::config::load(&config_dir)?;

    let coordinator = Arc::new(ShutdownCoordinator::new(SHUTDOWN_GRACE_PERIOD));
    chunker_bootstrap::signals::install(Arc::clone(&coordinator));

    let core = Core::new(config_dir, &app_config, coordinator.token());
    core.load_existing().await?;

    let command = to_command(cli.command);
    let is_quit = matches!(command, Command::Quit);

    let result = core.dispatch(command).await;
    let rendered = serde_json::to_string_pretty(&result).map_err(ChunkerError::from)?;
    println!("{rendered}");

    if is_quit {
        coordinator.initiate_shutdown();
        coordinator.wait_for_shutdown().await;
    }

    if result.is_ok() {
        Ok(())
    } else {
        Err(ChunkerError::ArgParseFailure(result.message.unwrap_or_else(|| "command failed".to_string())))
    }
}

fn to_command(validated: ValidatedCommand) -> Command {
    match validated {
        ValidatedCommand::Create {
            chunkfile,
            directory,
            name,
            key,
            repo_type,
            add,
        } => Command::Create {
            chunkfile,
            directory,
            name,
            key,
            repo_type: repo_type_from_arg(repo_type),
            add,
        },
        ValidatedCommand::Add { chunkfile, directory, name, key } => Command::Add { chunkfile, directory, name, key },
        ValidatedCommand::Remove { uuid } => Command::Remove { uuid },
        ValidatedCommand::Heal => Command::Heal,
        ValidatedCommand::Fetch => Command::Fetch,
        ValidatedCommand::List => Command::List,
        ValidatedCommand::State => Command::State,
        ValidatedCommand::Quit => Command::Quit,
    }
}

fn repo_type_from_arg(arg: RepoTypeArgValidated) -> RepoType {
    match arg {
        RepoTypeArgValidated::Static => RepoType::Static,
        RepoTypeArgValidated::Share => RepoType::Share,
    }
}
