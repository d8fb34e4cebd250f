// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Signal Handling
//!
//! Listens for SIGINT/SIGTERM (and SIGHUP on Unix) and drives the shared
//! [`crate::shutdown::ShutdownCoordinator`] so every `Repo`'s peer loop and
//! filesystem watcher gets a chance to flush state before the process
//! exits.

use std::sync::Arc;

use crate::shutdown::ShutdownCoordinator;

/// Spawns a task that waits for a termination signal and initiates
/// shutdown on the given coordinator. Returns immediately; the signal
/// wait happens in the background.
pub fn install(coordinator: Arc<ShutdownCoordinator>) {
    tokio::spawn(async move {
        wait_for_signal().await;
        tracing::info!("shutdown signal received");
        coordinator.initiate_shutdown();
    });
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");
    let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
    let mut sighup = signal(SignalKind::hangup()).expect("failed to install SIGHUP handler");

    tokio::select! {
        _ = sigint.recv() => tracing::debug!("received SIGINT"),
        _ = sigterm.recv() => tracing::debug!("received SIGTERM"),
        _ = sighup.recv() => tracing::debug!("received SIGHUP"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::debug!("received Ctrl+C");
}
