// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Filesystem Watcher Adapter
//!
//! Watches a repo's root recursively for create and delete events and feeds
//! them into `Repo::update`. Modify events are deliberately not wired: a
//! file being actively written produces a storm of modify notifications
//! that would thrash the chunker far more usefully handled by the periodic
//! `add_local_files` scan, which reads the settled mtime once. Newly created
//! subdirectories are watched explicitly as they arrive, since not every
//! `notify` backend extends an existing recursive watch to them on its own.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use filetime::FileTime;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use notify::event::{CreateKind, RemoveKind};
use tokio::sync::mpsc;

use chunker_bootstrap::shutdown::CancellationToken;
use chunker_domain::value_objects::VersionRecord;

use crate::repo::Repo;

/// Holds the live `notify::Watcher` alive for as long as the background
/// task runs; dropping it stops the watch.
pub struct FsWatcher {
    _watcher: RecommendedWatcher,
}

impl FsWatcher {
    pub fn spawn(repo: Arc<Repo>, root: PathBuf, shutdown: CancellationToken) -> Result<Self, notify::Error> {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
            if let Ok(event) = result {
                let _ = tx.send(event);
            }
        })?;
        watcher.watch(&root, RecursiveMode::Recursive)?;

        tokio::spawn(async move {
            loop {
                if repo.is_stopped() {
                    break;
                }
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = tokio::time::sleep(std::time::Duration::from_secs(1)) => continue,
                    event = rx.recv() => {
                        match event {
                            Some(event) => handle_event(&repo, &root, event).await,
                            None => break,
                        }
                    }
                }
            }
        });

        Ok(Self { _watcher: watcher })
    }
}

async fn handle_event(repo: &Repo, root: &Path, event: Event) {
    match event.kind {
        EventKind::Create(CreateKind::File) => {
            for path in &event.paths {
                if path.is_file() {
                    if let (Ok(relpath), Some(timestamp)) = (path.strip_prefix(root), mtime_rounded(path)) {
                        let (username, hostname) = repo.author();
                        let record = VersionRecord::new(timestamp, None).with_author(username, hostname);
                        let _ = repo.update(relpath.to_path_buf(), record).await;
                    }
                }
            }
        }
        EventKind::Remove(RemoveKind::File) => {
            for path in &event.paths {
                if let Ok(relpath) = path.strip_prefix(root) {
                    let (username, hostname) = repo.author();
                    let record = VersionRecord::deletion(now_rounded()).with_author(username, hostname);
                    let _ = repo.update(relpath.to_path_buf(), record).await;
                }
            }
        }
        _ => {}
    }
}

/// The file's stat mtime, rounded the same way timestamps are rounded
/// elsewhere. `None` if the file vanished before its metadata could be read.
fn mtime_rounded(path: &Path) -> Option<i64> {
    let meta = std::fs::metadata(path).ok()?;
    let seconds = FileTime::from_last_modification_time(&meta).seconds();
    Some(chunker_domain::services::ts_round(seconds as f64))
}

fn now_rounded() -> i64 {
    let seconds = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);
    chunker_domain::services::ts_round(seconds)
}
