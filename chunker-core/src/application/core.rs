// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Core
//!
//! `Core` is the process-wide entry point: one [`RepoDeps`] shared by every
//! loaded repo, a uuid-keyed registry of the repos themselves, and
//! [`Core::dispatch`], which turns a [`Command`] into a [`CommandResult`]
//! without the caller needing to know a `Repo` exists. Registering a repo
//! spawns its filesystem watcher (if it has a local root) and its network
//! loop; both run for as long as the repo is registered.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;

use chunker_bootstrap::config::AppConfig;
use chunker_bootstrap::shutdown::CancellationToken;
use chunker_domain::services::Sha2Sha3Md5ChecksumService;
use chunker_domain::value_objects::{HashAlgorithm, RepoId};
use chunker_domain::ChunkerError;

use crate::application::commands::{Command, CommandResult, RepoSummary};
use crate::healer;
use crate::infrastructure::adapters::aes_ecb_crypto::AesEcbCryptoService;
use crate::infrastructure::adapters::fixed_chunker::FixedSizeChunker;
use crate::infrastructure::adapters::fs_watcher::FsWatcher;
use crate::infrastructure::adapters::net_loop;
use crate::infrastructure::repositories::manifest_file::JsonManifestRepository;
use crate::repo::{Repo, RepoDeps};

const STATE_EXTENSION: &str = "state";

/// The uuid-keyed registry of every repo this process has loaded, plus the
/// shared dependencies and shutdown token every `Repo` is built from.
pub struct Core {
    config_dir: PathBuf,
    deps: RepoDeps,
    shutdown: CancellationToken,
    repos: Mutex<HashMap<RepoId, Arc<Repo>>>,
    watchers: Mutex<HashMap<RepoId, FsWatcher>>,
}

impl Core {
    pub fn new(config_dir: PathBuf, app_config: &AppConfig, shutdown: CancellationToken) -> Self {
        let deps = RepoDeps {
            manifest_repository: Arc::new(JsonManifestRepository),
            chunker: Arc::new(
                FixedSizeChunker::new(Sha2Sha3Md5ChecksumService, HashAlgorithm::Sha256)
                    .expect("Sha256 is always accepted for new chunks"),
            ),
            checksum: Arc::new(Sha2Sha3Md5ChecksumService),
            crypto: Arc::new(AesEcbCryptoService),
            username: app_config.username.clone(),
            hostname: app_config.hostname.clone(),
        };
        Self {
            config_dir,
            deps,
            shutdown,
            repos: Mutex::new(HashMap::new()),
            watchers: Mutex::new(HashMap::new()),
        }
    }

    /// Scans the config directory for `*.state` files left by a previous
    /// run and reconstructs a `Repo` for each. A single unreadable or
    /// corrupt state file is logged and skipped rather than failing
    /// startup for every other repo.
    pub async fn load_existing(&self) -> Result<(), ChunkerError> {
        let mut entries = tokio::fs::read_dir(&self.config_dir).await.map_err(ChunkerError::from)?;
        while let Some(entry) = entries.next_entry().await.map_err(ChunkerError::from)? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(STATE_EXTENSION) {
                continue;
            }
            if let Err(err) = self.load_repo_from_state(&path).await {
                tracing::warn!(path = %path.display(), error = %err, "failed to load repo state, skipping");
            }
        }
        Ok(())
    }

    async fn load_repo_from_state(&self, path: &Path) -> Result<(), ChunkerError> {
        let document = self.deps.manifest_repository.load(path).await?;
        let root = document.root.clone();
        let repo = Repo::from_manifest_document(document, root, path.to_path_buf(), self.deps.clone(), self.shutdown.clone())?;
        self.register(Arc::new(repo)).await;
        Ok(())
    }

    fn state_path_for(&self, uuid: &RepoId) -> PathBuf {
        self.config_dir.join(format!("{uuid}.{STATE_EXTENSION}"))
    }

    /// Spawns this repo's filesystem watcher (if it has a local root) and
    /// its network loop, then adds it to the registry. A watcher that
    /// fails to start (e.g. the root no longer exists) is logged rather
    /// than treated as fatal — the repo still participates in sync over
    /// the network even without local change detection.
    async fn register(&self, repo: Arc<Repo>) {
        let uuid = repo.uuid().clone();

        if let Some(root) = repo.root().await {
            match FsWatcher::spawn(Arc::clone(&repo), root, self.shutdown.clone()) {
                Ok(watcher) => {
                    self.watchers.lock().await.insert(uuid.clone(), watcher);
                }
                Err(err) => tracing::warn!(uuid = %uuid, error = %err, "failed to start filesystem watcher"),
            }
        }

        tokio::spawn(net_loop::run(Arc::clone(&repo), self.shutdown.clone()));
        self.repos.lock().await.insert(uuid, repo);
    }

    pub async fn dispatch(&self, command: Command) -> CommandResult {
        match command {
            Command::Create {
                chunkfile,
                directory,
                name,
                key,
                repo_type,
                add,
            } => self.handle_create(chunkfile, directory, name, key, repo_type, add).await,
            Command::Add { chunkfile, directory, name, key } => self.handle_add(chunkfile, directory, name, key).await,
            Command::Remove { uuid } => self.handle_remove(uuid).await,
            Command::Heal => self.handle_heal().await,
            Command::Fetch => self.handle_fetch().await,
            Command::List => self.handle_list().await,
            Command::State => self.handle_state().await,
            Command::Quit => {
                self.shutdown.cancel();
                CommandResult::ok()
            }
        }
    }

    async fn handle_create(
        &self,
        chunkfile: PathBuf,
        directory: PathBuf,
        name: Option<String>,
        key: Option<String>,
        repo_type: chunker_domain::value_objects::RepoType,
        add: bool,
    ) -> CommandResult {
        let uuid = RepoId::generate();
        let state_path = self.state_path_for(&uuid);
        let name = name.unwrap_or_else(|| {
            directory
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "repo".to_string())
        });

        let repo = Repo::new(uuid.clone(), name, repo_type, Some(directory), key, state_path, self.deps.clone(), self.shutdown.clone());

        if add {
            if let Err(err) = repo.add_local_files().await {
                return CommandResult::error(err.to_string());
            }
        }
        if let Err(err) = repo.save_manifest(&chunkfile).await {
            return CommandResult::error(err.to_string());
        }
        if let Err(err) = repo.save_state().await {
            return CommandResult::error(err.to_string());
        }

        self.register(Arc::new(repo)).await;
        CommandResult::ok().with_uuid(uuid.to_string())
    }

    async fn handle_add(&self, chunkfile: PathBuf, directory: Option<PathBuf>, name: Option<String>, key: Option<String>) -> CommandResult {
        let mut document = match self.deps.manifest_repository.load(&chunkfile).await {
            Ok(document) => document,
            Err(err) => return CommandResult::error(err.to_string()),
        };
        if let Some(name) = name {
            document.name = name;
        }
        if key.is_some() {
            document.key = key;
        }

        let uuid = document.uuid.clone();
        let state_path = self.state_path_for(&uuid);
        let repo = match Repo::from_manifest_document(document, directory, state_path, self.deps.clone(), self.shutdown.clone()) {
            Ok(repo) => repo,
            Err(err) => return CommandResult::error(err.to_string()),
        };
        if let Err(err) = repo.save_state().await {
            return CommandResult::error(err.to_string());
        }

        self.register(Arc::new(repo)).await;
        CommandResult::ok().with_uuid(uuid.to_string())
    }

    async fn handle_remove(&self, uuid: String) -> CommandResult {
        let id = match RepoId::parse(&uuid) {
            Ok(id) => id,
            Err(err) => return CommandResult::error(err.to_string()),
        };

        let repo = self.repos.lock().await.remove(&id);
        match repo {
            Some(repo) => {
                repo.stop();
                self.watchers.lock().await.remove(&id);
                if let Err(err) = tokio::fs::remove_file(repo.state_path()).await {
                    if err.kind() != std::io::ErrorKind::NotFound {
                        tracing::warn!(uuid = %repo.uuid(), error = %err, "failed to remove state file");
                    }
                }
                CommandResult::ok()
            }
            None => CommandResult::error(format!("no such repo: {uuid}")),
        }
    }

    /// Cross-repo dedup pass: a chunk known in one repo can fill a chunk
    /// missing in another, so every loaded repo's known/missing chunk
    /// locations are gathered and handed to the healer in a single call
    /// before any repo writes back what it gained.
    async fn handle_heal(&self) -> CommandResult {
        let repos: Vec<Arc<Repo>> = self.repos.lock().await.values().cloned().collect();

        let mut all_known = Vec::new();
        let mut all_missing = Vec::new();
        let mut per_repo: Vec<(Arc<Repo>, Vec<(PathBuf, usize)>, std::ops::Range<usize>)> = Vec::new();

        for repo in &repos {
            let Some((known, missing, missing_locations)) = repo.heal_locations().await else { continue };
            all_known.extend(known);
            let start = all_missing.len();
            all_missing.extend(missing);
            per_repo.push((Arc::clone(repo), missing_locations, start..all_missing.len()));
        }

        let healed = healer::self_heal(&all_known, &mut all_missing);

        if healed > 0 {
            for (repo, missing_locations, range) in &per_repo {
                if let Err(err) = repo.apply_healed(&all_missing[range.clone()], missing_locations).await {
                    tracing::warn!(uuid = %repo.uuid(), error = %err, "failed to write back healed chunks for repo");
                }
            }
        }

        CommandResult::ok().with_bytes_healed(healed.max(0) as u64)
    }

    async fn handle_fetch(&self) -> CommandResult {
        let repos: Vec<Arc<Repo>> = self.repos.lock().await.values().cloned().collect();
        let mut total_requested: u64 = 0;
        for repo in &repos {
            match repo.request_missing_chunks().await {
                Ok(count) => total_requested += count as u64,
                Err(err) => tracing::warn!(uuid = %repo.uuid(), error = %err, "fetch failed for repo"),
            }
        }
        CommandResult::ok().with_chunks_requested(total_requested)
    }

    async fn handle_list(&self) -> CommandResult {
        let repos: Vec<Arc<Repo>> = self.repos.lock().await.values().cloned().collect();
        let mut summaries = Vec::with_capacity(repos.len());
        for repo in &repos {
            let (files_complete, files_total) = repo.completeness().await;
            summaries.push(RepoSummary {
                uuid: repo.uuid().to_string(),
                name: repo.name().await,
                repo_type: repo.repo_type().await,
                files_complete,
                files_total,
            });
        }
        CommandResult::ok().with_repos(summaries)
    }

    async fn handle_state(&self) -> CommandResult {
        let repos: Vec<Arc<Repo>> = self.repos.lock().await.values().cloned().collect();
        let mut states = Vec::with_capacity(repos.len());
        for repo in &repos {
            let document = repo.to_manifest_document(false).await;
            match serde_json::to_value(&document) {
                Ok(value) => states.push(value),
                Err(err) => return CommandResult::error(err.to_string()),
            }
        }
        CommandResult::ok().with_states(states)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chunker_domain::value_objects::RepoType;
    use std::time::Duration;

    fn shutdown_token() -> CancellationToken {
        chunker_bootstrap::shutdown::ShutdownCoordinator::new(Duration::from_secs(1)).token()
    }

    #[tokio::test]
    async fn create_then_list_reports_the_new_repo() {
        let config_dir = tempfile::tempdir().unwrap();
        let data_dir = tempfile::tempdir().unwrap();
        std::fs::write(data_dir.path().join("a.txt"), b"hello").unwrap();
        let core = Core::new(config_dir.path().to_path_buf(), &AppConfig::default(), shutdown_token());

        let create = core
            .dispatch(Command::Create {
                chunkfile: config_dir.path().join("repo.chunker"),
                directory: data_dir.path().to_path_buf(),
                name: Some("mine".to_string()),
                key: None,
                repo_type: RepoType::Share,
                add: true,
            })
            .await;
        assert!(create.is_ok());
        let uuid = create.uuid.expect("create populates uuid");

        let list = core.dispatch(Command::List).await;
        assert!(list.is_ok());
        let repos = list.repos.unwrap();
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].uuid, uuid);
        assert_eq!(repos[0].files_total, 1);
    }

    #[tokio::test]
    async fn remove_of_unknown_uuid_is_an_error() {
        let config_dir = tempfile::tempdir().unwrap();
        let core = Core::new(config_dir.path().to_path_buf(), &AppConfig::default(), shutdown_token());
        let result = core.dispatch(Command::Remove { uuid: RepoId::generate().to_string() }).await;
        assert!(!result.is_ok());
    }

    #[tokio::test]
    async fn remove_stops_and_forgets_a_registered_repo() {
        let config_dir = tempfile::tempdir().unwrap();
        let data_dir = tempfile::tempdir().unwrap();
        let core = Core::new(config_dir.path().to_path_buf(), &AppConfig::default(), shutdown_token());

        let create = core
            .dispatch(Command::Create {
                chunkfile: config_dir.path().join("repo.chunker"),
                directory: data_dir.path().to_path_buf(),
                name: None,
                key: None,
                repo_type: RepoType::Share,
                add: false,
            })
            .await;
        let uuid = create.uuid.unwrap();

        let remove = core.dispatch(Command::Remove { uuid: uuid.clone() }).await;
        assert!(remove.is_ok());

        let list = core.dispatch(Command::List).await;
        assert!(list.repos.unwrap().is_empty());
    }

    #[tokio::test]
    async fn quit_cancels_the_shutdown_token() {
        let config_dir = tempfile::tempdir().unwrap();
        let token = shutdown_token();
        let core = Core::new(config_dir.path().to_path_buf(), &AppConfig::default(), token.clone());
        assert!(!token.is_cancelled());
        let result = core.dispatch(Command::Quit).await;
        assert!(result.is_ok());
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn load_existing_reconstructs_repos_from_state_files() {
        let config_dir = tempfile::tempdir().unwrap();
        let data_dir = tempfile::tempdir().unwrap();
        std::fs::write(data_dir.path().join("a.txt"), b"hello").unwrap();

        {
            let core = Core::new(config_dir.path().to_path_buf(), &AppConfig::default(), shutdown_token());
            core.dispatch(Command::Create {
                chunkfile: config_dir.path().join("repo.chunker"),
                directory: data_dir.path().to_path_buf(),
                name: None,
                key: None,
                repo_type: RepoType::Share,
                add: true,
            })
            .await;
        }

        let core = Core::new(config_dir.path().to_path_buf(), &AppConfig::default(), shutdown_token());
        core.load_existing().await.unwrap();
        let list = core.dispatch(Command::List).await;
        assert_eq!(list.repos.unwrap().len(), 1);
    }
}
