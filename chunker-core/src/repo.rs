// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Repo
//!
//! The heart of the engine. A `Repo` owns a `uuid`, its tree of `File`s, and
//! (for `share` repos) a local filesystem root. Every mutating operation —
//! `update`, `add_chunk`, `heal_locations`/`apply_healed`, `add_local_files`
//! — takes the same per-repo `tokio::sync::Mutex`, matching the concurrency
//! model's requirement that the network loop never hold the lock across a
//! socket wait. A `Repo` is shared between its owning `Core`, its
//! filesystem watcher, and its network loop as an `Arc<Repo>`.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use filetime::FileTime;
use tokio::sync::Mutex;

use chunker_bootstrap::shutdown::CancellationToken;
use chunker_domain::entities::{File, FileVersion};
use chunker_domain::repositories::{ManifestRepository, Peer};
use chunker_domain::services::{ts_round, ChecksumService, ChunkerService, CryptoService};
use chunker_domain::value_objects::{ManifestDocument, ManifestFileEntry, RepoId, RepoType, VersionRecord};
use chunker_domain::ChunkerError;

use crate::healer::ChunkLocation;
use crate::infrastructure::adapters::chunk_io;

/// The infrastructure adapters a `Repo` needs; constructed once by `Core`
/// and shared across every repo (the chunker and checksum algorithm choice
/// are process-wide, per §4.2's "single consistent choice per repo" rule —
/// in this implementation, per process). `username`/`hostname` come from
/// the bootstrap-layer `AppConfig` and are stamped onto every version this
/// repo creates from a local change, so the LWW tiebreaker actually
/// distinguishes nodes instead of falling back to placeholder identity.
#[derive(Clone)]
pub struct RepoDeps {
    pub manifest_repository: Arc<dyn ManifestRepository>,
    pub chunker: Arc<dyn ChunkerService>,
    pub checksum: Arc<dyn ChecksumService>,
    pub crypto: Arc<dyn CryptoService>,
    pub username: String,
    pub hostname: String,
}

struct RepoState {
    name: String,
    repo_type: RepoType,
    root: Option<PathBuf>,
    key: Option<String>,
    peers: Vec<String>,
    files: HashMap<PathBuf, File>,
}

pub struct Repo {
    uuid: RepoId,
    state_path: PathBuf,
    deps: RepoDeps,
    global_shutdown: CancellationToken,
    stopped: AtomicBool,
    inner: Mutex<RepoState>,
    /// Live peer connections the network loop currently holds open, keyed
    /// by address. Populated by `infrastructure::adapters::net_loop` as it
    /// connects and drops peers; consulted by `request_missing_chunks` so
    /// the `fetch` command can use whatever connections already exist
    /// without the application layer knowing about sockets at all.
    connections: Mutex<HashMap<String, Arc<dyn Peer>>>,
}

impl Repo {
    /// `uuid` is supplied rather than generated here so a caller (`Core`)
    /// can derive the state file's path from it before the `Repo` exists.
    pub fn new(
        uuid: RepoId,
        name: impl Into<String>,
        repo_type: RepoType,
        root: Option<PathBuf>,
        key: Option<String>,
        state_path: PathBuf,
        deps: RepoDeps,
        global_shutdown: CancellationToken,
    ) -> Self {
        Self {
            uuid,
            state_path,
            deps,
            global_shutdown,
            stopped: AtomicBool::new(false),
            inner: Mutex::new(RepoState {
                name: name.into(),
                repo_type,
                root,
                key,
                peers: Vec::new(),
                files: HashMap::new(),
            }),
            connections: Mutex::new(HashMap::new()),
        }
    }

    /// Rebuilds a `Repo` from a loaded manifest or state document. When
    /// `root` is known, every chunk is immediately `validate`d against
    /// whatever bytes already exist on disk, so `saved` reflects reality
    /// rather than whatever the document happened to say.
    pub fn from_manifest_document(
        document: ManifestDocument,
        root: Option<PathBuf>,
        state_path: PathBuf,
        deps: RepoDeps,
        global_shutdown: CancellationToken,
    ) -> Result<Self, ChunkerError> {
        let uuid = document.uuid.clone();
        let mut files = HashMap::new();
        let escape_check_root = root.clone().unwrap_or_default();

        for (relpath, entry) in document.files {
            let mut file = File::new(&escape_check_root, relpath.clone())?;
            for record in &entry.versions {
                let descriptors = record.chunks.clone().unwrap_or_default();
                let mut version = FileVersion::from_descriptors(record, &descriptors);
                if let Some(root) = &root {
                    let abs = root.join(&relpath);
                    for chunk in version.chunks.iter_mut() {
                        chunk_io::validate(chunk, &abs, deps.checksum.as_ref());
                    }
                }
                file.merge_version(version);
            }
            files.insert(relpath, file);
        }

        Ok(Self {
            uuid,
            state_path,
            deps,
            global_shutdown,
            stopped: AtomicBool::new(false),
            inner: Mutex::new(RepoState {
                name: document.name,
                repo_type: document.repo_type,
                root,
                key: document.key,
                peers: document.peers,
                files,
            }),
            connections: Mutex::new(HashMap::new()),
        })
    }

    pub fn uuid(&self) -> &RepoId {
        &self.uuid
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    pub fn checksum(&self) -> &Arc<dyn ChecksumService> {
        &self.deps.checksum
    }

    pub fn crypto(&self) -> &Arc<dyn CryptoService> {
        &self.deps.crypto
    }

    /// `(username, hostname)` to stamp onto versions this repo creates from
    /// a local change, per the LWW tiebreaker in `VersionRecord::ordering_key`.
    pub fn author(&self) -> (String, String) {
        (self.deps.username.clone(), self.deps.hostname.clone())
    }

    /// Signals this repo's watcher and net-loop threads to stop without
    /// affecting any other repo. A full-process shutdown (observed via
    /// `global_shutdown`) also satisfies `is_stopped`.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst) || self.global_shutdown.is_cancelled()
    }

    pub async fn name(&self) -> String {
        self.inner.lock().await.name.clone()
    }

    pub async fn repo_type(&self) -> RepoType {
        self.inner.lock().await.repo_type
    }

    pub async fn root(&self) -> Option<PathBuf> {
        self.inner.lock().await.root.clone()
    }

    pub async fn key(&self) -> Option<String> {
        self.inner.lock().await.key.clone()
    }

    pub async fn peers(&self) -> Vec<String> {
        self.inner.lock().await.peers.clone()
    }

    pub async fn add_peer(&self, address: String) {
        let mut state = self.inner.lock().await;
        if !state.peers.contains(&address) {
            state.peers.push(address);
        }
    }

    /// Registers a live connection under `address`, replacing any prior
    /// connection to the same address. Called by the network loop once a
    /// `UdpPeer` finishes connecting.
    pub async fn register_connection(&self, address: String, peer: Arc<dyn Peer>) {
        self.connections.lock().await.insert(address, peer);
    }

    /// Drops a connection the network loop has given up on (unreachable or
    /// no longer in the peer list).
    pub async fn deregister_connection(&self, address: &str) {
        self.connections.lock().await.remove(address);
    }

    /// Sends a chunk-wanted request for every missing chunk in this repo to
    /// every currently-connected peer. Does nothing if there is no local
    /// root (nothing to fill) or no live connections; the periodic network
    /// loop is what actually supplies connections.
    pub async fn request_missing_chunks(&self) -> Result<usize, ChunkerError> {
        let missing_ids: Vec<String> = {
            let state = self.inner.lock().await;
            state
                .files
                .values()
                .filter_map(|f| f.current_version())
                .flat_map(|v| v.get_missing_chunks())
                .map(|c| c.id())
                .collect()
        };
        if missing_ids.is_empty() {
            return Ok(0);
        }

        let peers: Vec<Arc<dyn Peer>> = self.connections.lock().await.values().cloned().collect();
        let mut requests_sent = 0;
        for peer in &peers {
            for chunk_id in &missing_ids {
                if peer.send(crate::infrastructure::adapters::net_loop::encode_want(chunk_id)).await.is_ok() {
                    requests_sent += 1;
                }
            }
        }
        Ok(requests_sent)
    }

    /// Returns the bytes of a locally-saved chunk matching `chunk_id`, if
    /// this repo has one on disk, encrypted under this repo's key if one is
    /// set. Used to answer peer `Want` requests. A set key whose encryption
    /// fails is treated as "no chunk available" rather than leaking
    /// plaintext onto the wire.
    pub async fn local_chunk_bytes(&self, chunk_id: &str) -> Option<Vec<u8>> {
        let state = self.inner.lock().await;
        let root = state.root.as_ref()?;
        for file in state.files.values() {
            if let Some(version) = file.current_version() {
                for chunk in &version.chunks {
                    if chunk.saved && chunk.id() == chunk_id {
                        let abs = root.join(&file.repo_relative_path);
                        let data = chunk_io::get_data(chunk, &abs);
                        return match &state.key {
                            Some(key) if !key.is_empty() => self.deps.crypto.encrypt(key.as_bytes(), &data).ok(),
                            _ => Some(data),
                        };
                    }
                }
            }
        }
        None
    }

    /// `(files_complete, files_total)`, for the `list` command.
    pub async fn completeness(&self) -> (usize, usize) {
        let state = self.inner.lock().await;
        let total = state.files.len();
        let complete = state.files.values().filter(|f| f.is_complete()).count();
        (complete, total)
    }

    pub async fn to_manifest_document(&self, shareable: bool) -> ManifestDocument {
        let state = self.inner.lock().await;
        let mut doc = ManifestDocument::new(state.name.clone(), state.repo_type, self.uuid.clone());
        doc.key = state.key.clone();
        doc.peers = state.peers.clone();
        doc.root = state.root.clone();
        for (relpath, file) in state.files.iter() {
            let versions = file
                .versions()
                .iter()
                .map(|v| VersionRecord {
                    timestamp: v.timestamp,
                    deleted: v.deleted,
                    chunks: Some(v.chunks.iter().map(|c| c.descriptor()).collect()),
                    username: v.username.clone(),
                    hostname: v.hostname.clone(),
                })
                .collect();
            doc.files.insert(relpath.clone(), ManifestFileEntry { versions });
        }
        if shareable {
            doc.into_shareable()
        } else {
            doc
        }
    }

    /// Persists the private state form (full history, `root`) at this
    /// repo's fixed, gzip-compressed state path.
    pub async fn save_state(&self) -> Result<(), ChunkerError> {
        let doc = self.to_manifest_document(false).await;
        self.deps.manifest_repository.save(&self.state_path, &doc, true).await
    }

    /// Writes the shareable manifest form (latest version per file, no
    /// `root`) to a caller-chosen path, as plaintext JSON.
    pub async fn save_manifest(&self, path: &Path) -> Result<(), ChunkerError> {
        let doc = self.to_manifest_document(true).await;
        self.deps.manifest_repository.save(path, &doc, false).await
    }

    /// Merges `record` into the File at `relpath`, materializes the
    /// resulting current version onto disk, and persists state. Called
    /// from the filesystem scan, the fs-watcher adapter, and the manifest
    /// loader.
    pub async fn update(&self, relpath: PathBuf, record: VersionRecord) -> Result<(), ChunkerError> {
        let mut state = self.inner.lock().await;
        let root = state.root.clone();

        let descriptors = match &record.chunks {
            Some(descriptors) => descriptors.clone(),
            None => match &root {
                Some(root) => self
                    .deps
                    .chunker
                    .slice(&root.join(&relpath))?
                    .into_iter()
                    .map(|oc| oc.descriptor)
                    .collect(),
                None => Vec::new(),
            },
        };

        let mut version = FileVersion::from_descriptors(&record, &descriptors);
        if let Some(root) = &root {
            let abs = root.join(&relpath);
            for chunk in version.chunks.iter_mut() {
                chunk_io::validate(chunk, &abs, self.deps.checksum.as_ref());
            }
        }

        match state.files.entry(relpath.clone()) {
            Entry::Occupied(mut existing) => existing.get_mut().merge_version(version),
            Entry::Vacant(vacant) => {
                let escape_check_root = root.clone().unwrap_or_default();
                let mut file = File::new(&escape_check_root, relpath.clone())?;
                file.merge_version(version);
                vacant.insert(file);
            }
        }

        if let Some(root) = &root {
            let abs = root.join(&relpath);
            let file = state.files.get(&relpath).expect("just inserted or merged above");
            let current = file.current_version().expect("File always has a current version once merged");

            if current.deleted {
                let _ = std::fs::remove_file(&abs);
            } else if !abs.exists() {
                std::fs::write(&abs, []).map_err(ChunkerError::from)?;
                let mtime = if current.is_complete() {
                    FileTime::from_unix_time(current.timestamp, 0)
                } else {
                    FileTime::from_unix_time(0, 0)
                };
                filetime::set_file_times(&abs, mtime, mtime).map_err(ChunkerError::from)?;
            }
        }

        drop(state);
        self.save_state().await
    }

    /// Walks `root` recursively: new or newer-mtime files trigger `update`;
    /// files previously known but no longer present on disk are recorded as
    /// deleted, with a timestamp one tick past their latest known version
    /// so any newer remote version still wins on merge.
    pub async fn add_local_files(&self) -> Result<(), ChunkerError> {
        let root = { self.inner.lock().await.root.clone() };
        let Some(root) = root else { return Ok(()) };

        let mut seen = HashSet::new();
        for path in walk_files(&root)? {
            let relpath = path.strip_prefix(&root).expect("walk_files only yields paths under root").to_path_buf();
            seen.insert(relpath.clone());

            let meta = std::fs::metadata(&path).map_err(ChunkerError::from)?;
            let mtime = FileTime::from_last_modification_time(&meta).seconds();
            let rounded = ts_round(mtime as f64);

            let latest_known = {
                let state = self.inner.lock().await;
                state.files.get(&relpath).and_then(|f| f.current_version()).map(|v| v.timestamp)
            };
            if latest_known.is_none_or(|ts| rounded > ts) {
                let (username, hostname) = self.author();
                self.update(relpath, VersionRecord::new(rounded, None).with_author(username, hostname)).await?;
            }
        }

        let offline_deletions: Vec<(PathBuf, i64)> = {
            let state = self.inner.lock().await;
            state
                .files
                .iter()
                .filter(|(relpath, file)| !file.is_deleted() && !seen.contains(*relpath))
                .filter_map(|(relpath, file)| file.current_version().map(|v| (relpath.clone(), v.timestamp)))
                .collect()
        };
        for (relpath, latest_timestamp) in offline_deletions {
            let deletion_ts = ts_round((latest_timestamp + 1) as f64);
            let (username, hostname) = self.author();
            self.update(relpath, VersionRecord::deletion(deletion_ts).with_author(username, hostname)).await?;
        }

        Ok(())
    }

    /// Gathers this repo's known and missing chunk locations for a heal
    /// pass, without running the healer. `Core::handle_heal` concatenates
    /// these across every loaded repo before a single `healer::self_heal`
    /// call, so a chunk known in one repo can fill a chunk missing in
    /// another — the cross-repo dedup pass. Returns `None` if this repo has
    /// no local root to heal against.
    pub async fn heal_locations(&self) -> Option<(Vec<ChunkLocation>, Vec<ChunkLocation>, Vec<(PathBuf, usize)>)> {
        let state = self.inner.lock().await;
        let root = state.root.clone()?;

        let mut known = Vec::new();
        let mut missing = Vec::new();
        let mut missing_locations: Vec<(PathBuf, usize)> = Vec::new();

        for (relpath, file) in state.files.iter() {
            if let Some(version) = file.current_version() {
                let abs = root.join(relpath);
                for (idx, chunk) in version.chunks.iter().enumerate() {
                    if chunk.saved {
                        known.push(ChunkLocation {
                            chunk: chunk.clone(),
                            file_path: abs.clone(),
                        });
                    } else {
                        missing.push(ChunkLocation {
                            chunk: chunk.clone(),
                            file_path: abs.clone(),
                        });
                        missing_locations.push((relpath.clone(), idx));
                    }
                }
            }
        }

        Some((known, missing, missing_locations))
    }

    /// Writes back whichever of this repo's own `missing` locations the
    /// healer filled (identified by position against `missing_locations`,
    /// the list `heal_locations` returned alongside it), then finalizes and
    /// persists state if anything changed. Returns the count of locations
    /// this repo had filled.
    pub async fn apply_healed(&self, missing: &[ChunkLocation], missing_locations: &[(PathBuf, usize)]) -> Result<usize, ChunkerError> {
        let mut state = self.inner.lock().await;
        let mut filled = 0usize;
        for (loc, (relpath, idx)) in missing.iter().zip(missing_locations.iter()) {
            if !loc.chunk.saved {
                continue;
            }
            if let Some(version) = state.files.get_mut(relpath).and_then(File::current_version_mut) {
                if let Some(chunk) = version.chunks.get_mut(*idx) {
                    *chunk = loc.chunk.clone();
                    filled += 1;
                }
            }
        }

        drop(state);
        if filled > 0 {
            self.finalize_completions().await?;
            self.save_state().await?;
        }
        Ok(filled)
    }

    /// Fills every currently-missing chunk across all files whose identity
    /// equals `chunk_id` with `data` — how a single wire arrival fills
    /// every location that happens to share that content. `data` is
    /// decrypted once under this repo's key, if one is set, before it fills
    /// any location.
    pub async fn add_chunk(&self, chunk_id: &str, data: &[u8]) -> Result<(), ChunkerError> {
        let mut state = self.inner.lock().await;
        let Some(root) = state.root.clone() else {
            return Err(ChunkerError::InvalidConfiguration("repo has no local root to write chunks into".into()));
        };

        let plaintext = match &state.key {
            Some(key) if !key.is_empty() => self.deps.crypto.decrypt(key.as_bytes(), data)?,
            _ => data.to_vec(),
        };

        let mut any_filled = false;
        for file in state.files.values_mut() {
            let abs = root.join(&file.repo_relative_path);
            let Some(version) = file.current_version_mut() else { continue };
            let version_timestamp = version.timestamp;
            for chunk in version.chunks.iter_mut() {
                if !chunk.saved
                    && chunk.id() == chunk_id
                    && chunk_io::save_data(chunk, &abs, &plaintext, false, version_timestamp).is_ok()
                {
                    any_filled = true;
                }
            }
        }

        drop(state);
        if any_filled {
            self.finalize_completions().await?;
            self.save_state().await?;
        }
        Ok(())
    }

    /// Advances a file's mtime to its version timestamp once every chunk is
    /// saved — the Partial→Complete transition from the per-file state
    /// machine. Idempotent: re-setting an already-correct mtime is harmless.
    async fn finalize_completions(&self) -> Result<(), ChunkerError> {
        let state = self.inner.lock().await;
        let Some(root) = state.root.clone() else { return Ok(()) };

        for file in state.files.values() {
            if file.is_deleted() {
                continue;
            }
            let Some(version) = file.current_version() else { continue };
            if !version.is_complete() {
                continue;
            }
            let abs = root.join(&file.repo_relative_path);
            if !abs.exists() {
                continue;
            }
            let meta = std::fs::metadata(&abs).map_err(ChunkerError::from)?;
            let atime = FileTime::from_last_access_time(&meta);
            let mtime = FileTime::from_unix_time(version.timestamp, 0);
            filetime::set_file_times(&abs, atime, mtime).map_err(ChunkerError::from)?;
        }
        Ok(())
    }
}

fn walk_files(root: &Path) -> Result<Vec<PathBuf>, ChunkerError> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(&dir).map_err(ChunkerError::from)? {
            let entry = entry.map_err(ChunkerError::from)?;
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.is_file() {
                out.push(path);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::aes_ecb_crypto::AesEcbCryptoService;
    use crate::infrastructure::adapters::fixed_chunker::FixedSizeChunker;
    use crate::infrastructure::repositories::manifest_file::JsonManifestRepository;
    use chunker_domain::services::Sha2Sha3Md5ChecksumService;
    use chunker_domain::value_objects::HashAlgorithm;
    use std::time::Duration;

    fn deps() -> RepoDeps {
        RepoDeps {
            manifest_repository: Arc::new(JsonManifestRepository),
            chunker: Arc::new(FixedSizeChunker::new(Sha2Sha3Md5ChecksumService, HashAlgorithm::Sha256).unwrap()),
            checksum: Arc::new(Sha2Sha3Md5ChecksumService),
            crypto: Arc::new(AesEcbCryptoService),
            username: "test-user".to_string(),
            hostname: "test-host".to_string(),
        }
    }

    fn token() -> CancellationToken {
        chunker_bootstrap::shutdown::ShutdownCoordinator::new(Duration::from_secs(1)).token()
    }

    #[tokio::test]
    async fn update_creates_and_materializes_a_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        let state_path = dir.path().join("repo.state");
        let repo = Repo::new(RepoId::generate(), "test", RepoType::Share, Some(root.clone()), None, state_path, deps(), token());

        repo.update(PathBuf::from("a.txt"), VersionRecord::new(10, Some(vec![]))).await.unwrap();
        assert!(root.join("a.txt").exists());
    }

    #[tokio::test]
    async fn update_deletion_unlinks_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        std::fs::write(root.join("a.txt"), b"hello").unwrap();
        let state_path = dir.path().join("repo.state");
        let repo = Repo::new(RepoId::generate(), "test", RepoType::Share, Some(root.clone()), None, state_path, deps(), token());

        repo.update(PathBuf::from("a.txt"), VersionRecord::new(10, Some(vec![]))).await.unwrap();
        repo.update(PathBuf::from("a.txt"), VersionRecord::deletion(20)).await.unwrap();
        assert!(!root.join("a.txt").exists());
    }

    #[tokio::test]
    async fn add_local_files_picks_up_new_files_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        std::fs::write(root.join("existing.txt"), b"preexisting content").unwrap();
        let state_path = dir.path().join("repo.state");
        let repo = Repo::new(RepoId::generate(), "test", RepoType::Share, Some(root.clone()), None, state_path, deps(), token());

        repo.add_local_files().await.unwrap();
        let (_, total) = repo.completeness().await;
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn add_local_files_records_offline_deletion() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        let file_path = root.join("gone.txt");
        std::fs::write(&file_path, b"will be deleted").unwrap();
        let state_path = dir.path().join("repo.state");
        let repo = Repo::new(RepoId::generate(), "test", RepoType::Share, Some(root.clone()), None, state_path, deps(), token());

        repo.add_local_files().await.unwrap();
        std::fs::remove_file(&file_path).unwrap();
        repo.add_local_files().await.unwrap();

        let doc = repo.to_manifest_document(false).await;
        let entry = &doc.files[&PathBuf::from("gone.txt")];
        assert!(entry.versions.last().unwrap().deleted);
    }

    #[tokio::test]
    async fn self_heal_fills_missing_chunk_from_known_sibling() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        std::fs::write(root.join("hello1.txt"), b"hello!").unwrap();
        std::fs::write(root.join("hello2.txt"), b"").unwrap();
        let state_path = dir.path().join("repo.state");
        let repo = Repo::new(RepoId::generate(), "test", RepoType::Share, Some(root.clone()), None, state_path, deps(), token());

        let descriptor = chunker_domain::value_objects::ChunkDescriptor::new(
            HashAlgorithm::Md5,
            6,
            "5a8dd3ad0756a93ded72b823b19dd877",
        );
        repo.update(PathBuf::from("hello1.txt"), VersionRecord::new(10, Some(vec![descriptor.clone()])))
            .await
            .unwrap();
        repo.update(PathBuf::from("hello2.txt"), VersionRecord::new(10, Some(vec![descriptor])))
            .await
            .unwrap();

        let (known, mut missing, missing_locations) = repo.heal_locations().await.unwrap();
        let healed = crate::healer::self_heal(&known, &mut missing);
        assert_eq!(healed, 6);
        repo.apply_healed(&missing, &missing_locations).await.unwrap();
        assert_eq!(std::fs::read(root.join("hello2.txt")).unwrap(), b"hello!");
    }

    #[tokio::test]
    async fn add_chunk_fills_all_matching_missing_locations() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        std::fs::write(root.join("a.txt"), b"").unwrap();
        let state_path = dir.path().join("repo.state");
        let repo = Repo::new(RepoId::generate(), "test", RepoType::Share, Some(root.clone()), None, state_path, deps(), token());

        let descriptor = chunker_domain::value_objects::ChunkDescriptor::new(
            HashAlgorithm::Md5,
            6,
            "5a8dd3ad0756a93ded72b823b19dd877",
        );
        repo.update(PathBuf::from("a.txt"), VersionRecord::new(10, Some(vec![descriptor.clone()])))
            .await
            .unwrap();

        repo.add_chunk(&descriptor.id(), b"hello!").await.unwrap();
        assert_eq!(std::fs::read(root.join("a.txt")).unwrap(), b"hello!");
    }

    #[tokio::test]
    async fn keyed_repo_round_trips_chunk_bytes_through_encryption_on_the_wire() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        std::fs::write(root.join("a.txt"), b"").unwrap();
        let state_path = dir.path().join("repo.state");
        let repo = Repo::new(
            RepoId::generate(),
            "test",
            RepoType::Share,
            Some(root.clone()),
            Some("top secret".to_string()),
            state_path,
            deps(),
            token(),
        );

        let descriptor = chunker_domain::value_objects::ChunkDescriptor::new(
            HashAlgorithm::Md5,
            6,
            "5a8dd3ad0756a93ded72b823b19dd877",
        );
        repo.update(PathBuf::from("a.txt"), VersionRecord::new(10, Some(vec![descriptor.clone()])))
            .await
            .unwrap();

        let ciphertext = deps().crypto.encrypt(b"top secret", b"hello!").unwrap();
        assert_ne!(ciphertext, b"hello!");
        repo.add_chunk(&descriptor.id(), &ciphertext).await.unwrap();
        assert_eq!(std::fs::read(root.join("a.txt")).unwrap(), b"hello!");

        let wire_bytes = repo.local_chunk_bytes(&descriptor.id()).await.unwrap();
        assert_eq!(deps().crypto.decrypt(b"top secret", &wire_bytes).unwrap(), b"hello!");
    }

    #[tokio::test]
    async fn stop_marks_repo_stopped_independent_of_global_shutdown() {
        let repo = Repo::new(RepoId::generate(), "test", RepoType::Static, None, None, PathBuf::from("/tmp/x.state"), deps(), token());
        assert!(!repo.is_stopped());
        repo.stop();
        assert!(repo.is_stopped());
    }
}
