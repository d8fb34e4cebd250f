// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Per-Repo Network Loop
//!
//! Each repo with a non-empty peer list gets one background task per peer
//! address. A peer's loop connects, then alternates between waiting on an
//! incoming frame and a 60-second keepalive tick; if nothing has been heard
//! from a peer in 300 seconds it is dropped and the connection removed from
//! the repo's registry. With no peers configured, the repo-level loop just
//! sleeps 5 seconds and checks again, rather than spinning.
//!
//! The wire frame is deliberately minimal: a one-byte tag followed by a
//! tag-specific payload. `Want` asks a peer for a chunk by identity; `Data`
//! answers with the chunk's bytes; `Keepalive` carries nothing. Anything
//! else this engine might eventually need to say to a peer (manifest
//! exchange, repo discovery) is out of scope here — see `DESIGN.md`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::UdpSocket;

use chunker_bootstrap::shutdown::CancellationToken;
use chunker_domain::repositories::{Peer, PeerMessage};
use chunker_domain::ChunkerError;

use crate::repo::Repo;

const KEEPALIVE_SECS: u64 = 60;
const UNREACHABLE_SECS: i64 = 300;
const PEERLESS_POLL_SECS: u64 = 5;

const TAG_KEEPALIVE: u8 = 0;
const TAG_WANT: u8 = 1;
const TAG_DATA: u8 = 2;

pub fn encode_want(chunk_id: &str) -> PeerMessage {
    let mut bytes = vec![TAG_WANT];
    bytes.extend_from_slice(chunk_id.as_bytes());
    PeerMessage(bytes)
}

pub fn encode_data(chunk_id: &str, data: &[u8]) -> PeerMessage {
    let mut bytes = vec![TAG_DATA];
    bytes.extend_from_slice(&(chunk_id.len() as u16).to_be_bytes());
    bytes.extend_from_slice(chunk_id.as_bytes());
    bytes.extend_from_slice(data);
    PeerMessage(bytes)
}

fn encode_keepalive() -> PeerMessage {
    PeerMessage(vec![TAG_KEEPALIVE])
}

enum Frame {
    Keepalive,
    Want { chunk_id: String },
    Data { chunk_id: String, data: Vec<u8> },
    Unrecognized,
}

fn decode(message: &PeerMessage) -> Frame {
    let bytes = &message.0;
    match bytes.first() {
        Some(&TAG_KEEPALIVE) => Frame::Keepalive,
        Some(&TAG_WANT) => match std::str::from_utf8(&bytes[1..]) {
            Ok(chunk_id) => Frame::Want { chunk_id: chunk_id.to_string() },
            Err(_) => Frame::Unrecognized,
        },
        Some(&TAG_DATA) if bytes.len() >= 3 => {
            let id_len = u16::from_be_bytes([bytes[1], bytes[2]]) as usize;
            let id_start = 3;
            let id_end = id_start + id_len;
            if bytes.len() < id_end {
                return Frame::Unrecognized;
            }
            match std::str::from_utf8(&bytes[id_start..id_end]) {
                Ok(chunk_id) => Frame::Data {
                    chunk_id: chunk_id.to_string(),
                    data: bytes[id_end..].to_vec(),
                },
                Err(_) => Frame::Unrecognized,
            }
        }
        _ => Frame::Unrecognized,
    }
}

fn now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// A connected UDP socket standing in for one peer. "Connected" here only
/// means `connect()` has fixed the remote address for `send`/`recv`; UDP
/// itself carries no session state, so `is_connected` tracks whether this
/// peer has been explicitly dropped by the network loop, not a live socket.
pub struct UdpPeer {
    address: String,
    socket: UdpSocket,
    last_seen: AtomicI64,
    connected: AtomicBool,
}

impl UdpPeer {
    pub async fn connect(address: &str) -> Result<Self, ChunkerError> {
        let socket = UdpSocket::bind("0.0.0.0:0").await.map_err(ChunkerError::from)?;
        socket.connect(address).await.map_err(ChunkerError::from)?;
        Ok(Self {
            address: address.to_string(),
            socket,
            last_seen: AtomicI64::new(now()),
            connected: AtomicBool::new(true),
        })
    }
}

#[async_trait]
impl Peer for UdpPeer {
    fn address(&self) -> &str {
        &self.address
    }

    async fn send(&self, message: PeerMessage) -> Result<(), ChunkerError> {
        self.socket.send(&message.0).await.map(|_| ()).map_err(ChunkerError::from)
    }

    async fn recv(&self) -> Result<Option<PeerMessage>, ChunkerError> {
        let mut buf = vec![0u8; 64 * 1024];
        let n = self.socket.recv(&mut buf).await.map_err(ChunkerError::from)?;
        self.last_seen.store(now(), Ordering::SeqCst);
        Ok(Some(PeerMessage(buf[..n].to_vec())))
    }

    fn last_seen(&self) -> i64 {
        self.last_seen.load(Ordering::SeqCst)
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

/// Drives this repo's peer set: connects newly-configured peer addresses
/// and spawns one loop per connection. Returns only when the repo or the
/// whole process is shutting down.
pub async fn run(repo: Arc<Repo>, shutdown: CancellationToken) {
    let mut spawned = HashMap::new();

    loop {
        if repo.is_stopped() {
            break;
        }

        let addresses = repo.peers().await;
        if addresses.is_empty() {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(Duration::from_secs(PEERLESS_POLL_SECS)) => continue,
            }
        }

        for address in &addresses {
            if spawned.contains_key(address) {
                continue;
            }
            match UdpPeer::connect(address).await {
                Ok(peer) => {
                    let peer = Arc::new(peer);
                    repo.register_connection(address.clone(), peer.clone()).await;
                    let handle = tokio::spawn(peer_loop(Arc::clone(&repo), peer, shutdown.clone()));
                    spawned.insert(address.clone(), handle);
                }
                Err(err) => {
                    tracing::warn!(peer = %address, error = %err, "failed to connect to peer");
                }
            }
        }
        spawned.retain(|address, handle| {
            let keep = addresses.contains(address) && !handle.is_finished();
            if !keep {
                handle.abort();
            }
            keep
        });

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(Duration::from_secs(PEERLESS_POLL_SECS)) => continue,
        }
    }

    for (_, handle) in spawned {
        handle.abort();
    }
}

async fn peer_loop(repo: Arc<Repo>, peer: Arc<UdpPeer>, shutdown: CancellationToken) {
    loop {
        if repo.is_stopped() || now() - peer.last_seen() > UNREACHABLE_SECS {
            break;
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(Duration::from_secs(KEEPALIVE_SECS)) => {
                if peer.send(encode_keepalive()).await.is_err() {
                    break;
                }
            }
            received = peer.recv() => {
                match received {
                    Ok(Some(message)) => handle_frame(&repo, peer.as_ref(), decode(&message)).await,
                    Ok(None) => {}
                    Err(_) => break,
                }
            }
        }
    }
    repo.deregister_connection(peer.address()).await;
}

async fn handle_frame(repo: &Repo, peer: &UdpPeer, frame: Frame) {
    match frame {
        Frame::Keepalive | Frame::Unrecognized => {}
        Frame::Want { chunk_id } => {
            if let Some(data) = repo.local_chunk_bytes(&chunk_id).await {
                let _ = peer.send(encode_data(&chunk_id, &data)).await;
            }
        }
        Frame::Data { chunk_id, data } => {
            let _ = repo.add_chunk(&chunk_id, &data).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn want_round_trips() {
        let message = encode_want("sha256:4:aa");
        match decode(&message) {
            Frame::Want { chunk_id } => assert_eq!(chunk_id, "sha256:4:aa"),
            _ => panic!("expected Want frame"),
        }
    }

    #[test]
    fn data_round_trips() {
        let message = encode_data("md5:6:deadbeef", b"hello!");
        match decode(&message) {
            Frame::Data { chunk_id, data } => {
                assert_eq!(chunk_id, "md5:6:deadbeef");
                assert_eq!(data, b"hello!");
            }
            _ => panic!("expected Data frame"),
        }
    }

    #[test]
    fn keepalive_round_trips() {
        assert!(matches!(decode(&encode_keepalive()), Frame::Keepalive));
    }

    #[test]
    fn truncated_data_frame_is_unrecognized() {
        let message = PeerMessage(vec![TAG_DATA, 0, 10, b'a']);
        assert!(matches!(decode(&message), Frame::Unrecognized));
    }
}
