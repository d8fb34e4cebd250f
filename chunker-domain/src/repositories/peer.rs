// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Peer Repository Port
//!
//! A `Peer` is one live connection to another node in the same repo's swarm.
//! The domain only needs to send and receive manifest/chunk-request frames
//! and compare peers for a stable ordering; the socket, the wire framing,
//! and the heartbeat clock live in infrastructure.

use async_trait::async_trait;

use crate::ChunkerError;

/// A single frame exchanged between two peers. The domain treats these as
/// opaque bytes; framing and (de)serialization are infrastructure concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerMessage(pub Vec<u8>);

#[async_trait]
pub trait Peer: Send + Sync {
    /// A stable identity usable for sorting and deduplicating peers, e.g.
    /// `"host:port"`. Two handles to the same underlying connection must
    /// return equal addresses.
    fn address(&self) -> &str;

    async fn send(&self, message: PeerMessage) -> Result<(), ChunkerError>;

    async fn recv(&self) -> Result<Option<PeerMessage>, ChunkerError>;

    /// Unix timestamp of the last message received from this peer, used by
    /// the healer to evict peers that have gone silent.
    fn last_seen(&self) -> i64;

    fn is_connected(&self) -> bool;
}
