// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Manifest File Repository
//!
//! The filesystem `ManifestRepository` implementation. `load` detects the
//! gzip magic bytes (`1f 8b`) up front rather than trying decompression and
//! catching the failure, so a truncated or corrupt gzip stream still
//! surfaces as `ManifestCorrupt` instead of masquerading as "it must be
//! plaintext". `save` writes indented plaintext for shareable manifests and
//! gzip for state files, per the caller's `gzip` flag.

use std::io::{Read, Write};
use std::path::Path;

use async_trait::async_trait;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use chunker_domain::repositories::ManifestRepository;
use chunker_domain::value_objects::ManifestDocument;
use chunker_domain::ChunkerError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonManifestRepository;

fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0..2] == GZIP_MAGIC
}

fn decompress(bytes: &[u8]) -> Result<Vec<u8>, ChunkerError> {
    let mut decoder = GzDecoder::new(bytes);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| ChunkerError::ManifestCorrupt(format!("gzip decode failed: {e}")))?;
    Ok(out)
}

fn compress(bytes: &[u8]) -> Result<Vec<u8>, ChunkerError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).map_err(ChunkerError::from)?;
    encoder.finish().map_err(ChunkerError::from)
}

#[async_trait]
impl ManifestRepository for JsonManifestRepository {
    async fn load(&self, path: &Path) -> Result<ManifestDocument, ChunkerError> {
        let bytes = tokio::fs::read(path).await.map_err(ChunkerError::from)?;
        let json_bytes = if is_gzip(&bytes) { decompress(&bytes)? } else { bytes };
        serde_json::from_slice(&json_bytes).map_err(ChunkerError::from)
    }

    async fn save(&self, path: &Path, document: &ManifestDocument, gzip: bool) -> Result<(), ChunkerError> {
        let json = serde_json::to_vec_pretty(document).map_err(ChunkerError::from)?;
        let bytes = if gzip { compress(&json)? } else { json };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(ChunkerError::from)?;
        }
        tokio::fs::write(path, bytes).await.map_err(ChunkerError::from)
    }
}
