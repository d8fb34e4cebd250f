// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # AES-ECB Crypto Adapter
//!
//! Legacy-compatible chunk payload encryption: AES-256 in ECB mode with
//! PKCS7 padding. ECB mode leaks equality between identical plaintext
//! blocks and has no IV, which is precisely why it was kept — the legacy
//! manifest format has no field to carry one. `CryptoService` is a trait
//! seam specifically so a versioned AES-CTR-with-derived-nonce replacement
//! can ship later without `Repo` changing at all.
//!
//! Keys of any length are accepted; a repo key that isn't exactly 32 bytes
//! is stretched to one by SHA-256, matching the "key is given, not
//! negotiated" posture (repo keys are opaque secrets, not raw AES keys).

use aes::Aes256;
use ecb::cipher::block_padding::Pkcs7;
use ecb::cipher::{BlockDecryptMut, BlockEncryptMut, KeyInit};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use chunker_domain::services::CryptoService;
use chunker_domain::ChunkerError;

type Aes256EcbEnc = ecb::Encryptor<Aes256>;
type Aes256EcbDec = ecb::Decryptor<Aes256>;

#[derive(Debug, Default, Clone, Copy)]
pub struct AesEcbCryptoService;

impl AesEcbCryptoService {
    fn derive_key(key: &[u8]) -> [u8; 32] {
        if key.len() == 32 {
            let mut out = [0u8; 32];
            out.copy_from_slice(key);
            out
        } else {
            let mut hasher = Sha256::new();
            hasher.update(key);
            let mut out = [0u8; 32];
            out.copy_from_slice(&hasher.finalize());
            out
        }
    }
}

impl CryptoService for AesEcbCryptoService {
    fn encrypt(&self, key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, ChunkerError> {
        let mut derived = Self::derive_key(key);
        let enc = Aes256EcbEnc::new(&derived.into());
        let ciphertext = enc.encrypt_padded_vec_mut::<Pkcs7>(plaintext);
        derived.zeroize();
        Ok(ciphertext)
    }

    fn decrypt(&self, key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, ChunkerError> {
        let mut derived = Self::derive_key(key);
        let dec = Aes256EcbDec::new(&derived.into());
        let plaintext = dec
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|e| ChunkerError::CryptoFailure(e.to_string()))?;
        derived.zeroize();
        Ok(plaintext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_with_32_byte_key() {
        let svc = AesEcbCryptoService;
        let key = [1u8; 32];
        let plaintext = b"chunk payload bytes, arbitrary length".to_vec();
        let ciphertext = svc.encrypt(&key, &plaintext).unwrap();
        assert_ne!(ciphertext, plaintext);
        let decrypted = svc.decrypt(&key, &ciphertext).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn round_trips_with_arbitrary_length_key() {
        let svc = AesEcbCryptoService;
        let key = b"a short repo passphrase";
        let plaintext = b"more chunk bytes".to_vec();
        let ciphertext = svc.encrypt(key, &plaintext).unwrap();
        let decrypted = svc.decrypt(key, &ciphertext).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn identical_plaintext_blocks_produce_identical_ciphertext_blocks() {
        let svc = AesEcbCryptoService;
        let key = [2u8; 32];
        let block = [9u8; 16];
        let mut plaintext = block.to_vec();
        plaintext.extend_from_slice(&block);
        let ciphertext = svc.encrypt(&key, &plaintext).unwrap();
        assert_eq!(ciphertext[0..16], ciphertext[16..32]);
    }

    #[test]
    fn decrypt_rejects_corrupt_padding() {
        let svc = AesEcbCryptoService;
        let key = [3u8; 32];
        let mut ciphertext = svc.encrypt(&key, b"hello").unwrap();
        let last = ciphertext.len() - 1;
        ciphertext[last] ^= 0xFF;
        assert!(svc.decrypt(&key, &ciphertext).is_err());
    }
}
