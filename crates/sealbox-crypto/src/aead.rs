//! AES-256-GCM sealing of compressed asset bytes
//!
//! Blob format (binary):
//! ```text
//! [12 bytes: random nonce][N bytes: ciphertext][16 bytes: GCM tag]
//! ```
//!
//! No associated data is used. The nonce is drawn fresh from the OS CSPRNG
//! for every call; under a fixed key a repeated nonce voids both the
//! confidentiality and the integrity guarantee, so nonces are never
//! derived or counter-based. The byte layout is a closed contract with the
//! decrypting application; format changes are signaled through the
//! manifest `version` field, never by rearranging these offsets.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::RngCore;

use crate::keys::AssetKey;
use crate::{NONCE_SIZE, TAG_SIZE};

/// Seal a compressed asset under the run's key.
///
/// Returns `[12-byte nonce][ciphertext][16-byte tag]`. Neither the key nor
/// the plaintext is retained past the call; the caller owns (and zeroizes)
/// its plaintext buffer.
pub fn seal(key: &AssetKey, plaintext: &[u8]) -> anyhow::Result<Vec<u8>> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    // aes-gcm appends the 16-byte tag to the ciphertext
    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| anyhow::anyhow!("asset encryption failed: {e}"))?;

    let mut blob = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Open a sealed blob back to the compressed plaintext.
///
/// Exists for round-trip verification; the consuming application performs
/// its own byte-compatible decryption at fetch time.
pub fn open(key: &AssetKey, blob: &[u8]) -> anyhow::Result<Vec<u8>> {
    if blob.len() < NONCE_SIZE + TAG_SIZE {
        anyhow::bail!(
            "blob too short: {} bytes (minimum {})",
            blob.len(),
            NONCE_SIZE + TAG_SIZE
        );
    }

    let (nonce_bytes, ciphertext) = blob.split_at(NONCE_SIZE);
    let nonce = Nonce::from_slice(nonce_bytes);
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| anyhow::anyhow!("asset decryption failed: wrong key or corrupted blob"))
}
