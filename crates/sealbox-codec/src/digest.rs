//! SHA-256 content hashing for byte slices, readers, and files
//!
//! The digest serves two distinct jobs: hashed over the original plaintext
//! it becomes the blob's content-addressed name, and hashed over the final
//! encrypted blob it becomes the manifest checksum.

use anyhow::{Context, Result};
use sha2::{Digest as _, Sha256};
use std::io::Read;
use std::path::Path;

/// A SHA-256 digest (32 bytes), displayed as 64 hex chars
pub type Digest = [u8; 32];

/// Hash a byte slice in memory. Fast for small inputs.
pub fn digest_bytes(data: &[u8]) -> Digest {
    Sha256::digest(data).into()
}

/// Hash everything a reader produces.
///
/// A read error propagates immediately; no partial digest is ever returned.
pub fn digest_reader<R: Read>(mut reader: R) -> Result<Digest> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 64 * 1024]; // 64KB read buffer

    loop {
        let n = reader.read(&mut buf).context("reading for digest")?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hasher.finalize().into())
}

/// Hash a file from disk using the streaming interface.
pub fn digest_file(path: &Path) -> Result<Digest> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening file for digest: {}", path.display()))?;
    digest_reader(file)
}

/// Format a digest as a lowercase hex string (64 chars)
pub fn digest_to_hex(digest: &Digest) -> String {
    hex::encode(digest)
}

/// Parse a 64-char hex string into a Digest
pub fn digest_from_hex(s: &str) -> Result<Digest> {
    let bytes = hex::decode(s).with_context(|| format!("invalid SHA-256 hex '{s}'"))?;
    bytes
        .try_into()
        .map_err(|_| anyhow::anyhow!("SHA-256 hex must decode to 32 bytes"))
}
