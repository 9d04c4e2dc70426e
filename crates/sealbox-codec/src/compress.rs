//! Raw DEFLATE compression applied before encryption
//!
//! Compression is a size-reduction transform only; it carries no secrecy or
//! integrity properties. It must run before encryption: ciphertext has no
//! exploitable redundancy, so the reverse order would compress nothing.
//! The pipeline encodes that ordering in its stage types.

use anyhow::{Context, Result};
use flate2::write::{DeflateDecoder, DeflateEncoder};
use flate2::Compression;
use std::io::Write;

/// Compress `data` as a raw DEFLATE stream at the best compression level.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let out = Vec::with_capacity(data.len() / 2 + 64);
    let mut encoder = DeflateEncoder::new(out, Compression::best());
    encoder.write_all(data).context("deflate write")?;
    encoder.finish().context("deflate finish")
}

/// Inflate a raw DEFLATE stream back to the original bytes.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = DeflateDecoder::new(Vec::new());
    decoder.write_all(data).context("inflate write")?;
    decoder.finish().context("inflate finish")
}
