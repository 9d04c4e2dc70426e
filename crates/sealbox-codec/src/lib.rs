//! sealbox-codec: SHA-256 content hashing, DEFLATE compression, and
//! obfuscated blob naming
//!
//! # Overview
//! - `digest`: deterministic SHA-256 hashing of bytes, readers, and files
//! - `compress`: raw-DEFLATE size reduction applied before encryption
//! - `names`: content-addressed blob names derived from the plaintext digest

pub mod compress;
pub mod digest;
pub mod names;

// Convenience re-exports for the most common operations
pub use compress::{compress, decompress};
pub use digest::{digest_bytes, digest_file, digest_from_hex, digest_reader, digest_to_hex, Digest};
pub use names::{cdn_path, obfuscated_name};
