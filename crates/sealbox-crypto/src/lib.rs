//! sealbox-crypto: AES-256-GCM asset sealing and key material lifecycle
//!
//! Pipeline position: plaintext → deflate → **seal** → content-named blob
//!
//! Blob layout (the wire contract with the decrypting application):
//! ```text
//! [12 bytes: random nonce][N bytes: ciphertext][16 bytes: GCM tag]
//! N = length of the compressed plaintext; total = 28 + N bytes
//! ```
//!
//! Key material is a single 32-byte secret provisioned out-of-band. It is
//! loaded once per run, validated, and zeroized on every exit path.

pub mod aead;
pub mod keys;

pub use aead::{open, seal};
pub use keys::{generate_key, load_key, write_key_file, AssetKey};

/// Size of the symmetric key in bytes (AES-256)
pub const KEY_SIZE: usize = 32;

/// Size of a GCM nonce (96-bit)
pub const NONCE_SIZE: usize = 12;

/// Size of a GCM authentication tag
pub const TAG_SIZE: usize = 16;

/// Fixed per-blob overhead: nonce + tag
pub const BLOB_OVERHEAD: usize = NONCE_SIZE + TAG_SIZE;
