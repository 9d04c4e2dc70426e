use serde::{Deserialize, Serialize};

/// Pipeline stage a single asset moves through.
///
/// The orchestrator names every step it performs with one of these, so the
/// compress-before-encrypt ordering is part of the type vocabulary rather
/// than an implicit call sequence, and failure records can say exactly
/// where an asset died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Reading the plaintext from disk
    Read,
    /// DEFLATE compression of the plaintext
    Compress,
    /// AEAD sealing of the compressed bytes
    Encrypt,
    /// Writing the blob to the output directory
    Write,
    /// Re-hashing the written blob for the manifest checksum
    Verify,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Read => "read",
            Stage::Compress => "compress",
            Stage::Encrypt => "encrypt",
            Stage::Write => "write",
            Stage::Verify => "verify",
        };
        f.write_str(s)
    }
}

/// One failed asset: which file, which stage, and what went wrong.
///
/// Failures never appear in the manifest itself; they are logged and,
/// when any exist, written to a separate machine-readable list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Original file name relative to the input root
    pub original_name: String,
    /// Stage that raised the error
    pub stage: Stage,
    /// Human-readable error chain
    pub error: String,
}
