//! Versioned asset manifest: the run's sole externally visible summary
//!
//! Records accumulate in batch order and the aggregate is frozen once per
//! run. Failed assets never appear here; when a run has failures they are
//! written to a separate `.failures.json` list instead, so the manifest
//! only ever describes fetchable blobs.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use sealbox_core::types::FailureRecord;

/// Manifest format version written by this tool
pub const MANIFEST_VERSION: &str = "1.0";

/// Blob format version stamped into each record; bumped if the
/// nonce/ciphertext/tag layout ever changes
pub const RECORD_VERSION: u32 = 1;

/// One successfully transformed asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Original file name relative to the input root
    pub original_name: String,
    /// CDN-relative fetch path ("assets/" + obfuscated name)
    pub cdn_path: String,
    /// SHA-256 of the encrypted blob (hex)
    pub checksum: String,
    /// Encrypted blob size in bytes (includes nonce + tag overhead)
    pub size_bytes: u64,
    /// Original plaintext size in bytes
    pub original_size_bytes: u64,
    /// Blob format version
    pub version: u32,
    /// Unix timestamp when the blob was sealed
    pub encrypted_at: u64,
}

/// The manifest for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Manifest format version
    pub version: String,
    /// Unix timestamp when the manifest was generated
    pub generated_at: u64,
    /// Number of records (always equals `files.len()`)
    pub files_count: u64,
    /// Records in batch order
    pub files: Vec<AssetRecord>,
}

impl Manifest {
    /// Serialize to pretty JSON bytes.
    pub fn to_bytes(&self) -> anyhow::Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| anyhow::anyhow!("serializing manifest: {e}"))
    }

    /// Deserialize from JSON bytes.
    pub fn from_bytes(data: &[u8]) -> anyhow::Result<Self> {
        serde_json::from_slice(data).map_err(|e| anyhow::anyhow!("deserializing manifest: {e}"))
    }

    /// Write the manifest JSON, creating parent directories as needed.
    pub fn write_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| anyhow::anyhow!("creating {}: {e}", parent.display()))?;
        }
        std::fs::write(path, self.to_bytes()?)
            .map_err(|e| anyhow::anyhow!("writing {}: {e}", path.display()))
    }
}

/// Accumulates records in processing order, then freezes into a `Manifest`.
#[derive(Debug, Default)]
pub struct ManifestBuilder {
    records: Vec<AssetRecord>,
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: AssetRecord) {
        self.records.push(record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = AssetRecord>) {
        self.records.extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Freeze the accumulated records into the run's manifest.
    pub fn finish(self) -> Manifest {
        Manifest {
            version: MANIFEST_VERSION.to_string(),
            generated_at: unix_now(),
            files_count: self.records.len() as u64,
            files: self.records,
        }
    }
}

/// Write the machine-readable failure list next to the manifest.
pub fn write_failure_list(path: &Path, failures: &[FailureRecord]) -> anyhow::Result<()> {
    let bytes = serde_json::to_vec_pretty(failures)
        .map_err(|e| anyhow::anyhow!("serializing failure list: {e}"))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| anyhow::anyhow!("creating {}: {e}", parent.display()))?;
    }
    std::fs::write(path, bytes).map_err(|e| anyhow::anyhow!("writing {}: {e}", path.display()))
}

pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(name: &str) -> AssetRecord {
        AssetRecord {
            original_name: name.into(),
            cdn_path: "assets/0123456789abcdef.bin".into(),
            checksum: "ab".repeat(32),
            size_bytes: 128,
            original_size_bytes: 4096,
            version: RECORD_VERSION,
            encrypted_at: 1_700_000_000,
        }
    }

    #[test]
    fn builder_preserves_order_and_count() {
        let mut builder = ManifestBuilder::new();
        builder.push(sample_record("a.txt"));
        builder.push(sample_record("b.txt"));
        let manifest = builder.finish();

        assert_eq!(manifest.version, MANIFEST_VERSION);
        assert_eq!(manifest.files_count, 2);
        assert_eq!(manifest.files[0].original_name, "a.txt");
        assert_eq!(manifest.files[1].original_name, "b.txt");
        assert!(manifest.generated_at > 0);
    }

    #[test]
    fn empty_builder_finishes_to_empty_manifest() {
        let manifest = ManifestBuilder::new().finish();
        assert_eq!(manifest.files_count, 0);
        assert!(manifest.files.is_empty());
    }

    #[test]
    fn json_roundtrip() {
        let mut builder = ManifestBuilder::new();
        builder.push(sample_record("docs/plan.md"));
        let manifest = builder.finish();

        let bytes = manifest.to_bytes().unwrap();
        let parsed = Manifest::from_bytes(&bytes).unwrap();
        assert_eq!(parsed.files_count, 1);
        assert_eq!(parsed.files[0].original_name, "docs/plan.md");
        assert_eq!(parsed.files[0].version, RECORD_VERSION);
    }

    #[test]
    fn write_to_creates_parent_dirs() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("deep/nested/manifest.json");
        ManifestBuilder::new().finish().write_to(&path).unwrap();
        let parsed = Manifest::from_bytes(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(parsed.files_count, 0);
    }
}
