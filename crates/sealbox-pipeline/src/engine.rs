//! The per-asset stage machine and the batch runner
//!
//! Every asset moves through the same fixed stage sequence:
//!
//! ```text
//! read → compress → encrypt → write → verify → record
//! ```
//!
//! The name of the blob comes from the SHA-256 of the *original plaintext*
//! (computed at the read stage), never from the compressed or encrypted
//! bytes. Compression runs strictly before encryption; ciphertext has no
//! redundancy left to compress, so the stages are not reorderable.
//!
//! A failure at any stage terminates that asset only. The batch continues,
//! the failure is recorded with its stage, and any partially written output
//! for the failed asset is discarded (blob writes go through a temp file
//! that only persists on success).

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};
use zeroize::Zeroize;

use sealbox_codec::{cdn_path, compress, digest_bytes, digest_file, digest_to_hex, obfuscated_name};
use sealbox_core::types::{FailureRecord, Stage};
use sealbox_crypto::{seal, AssetKey};

use crate::discover::DiscoveredAsset;
use crate::manifest::{unix_now, AssetRecord, RECORD_VERSION};

/// Progress callback, invoked once per completed asset with its name.
pub type ProgressFn = Box<dyn Fn(&str) + Send + Sync>;

/// Batch tuning knobs.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Worker thread count: 0 = one per CPU, 1 = sequential baseline
    pub workers: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self { workers: 0 }
    }
}

/// Everything one run produced: records for the manifest, failures for
/// the sidecar list. Failed assets never become records.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub records: Vec<AssetRecord>,
    pub failures: Vec<FailureRecord>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.records.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Transform one asset into an encrypted blob plus its manifest record.
///
/// Terminal states are `Ok(record)` and `Err(failure)`; the failure names
/// the stage that raised it.
pub fn transform_asset(
    key: &AssetKey,
    asset: &DiscoveredAsset,
    output_dir: &Path,
) -> Result<AssetRecord, FailureRecord> {
    let fail = |stage: Stage, err: anyhow::Error| FailureRecord {
        original_name: asset.original_name.clone(),
        stage,
        error: format!("{err:#}"),
    };

    // Read
    let mut plaintext = std::fs::read(&asset.path)
        .with_context(|| format!("reading {}", asset.path.display()))
        .map_err(|e| fail(Stage::Read, e))?;
    let original_size = plaintext.len() as u64;

    // The blob name is content-addressed from the original plaintext
    let name = obfuscated_name(&digest_bytes(&plaintext));

    // Compress
    let mut compressed = match compress(&plaintext) {
        Ok(c) => c,
        Err(e) => {
            plaintext.zeroize();
            return Err(fail(Stage::Compress, e));
        }
    };
    plaintext.zeroize();

    // Encrypt; the compressed buffer is the last sensitive copy and is
    // erased as soon as the sealed blob exists
    let blob = match seal(key, &compressed) {
        Ok(b) => b,
        Err(e) => {
            compressed.zeroize();
            return Err(fail(Stage::Encrypt, e));
        }
    };
    compressed.zeroize();

    // Write
    let blob_path = output_dir.join(&name);
    write_blob(&blob, &blob_path, output_dir).map_err(|e| fail(Stage::Write, e))?;

    // Verify: re-hash what actually landed on disk
    let checksum = digest_file(&blob_path).map_err(|e| fail(Stage::Verify, e))?;

    debug!(
        name = %asset.original_name,
        blob = %name,
        size = blob.len(),
        "asset sealed"
    );

    Ok(AssetRecord {
        original_name: asset.original_name.clone(),
        cdn_path: cdn_path(&name),
        checksum: digest_to_hex(&checksum),
        size_bytes: blob.len() as u64,
        original_size_bytes: original_size,
        version: RECORD_VERSION,
        encrypted_at: unix_now(),
    })
}

/// Run the whole batch, sequentially or across a worker pool.
///
/// The key is only ever read by workers; erasing it is the caller's job
/// and must happen exactly once, after this returns. Results are collected
/// in input order regardless of worker interleaving, so manifest order is
/// reproducible.
pub fn run_batch(
    key: &AssetKey,
    assets: &[DiscoveredAsset],
    output_dir: &Path,
    options: &BatchOptions,
    progress: Option<&ProgressFn>,
) -> Result<BatchReport> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output dir: {}", output_dir.display()))?;

    if assets.is_empty() {
        info!("no input files found; nothing to seal");
        return Ok(BatchReport::default());
    }

    let transform = |asset: &DiscoveredAsset| {
        let outcome = transform_asset(key, asset, output_dir);
        if let Some(progress) = progress {
            progress(&asset.original_name);
        }
        outcome
    };

    let outcomes: Vec<Result<AssetRecord, FailureRecord>> = if options.workers == 1 {
        assets.iter().map(transform).collect()
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.workers)
            .build()
            .context("building worker pool")?;
        pool.install(|| assets.par_iter().map(transform).collect())
    };

    let mut report = BatchReport::default();
    for outcome in outcomes {
        match outcome {
            Ok(record) => report.records.push(record),
            Err(failure) => {
                warn!(
                    name = %failure.original_name,
                    stage = %failure.stage,
                    error = %failure.error,
                    "asset failed"
                );
                report.failures.push(failure);
            }
        }
    }

    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "batch complete"
    );
    Ok(report)
}

/// Write a blob atomically: temp file in the same directory, then rename.
/// A failure before the rename leaves nothing at the final path.
fn write_blob(blob: &[u8], final_path: &Path, dir: &Path) -> Result<()> {
    let mut tmp = tempfile::NamedTempFile::new_in(dir).context("creating temp blob")?;
    tmp.write_all(blob).context("writing blob")?;
    tmp.persist(final_path)
        .map_err(|e| anyhow::anyhow!("persisting blob to {}: {e}", final_path.display()))?;
    Ok(())
}
