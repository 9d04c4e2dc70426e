//! sealbox-pipeline: the asset transformation engine
//!
//! Per file: plaintext → SHA-256 name → deflate → AES-256-GCM seal →
//! content-named blob → blob checksum → manifest record.
//!
//! - `discover`: deterministic recursive input discovery with glob excludes
//! - `engine`: the per-asset stage machine and the batch runner
//! - `manifest`: versioned manifest aggregation and JSON artifacts

pub mod discover;
pub mod engine;
pub mod manifest;

pub use discover::{discover_assets, DiscoveredAsset};
pub use engine::{run_batch, transform_asset, BatchOptions, BatchReport, ProgressFn};
pub use manifest::{AssetRecord, Manifest, ManifestBuilder, MANIFEST_VERSION, RECORD_VERSION};
