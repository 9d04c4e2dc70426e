use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{SealboxError, SealboxResult};

/// Top-level pipeline configuration (loaded from sealbox.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SealboxConfig {
    pub assets: AssetsConfig,
    pub key: KeyConfig,
    pub pipeline: PipelineConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory scanned recursively for input files
    pub input_dir: PathBuf,
    /// Directory the encrypted blobs are written to
    pub output_dir: PathBuf,
    /// Path of the generated manifest JSON
    pub manifest_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    /// Path of the 32-byte binary key file
    pub file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Worker thread count (0 = cpu_count, 1 = sequential)
    pub workers: usize,
    /// Glob patterns to exclude from discovery (matched on file names)
    pub exclude_patterns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (default: info)
    pub level: String,
    /// Log format: "json" or "text"
    pub format: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("content"),
            output_dir: PathBuf::from("dist/assets"),
            manifest_path: PathBuf::from("dist/asset-manifest.json"),
        }
    }
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("sealbox.key"),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            exclude_patterns: Vec::new(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl SealboxConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file is not an error: defaults apply, so the tool runs
    /// without any config when the standard layout is used.
    pub fn load(path: &Path) -> SealboxResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text)
            .map_err(|e| SealboxError::Config(format!("{}: {e}", path.display())))
    }
}
