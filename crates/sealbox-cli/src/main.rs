//! sealbox: prepare sensitive documents for CDN distribution
//!
//! Commands:
//!   seal         - transform a content tree into encrypted, content-named blobs + manifest
//!   keygen       - generate a 32-byte key file for out-of-band provisioning
//!   config show  - display the effective configuration

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use sealbox_core::config::SealboxConfig;
use sealbox_crypto::AssetKey;
use sealbox_pipeline::manifest::write_failure_list;
use sealbox_pipeline::{
    discover_assets, run_batch, BatchOptions, ManifestBuilder, ProgressFn,
};

// ── CLI structure ─────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "sealbox",
    version,
    about = "Seal sensitive documents into opaque CDN assets",
    long_about = "sealbox: compress, encrypt, and content-address a document tree, \
                  emitting a manifest for the consuming application"
)]
struct Cli {
    /// Path to sealbox.toml configuration file
    #[arg(long, short = 'c', env = "SEALBOX_CONFIG", default_value = "sealbox.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides config
    #[arg(long, env = "SEALBOX_LOG")]
    log: Option<String>,

    /// Log format (json, text); overrides config
    #[arg(long, env = "SEALBOX_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Seal a content tree into encrypted blobs plus a manifest
    Seal {
        /// Input directory (default: config assets.input_dir)
        input: Option<PathBuf>,
        /// Output directory for blobs (default: config assets.output_dir)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
        /// Path of the 32-byte key file (default: config key.file)
        #[arg(long, short = 'k', env = "SEALBOX_KEY_FILE")]
        key_file: Option<PathBuf>,
        /// Manifest output path (default: config assets.manifest_path)
        #[arg(long)]
        manifest: Option<PathBuf>,
        /// Worker thread count (0 = one per CPU, 1 = sequential)
        #[arg(long)]
        workers: Option<usize>,
    },

    /// Generate a new 32-byte key file for out-of-band provisioning
    Keygen {
        /// Destination path (default: config key.file)
        output: Option<PathBuf>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
}

#[derive(Clone, Debug, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = SealboxConfig::load(&cli.config)?;

    let level = cli.log.clone().unwrap_or_else(|| config.log.level.clone());
    let format = cli.log_format.clone().unwrap_or_else(|| {
        if config.log.format == "json" {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    });
    init_logging(&level, &format);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config.display(),
        "sealbox starting"
    );

    match cli.command {
        Commands::Seal {
            input,
            output,
            key_file,
            manifest,
            workers,
        } => cmd_seal(
            &config,
            input.as_deref(),
            output.as_deref(),
            key_file.as_deref(),
            manifest.as_deref(),
            workers,
        ),
        Commands::Keygen { output } => cmd_keygen(&config, output.as_deref()),
        Commands::Config {
            action: ConfigAction::Show,
        } => cmd_config_show(&config, &cli.config),
    }
}

fn init_logging(level: &str, format: &LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json())
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .init();
        }
    }
}

// ── `sealbox seal` ────────────────────────────────────────────────────────────

fn cmd_seal(
    config: &SealboxConfig,
    input: Option<&Path>,
    output: Option<&Path>,
    key_file: Option<&Path>,
    manifest: Option<&Path>,
    workers: Option<usize>,
) -> Result<()> {
    let input = input.unwrap_or(&config.assets.input_dir);
    let output = output.unwrap_or(&config.assets.output_dir);
    let key_file = key_file.unwrap_or(&config.key.file);
    let manifest_path = manifest.unwrap_or(&config.assets.manifest_path);
    let workers = workers.unwrap_or(config.pipeline.workers);

    // Key validation is the gate: nothing is processed if it fails
    let mut key = sealbox_crypto::load_key(key_file)?;

    // One erase point for every outcome past this line; zeroize-on-drop
    // still covers panics
    let result = seal_with_key(&key, config, input, output, manifest_path, workers);
    key.erase();
    result
}

fn seal_with_key(
    key: &AssetKey,
    config: &SealboxConfig,
    input: &Path,
    output: &Path,
    manifest_path: &Path,
    workers: usize,
) -> Result<()> {
    let assets = discover_assets(input, &config.pipeline.exclude_patterns)
        .with_context(|| format!("discovering inputs under {}", input.display()))?;
    info!(files = assets.len(), input = %input.display(), "sealing content tree");

    let pb = make_progress_bar(assets.len() as u64, "seal");
    let progress: ProgressFn = {
        let pb = pb.clone();
        Box::new(move |name: &str| {
            pb.set_message(name.to_string());
            pb.inc(1);
        })
    };

    let report = run_batch(
        key,
        &assets,
        output,
        &BatchOptions { workers },
        Some(&progress),
    )?;
    pb.finish_with_message(format!(
        "{} sealed, {} failed",
        report.succeeded(),
        report.failed()
    ));

    let succeeded = report.succeeded();
    let failed = report.failed();

    let mut builder = ManifestBuilder::new();
    builder.extend(report.records);
    builder
        .finish()
        .write_to(manifest_path)
        .with_context(|| format!("writing manifest {}", manifest_path.display()))?;

    if !report.failures.is_empty() {
        let failures_path = manifest_path.with_extension("failures.json");
        write_failure_list(&failures_path, &report.failures)?;
        warn!(
            count = failed,
            list = %failures_path.display(),
            "some assets failed and were excluded from the manifest"
        );
    }

    println!("sealed {succeeded} asset(s), {failed} failure(s)");
    println!("manifest: {}", manifest_path.display());
    Ok(())
}

// ── `sealbox keygen` ──────────────────────────────────────────────────────────

fn cmd_keygen(config: &SealboxConfig, output: Option<&Path>) -> Result<()> {
    let path = output.unwrap_or(&config.key.file);

    let mut key = sealbox_crypto::generate_key();
    let result = sealbox_crypto::write_key_file(path, &key);
    key.erase();
    result?;

    println!("wrote new 256-bit key: {}", path.display());
    println!("provision it to the decrypting application out-of-band; never publish it");
    Ok(())
}

// ── `sealbox config show` ─────────────────────────────────────────────────────

fn cmd_config_show(config: &SealboxConfig, config_path: &Path) -> Result<()> {
    if config_path.exists() {
        println!("# Configuration from: {}", config_path.display());
    } else {
        println!(
            "# Configuration: defaults (no file at {})",
            config_path.display()
        );
    }
    println!();
    let rendered = toml::to_string_pretty(config).context("serializing config to TOML")?;
    print!("{rendered}");
    Ok(())
}

// ── Progress bar helpers ──────────────────────────────────────────────────────

fn make_progress_bar(total: u64, prefix: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::with_template("{prefix:.bold} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );
    pb.set_prefix(prefix.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
