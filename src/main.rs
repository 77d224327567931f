//! # chromcache-inspect
//!
//! A diagnostic tool for dumping records from a chromatogram cache file.
//! Record locations come from the caller (typically read off the cache index
//! with another tool).
//!
//! ## Usage
//!
//! ```bash
//! # Dump two revision-12 group headers starting at byte 0 as JSON lines
//! chromcache-inspect headers data.skyd --format-version 12 --offset 0 --count 2
//!
//! # Dump six peaks following them
//! chromcache-inspect peaks data.skyd --format-version 12 --offset 144 --count 6
//!
//! # Show record widths for a revision
//! chromcache-inspect sizes --format-version 16
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};

use chromcache::prelude::*;

/// chromcache - Chromatogram cache inspector
#[derive(Parser)]
#[command(name = "chromcache-inspect")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Load decode settings from a TOML config file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dump chromatogram group headers as JSON lines
    Headers {
        /// Cache file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Dump peak candidates as JSON lines
    Peaks {
        /// Cache file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Show on-disk record widths for a cache revision
    Sizes {
        /// Cache format revision
        #[arg(short = 'f', long)]
        format_version: u32,
    },
}

/// Location of a run of records
#[derive(clap::Args)]
struct RunArgs {
    /// Cache format revision
    #[arg(short = 'f', long)]
    format_version: u32,

    /// Byte offset of the first record
    #[arg(short, long, default_value = "0")]
    offset: u64,

    /// Number of records to decode
    #[arg(short, long, default_value = "1")]
    count: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match &cli.config {
        Some(path) => ChromCacheConfig::from_file(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => ChromCacheConfig::default(),
    };

    match cli.command {
        Commands::Headers { file, run } => run_headers(file, run, config.decode),
        Commands::Peaks { file, run } => run_peaks(file, run, config.decode),
        Commands::Sizes { format_version } => run_sizes(format_version),
    }
}

fn open_reader(file: &Path, config: DecodeConfig) -> Result<CacheReader<std::io::BufReader<std::fs::File>>> {
    if !file.exists() {
        anyhow::bail!("Cache file does not exist: {}", file.display());
    }
    let handle = std::fs::File::open(file).context("Failed to open cache file")?;
    Ok(CacheReader::with_config(std::io::BufReader::new(handle), config))
}

/// Dump group headers
fn run_headers(file: PathBuf, run: RunArgs, config: DecodeConfig) -> Result<()> {
    let version = CacheFormatVersion::try_from(run.format_version)?;
    info!("Reading {} group headers ({}) from {}", run.count, version, file.display());

    let mut reader = open_reader(&file, config)?;
    let headers = reader
        .read_headers(version, run.offset, run.count)
        .context("Failed to decode group headers")?;

    for header in &headers {
        let line = serde_json::json!({
            "precursor_mz": header.precursor_mz(),
            "uncompressed_size": header.uncompressed_size(),
            "binary_format": header.binary_format().to_string(),
            "start_time": header.start_time(),
            "end_time": header.end_time(),
            "record": header,
        });
        println!("{}", line);
    }

    print_summary("group headers", headers.len(), version);
    Ok(())
}

/// Dump peak candidates
fn run_peaks(file: PathBuf, run: RunArgs, config: DecodeConfig) -> Result<()> {
    let version = CacheFormatVersion::try_from(run.format_version)?;
    info!("Reading {} peaks ({}) from {}", run.count, version, file.display());

    let mut reader = open_reader(&file, config)?;
    let peaks = reader
        .read_peaks(version, run.offset, run.count)
        .context("Failed to decode peaks")?;

    for peak in &peaks {
        let line = serde_json::json!({
            "std_dev": peak.std_dev(),
            "skewness": peak.skewness(),
            "kurtosis": peak.kurtosis(),
            "shape_correlation": peak.shape_correlation(),
            "mass_error": peak.mass_error(),
            "record": peak,
        });
        println!("{}", line);
    }

    print_summary("peaks", peaks.len(), version);
    Ok(())
}

/// Show record widths
fn run_sizes(format_version: u32) -> Result<()> {
    let version = CacheFormatVersion::try_from(format_version)?;
    println!("Cache format {}", version);
    println!("  Group header: {} bytes", header_struct_size(version));
    println!("  Peak:         {} bytes", peak_struct_size(version));
    Ok(())
}

fn print_summary(what: &str, count: usize, version: CacheFormatVersion) {
    #[cfg(feature = "colorized_output")]
    {
        use console::style;
        eprintln!(
            "{} {} {} ({})",
            style("Decoded").green().bold(),
            style(count).cyan(),
            what,
            version
        );
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        eprintln!("Decoded {} {} ({})", count, what, version);
    }
}
