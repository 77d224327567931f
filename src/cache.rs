//! # Offset-driven record access
//!
//! The cache index (not part of this crate) locates runs of records by
//! `(version, byte offset, count)`. [`CacheReader`] seeks to each run and
//! decodes it with the version-appropriate record width.
//!
//! ## Example
//!
//! ```rust,no_run
//! use chromcache::cache::CacheReader;
//! use chromcache::version::CacheFormatVersion;
//!
//! let mut reader = CacheReader::open("data.skyd")?;
//! let headers = reader.read_headers(CacheFormatVersion::CURRENT, 4096, 12)?;
//! for header in &headers {
//!     println!("{} transitions, {} points", header.num_transitions, header.num_points);
//! }
//! # Ok::<(), chromcache::CacheError>(())
//! ```

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use log::{debug, info};

use crate::config::DecodeConfig;
use crate::error::Result;
use crate::header::ChromGroupHeader;
use crate::peak::ChromPeak;
use crate::struct_array::StructArrayReader;
use crate::version::{header_struct_size, peak_struct_size, CacheFormatVersion};

/// Decodes runs of records from a seekable cache file.
///
/// The underlying cursor is exclusively borrowed by each call; decode
/// independent runs concurrently with one reader per thread.
pub struct CacheReader<R> {
    inner: R,
    config: DecodeConfig,
}

impl CacheReader<BufReader<File>> {
    /// Open a cache file with the default configuration.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening chromatogram cache: {}", path.display());
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read + Seek> CacheReader<R> {
    /// Wrap a byte source with the default configuration.
    pub fn new(inner: R) -> Self {
        Self::with_config(inner, DecodeConfig::default())
    }

    /// Wrap a byte source with `config`.
    pub fn with_config(inner: R, config: DecodeConfig) -> Self {
        Self { inner, config }
    }

    /// Active configuration
    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Return the underlying byte source.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Decode `count` consecutive group headers starting at `offset`.
    pub fn read_headers(
        &mut self,
        version: CacheFormatVersion,
        offset: u64,
        count: usize,
    ) -> Result<Vec<ChromGroupHeader>> {
        self.config.check_count(count)?;
        let width = header_struct_size(version);
        debug!(
            "Decoding {} {} group headers at offset {} ({} bytes each)",
            count, version, offset, width
        );

        self.inner.seek(SeekFrom::Start(offset))?;
        StructArrayReader::new(width, width)?.read_array(&mut self.inner, count, |block| {
            let mut block = block;
            ChromGroupHeader::decode(version, &mut block)
        })
    }

    /// Decode the single group header at `offset`.
    pub fn read_header_at(&mut self, version: CacheFormatVersion, offset: u64) -> Result<ChromGroupHeader> {
        self.inner.seek(SeekFrom::Start(offset))?;
        ChromGroupHeader::decode(version, &mut self.inner)
    }

    /// Decode `count` consecutive peak candidates starting at `offset`.
    pub fn read_peaks(
        &mut self,
        version: CacheFormatVersion,
        offset: u64,
        count: usize,
    ) -> Result<Vec<ChromPeak>> {
        self.config.check_count(count)?;
        let reader = StructArrayReader::for_record::<ChromPeak>(peak_struct_size(version))?
            .with_alignment(self.config.alignment);
        debug!(
            "Decoding {} {} peaks at offset {} ({} bytes each)",
            count,
            version,
            offset,
            reader.disk_size()
        );

        self.inner.seek(SeekFrom::Start(offset))?;
        reader.read_records(&mut self.inner, count)
    }
}
