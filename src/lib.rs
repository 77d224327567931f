//! # chromcache - Chromatogram Cache Decoding
//!
//! `chromcache` decodes the binary chromatogram cache written alongside
//! targeted mass spectrometry documents. The cache has evolved through
//! eighteen on-disk revisions, each changing field order, field width or the
//! meaning of flag bits; this crate reads every revision into one set of typed,
//! immutable records.
//!
//! ## Key Features
//!
//! - **Version dispatch**: group headers are decoded with the earliest, legacy
//!   text-id or current layout depending on [`CacheFormatVersion`].
//!
//! - **Exact cursor alignment**: every field, including discarded ones and
//!   alignment padding, is consumed so that consecutive records never drift.
//!
//! - **Dual flag tables**: [`StructuralFlags`] are decoded from either the
//!   legacy or the current bit table and compare equal regardless of origin.
//!
//! - **Width adaptation**: narrow peak records from older revisions are widened
//!   to the newest shape by the [`StructArrayReader`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chromcache::prelude::*;
//!
//! let mut reader = CacheReader::open("data.skyd")?;
//! let version = CacheFormatVersion::TWELVE;
//!
//! let headers = reader.read_headers(version, 0, 2)?;
//! let total: usize = headers.iter().map(|h| h.num_transitions as usize).sum();
//! let peaks = reader.read_peaks(version, 144, total)?;
//!
//! for peak in &peaks {
//!     println!("rt {} area {} shape {:?}", peak.retention_time, peak.area, peak.std_dev());
//! }
//! # Ok::<(), chromcache::CacheError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`version`]: revision tags and record widths
//! - [`flags`]: structural flag set with legacy and current bit tables
//! - [`header`]: chromatogram group header decoder
//! - [`peak`]: peak candidate decoder
//! - [`struct_array`]: fixed-width record runs with on-disk/in-memory resizing
//! - [`cache`]: seek-and-decode access driven by an external index
//! - [`config`]: decode settings loaded from TOML
//!
//! Locating records (the cache index) and inflating point arrays are left to
//! callers; headers expose [`ChromGroupHeader::binary_format`],
//! `compressed_size`, [`ChromGroupHeader::uncompressed_size`] and
//! `location_points` for that purpose.

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod cache;
pub mod config;
pub mod error;
pub mod flags;
pub mod header;
pub mod peak;
pub mod struct_array;
pub mod version;

mod utils;

pub use error::{CacheError, Result};
pub use flags::StructuralFlags;
pub use header::ChromGroupHeader;
pub use struct_array::StructArrayReader;
pub use version::CacheFormatVersion;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::cache::CacheReader;
    pub use crate::config::{ChromCacheConfig, DecodeConfig};
    pub use crate::error::{CacheError, Result};
    pub use crate::flags::{IonMobilityType, StructuralFlags};
    pub use crate::header::{BinaryFormat, ChromGroupHeader};
    pub use crate::peak::{ChromPeak, PeakFlags};
    pub use crate::struct_array::{FixedRecord, PadAlignment, StructArrayReader};
    pub use crate::version::{header_struct_size, peak_struct_size, CacheFormatVersion};
}
