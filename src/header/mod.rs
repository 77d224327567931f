//! # Chromatogram Group Headers
//!
//! One header describes all transitions of one precursor within one sample
//! file: where its compressed point arrays live in the cache, how large they
//! are, which slice of the transition table belongs to it, and the structural
//! flags needed to interpret the arrays.
//!
//! Three byte layouts exist, selected by [`CacheFormatVersion`]:
//!
//! - **earliest** (revisions 1-4, 48 bytes): single precision precursor, no
//!   text id, no flags
//! - **legacy** (revisions 5-17, 56 or 72 bytes): text id, legacy flag table,
//!   uncompressed size and time range from revision 11 on
//! - **current** (revisions after 17, 72 bytes): signed precursor, current flag
//!   table
//!
//! ## Example
//!
//! ```rust
//! use chromcache::header::ChromGroupHeader;
//! use chromcache::version::CacheFormatVersion;
//!
//! let bytes = [0u8; 72];
//! let header = ChromGroupHeader::decode(CacheFormatVersion::CURRENT, &mut &bytes[..])?;
//! assert_eq!(header.num_transitions, 0);
//! # Ok::<(), chromcache::CacheError>(())
//! ```

mod decode;

#[cfg(test)]
mod tests;

use std::fmt;
use std::io::Read;
use std::ops::Range;

use serde::Serialize;

use crate::error::Result;
use crate::flags::StructuralFlags;
use crate::version::{header_struct_size, CacheFormatVersion};

/// On-disk value of a start or end time that was not recorded
pub const NO_TIME: f32 = -1.0;

/// On-disk value of an uncompressed size that was not recorded
pub const NO_UNCOMPRESSED_SIZE: i32 = -1;

/// On-disk value of a text id index that was not recorded
pub const NO_TEXT_ID: i32 = -1;

/// How the point arrays of a group are laid out once decompressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryFormat {
    /// Serialized raw chromatogram group data
    ChromatogramGroupData,
    /// Time array followed by one intensity array per transition, and so on
    ParallelArrays,
}

impl fmt::Display for BinaryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryFormat::ChromatogramGroupData => write!(f, "raw chromatogram group data"),
            BinaryFormat::ParallelArrays => write!(f, "parallel arrays"),
        }
    }
}

/// Header of one chromatogram group
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChromGroupHeader {
    /// Index into the shared text id table, or [`NO_TEXT_ID`]
    pub text_id_index: i32,
    /// Length of the text id (legacy layout only)
    pub text_id_len: u16,
    /// First transition of the group in the transition table
    pub start_transition_index: i32,
    /// Number of transitions in the group
    pub num_transitions: u16,
    /// Number of points per chromatogram
    pub num_points: i32,
    /// Size of the compressed point payload in bytes
    pub compressed_size: i32,
    /// Byte offset of the compressed payload within the cache file
    pub location_points: i64,
    /// Index of the sample file
    pub file_index: u16,
    /// Structural flags
    pub flags: StructuralFlags,
    precursor: f64,
    uncompressed_size: Option<i32>,
    start_time: Option<f32>,
    end_time: Option<f32>,
}

impl ChromGroupHeader {
    /// On-disk width of a header written by `version`.
    pub fn struct_size(version: CacheFormatVersion) -> usize {
        header_struct_size(version)
    }

    /// Decode one header, consuming exactly [`ChromGroupHeader::struct_size`] bytes.
    pub fn decode<R: Read>(version: CacheFormatVersion, reader: &mut R) -> Result<Self> {
        decode::decode(version, reader)
    }

    /// Signed precursor m/z, negative for negative polarity.
    pub fn precursor_mz(&self) -> f64 {
        if self.is_negative_polarity() {
            -self.precursor
        } else {
            self.precursor
        }
    }

    /// Stored precursor magnitude (never negative for current layouts).
    pub fn precursor_magnitude(&self) -> f64 {
        self.precursor
    }

    /// Whether the precursor was acquired in negative ion mode
    pub fn is_negative_polarity(&self) -> bool {
        self.flags.contains(StructuralFlags::POLARITY_NEGATIVE)
    }

    /// Uncompressed size as written to disk, if the revision stores it.
    pub fn stored_uncompressed_size(&self) -> Option<i32> {
        self.uncompressed_size
    }

    /// Size in bytes of the decompressed point payload.
    ///
    /// Revisions before 11 did not store it; it is then derived from the point
    /// and transition counts: one `f32` time array plus one `f32` intensity
    /// array per transition, an `i16` mass error array per transition when
    /// mass errors are present, and an `i32` scan id array per scan id kind.
    pub fn uncompressed_size(&self) -> i64 {
        if let Some(size) = self.uncompressed_size {
            return size as i64;
        }

        let points = self.num_points as i64;
        let transitions = self.num_transitions as i64;
        let mut size = 4 * points * (transitions + 1);
        if self.flags.contains(StructuralFlags::HAS_MASS_ERRORS) {
            size += 2 * points * transitions;
        }
        for scan_ids in [
            StructuralFlags::HAS_MS1_SCAN_IDS,
            StructuralFlags::HAS_FRAG_SCAN_IDS,
            StructuralFlags::HAS_SIM_SCAN_IDS,
        ] {
            if self.flags.contains(scan_ids) {
                size += 4 * points;
            }
        }
        size
    }

    /// Start of the extracted time range, if recorded.
    pub fn start_time(&self) -> Option<f32> {
        self.start_time
    }

    /// End of the extracted time range, if recorded.
    pub fn end_time(&self) -> Option<f32> {
        self.end_time
    }

    /// Extracted time range, if both ends were recorded.
    pub fn time_range(&self) -> Option<(f32, f32)> {
        Some((self.start_time?, self.end_time?))
    }

    /// Whether `time` lies outside the extracted range. Headers without a
    /// recorded range exclude nothing.
    pub fn excludes_time(&self, time: f32) -> bool {
        match self.time_range() {
            Some((start, end)) => time < start || time > end,
            None => false,
        }
    }

    /// Layout of the decompressed point payload.
    pub fn binary_format(&self) -> BinaryFormat {
        if self.flags.contains(StructuralFlags::RAW_CHROMATOGRAMS) {
            BinaryFormat::ChromatogramGroupData
        } else {
            BinaryFormat::ParallelArrays
        }
    }

    /// Whether the header references the text id table
    pub fn has_text_id(&self) -> bool {
        self.text_id_index != NO_TEXT_ID
    }

    /// Rows of the transition table belonging to this group.
    pub fn transition_range(&self) -> Range<i64> {
        let start = self.start_transition_index as i64;
        start..start + self.num_transitions as i64
    }
}
