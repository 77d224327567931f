//! Peak candidate records.
//!
//! One record per transition per chromatogram group, describing a proposed
//! integration window and its statistics. The on-disk struct grew twice:
//!
//! ```text
//! offset  size  field
//!      0    28  retention, start, end time, area, background, height, fwhm (f32)
//!     28     4  flag word                       <- 32 byte records end here
//!     32     2  points across peak
//!     34     2  alignment                       <- 36 byte records end here
//!     36    16  std dev, skewness, kurtosis, shape correlation (f32)
//! ```
//!
//! [`ChromPeak::decode`] always reads the 52 byte shape; narrower revisions are
//! zero-extended by [`StructArrayReader`](crate::struct_array::StructArrayReader).

use std::io::Read;

use bitflags::bitflags;
use byteorder::{LittleEndian, ReadBytesExt};
use serde::Serialize;

use crate::error::Result;
use crate::struct_array::FixedRecord;
use crate::utils::skip;
use crate::version::{peak_struct_size, CacheFormatVersion};

bitflags! {
    /// Low 16 bits of the peak flag word. The high 16 bits hold the mass error.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub struct PeakFlags: u32 {
        /// Full width at half max could not be measured
        const DEGENERATE_FWHM = 0x0001;
        /// Integration boundaries were forced by the user or a sibling transition
        const FORCED_INTEGRATION = 0x0002;
        /// Times are normalized
        const TIME_NORMALIZED = 0x0004;
        /// Truncation state was determined
        const PEAK_TRUNCATION_KNOWN = 0x0008;
        /// Peak is cut off at the start of the chromatogram
        const PEAK_TRUNCATED_START = 0x0010;
        /// Peak is cut off at the end of the chromatogram
        const PEAK_TRUNCATED_END = 0x0020;
        /// Window contains a peptide identification
        const CONTAINS_ID = 0x0040;
        /// Shape statistics are present
        const HAS_SHAPE_STATS = 0x0080;
        /// High 16 bits carry the mass error
        const MASS_ERROR_KNOWN = 0x0100;
    }
}

/// One integrated peak candidate for one transition
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChromPeak {
    /// Apex retention time
    pub retention_time: f32,
    /// Integration start time
    pub start_time: f32,
    /// Integration end time
    pub end_time: f32,
    /// Background-subtracted area
    pub area: f32,
    /// Background area
    pub background_area: f32,
    /// Apex height
    pub height: f32,
    /// Full width at half max
    pub fwhm: f32,
    /// Raw 32-bit flag word
    pub flag_bits: u32,
    /// Number of points across the peak (0 before revision 12)
    pub points_across: u16,
    std_dev: f32,
    skewness: f32,
    kurtosis: f32,
    shape_correlation: f32,
}

impl ChromPeak {
    /// In-memory width decoded by [`ChromPeak::decode`]
    pub const MEMORY_SIZE: usize = 52;

    /// On-disk width of a peak written by `version`.
    pub fn struct_size(version: CacheFormatVersion) -> usize {
        peak_struct_size(version)
    }

    /// Decode one peak from the current 52 byte shape.
    pub fn decode<R: Read>(reader: &mut R) -> Result<Self> {
        let retention_time = reader.read_f32::<LittleEndian>()?;
        let start_time = reader.read_f32::<LittleEndian>()?;
        let end_time = reader.read_f32::<LittleEndian>()?;
        let area = reader.read_f32::<LittleEndian>()?;
        let background_area = reader.read_f32::<LittleEndian>()?;
        let height = reader.read_f32::<LittleEndian>()?;
        let fwhm = reader.read_f32::<LittleEndian>()?;
        let flag_bits = reader.read_u32::<LittleEndian>()?;
        let points_across = reader.read_u16::<LittleEndian>()?;
        skip(reader, 2)?; // alignment
        let std_dev = reader.read_f32::<LittleEndian>()?;
        let skewness = reader.read_f32::<LittleEndian>()?;
        let kurtosis = reader.read_f32::<LittleEndian>()?;
        let shape_correlation = reader.read_f32::<LittleEndian>()?;

        Ok(Self {
            retention_time,
            start_time,
            end_time,
            area,
            background_area,
            height,
            fwhm,
            flag_bits,
            points_across,
            std_dev,
            skewness,
            kurtosis,
            shape_correlation,
        })
    }

    /// Named flags from the low half of the flag word.
    pub fn flags(&self) -> PeakFlags {
        PeakFlags::from_bits_truncate(self.flag_bits & 0xFFFF)
    }

    /// Whether the shape statistics were computed for this peak.
    pub fn has_shape_stats(&self) -> bool {
        self.flags().contains(PeakFlags::HAS_SHAPE_STATS)
    }

    fn shape_stat(&self, value: f32) -> Option<f32> {
        self.has_shape_stats().then_some(value)
    }

    /// Standard deviation of the fitted peak shape
    pub fn std_dev(&self) -> Option<f32> {
        self.shape_stat(self.std_dev)
    }

    /// Skewness of the fitted peak shape
    pub fn skewness(&self) -> Option<f32> {
        self.shape_stat(self.skewness)
    }

    /// Kurtosis of the fitted peak shape
    pub fn kurtosis(&self) -> Option<f32> {
        self.shape_stat(self.kurtosis)
    }

    /// Correlation of the peak against the fitted shape
    pub fn shape_correlation(&self) -> Option<f32> {
        self.shape_stat(self.shape_correlation)
    }

    /// Mass error in ppm, stored in tenths of ppm in the high half of the flag word.
    pub fn mass_error(&self) -> Option<f32> {
        if !self.flags().contains(PeakFlags::MASS_ERROR_KNOWN) {
            return None;
        }
        let tenths = (self.flag_bits >> 16) as u16 as i16;
        Some(tenths as f32 / 10.0)
    }

    /// Whether the peak runs off either end of the chromatogram, if known.
    pub fn is_truncated(&self) -> Option<bool> {
        let flags = self.flags();
        if !flags.contains(PeakFlags::PEAK_TRUNCATION_KNOWN) {
            return None;
        }
        Some(flags.intersects(PeakFlags::PEAK_TRUNCATED_START | PeakFlags::PEAK_TRUNCATED_END))
    }
}

impl FixedRecord for ChromPeak {
    const MEMORY_SIZE: usize = ChromPeak::MEMORY_SIZE;

    fn decode_block(block: &[u8]) -> Result<Self> {
        let mut reader = block;
        Self::decode(&mut reader)
    }
}
