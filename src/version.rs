//! Cache format revisions and the record widths they imply.
//!
//! The chromatogram cache has gone through eighteen on-disk revisions. Each
//! decoder branches on a small number of named thresholds:
//!
//! | Threshold | Effect |
//! |-----------|--------|
//! | `FOUR`    | last revision with the earliest (48 byte) group header |
//! | `FIVE`    | first revision with text-id group headers |
//! | `ELEVEN`  | group headers store uncompressed size and start/end time (72 bytes) |
//! | `TWELVE`  | peaks gain the points-across count (36 bytes) |
//! | `SIXTEEN` | peaks gain shape statistics (52 bytes) |
//! | `SEVENTEEN` | last revision before the current header layout and flag table |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// Ordered revision tag of a chromatogram cache file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheFormatVersion(u32);

impl CacheFormatVersion {
    /// Revision 1
    pub const ONE: Self = Self(1);
    /// Revision 2
    pub const TWO: Self = Self(2);
    /// Revision 3
    pub const THREE: Self = Self(3);
    /// Revision 4, last revision with the earliest header layout
    pub const FOUR: Self = Self(4);
    /// Revision 5, first revision with text-id headers
    pub const FIVE: Self = Self(5);
    /// Revision 6
    pub const SIX: Self = Self(6);
    /// Revision 7
    pub const SEVEN: Self = Self(7);
    /// Revision 8
    pub const EIGHT: Self = Self(8);
    /// Revision 9
    pub const NINE: Self = Self(9);
    /// Revision 10
    pub const TEN: Self = Self(10);
    /// Revision 11, headers store uncompressed size and time range
    pub const ELEVEN: Self = Self(11);
    /// Revision 12, peaks store points across the peak
    pub const TWELVE: Self = Self(12);
    /// Revision 13
    pub const THIRTEEN: Self = Self(13);
    /// Revision 14
    pub const FOURTEEN: Self = Self(14);
    /// Revision 15
    pub const FIFTEEN: Self = Self(15);
    /// Revision 16, peaks store shape statistics
    pub const SIXTEEN: Self = Self(16);
    /// Revision 17, last revision with the legacy header layout
    pub const SEVENTEEN: Self = Self(17);
    /// Revision 18, current header layout and flag table
    pub const EIGHTEEN: Self = Self(18);

    /// Newest revision this crate understands
    pub const CURRENT: Self = Self::EIGHTEEN;

    /// Wrap a raw revision number without range checking.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw revision number.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Header records use the current (post format-18 break) layout.
    pub fn is_current_layout(self) -> bool {
        self > Self::SEVENTEEN
    }

    /// Header records use the earliest layout without text ids or flags.
    pub fn is_earliest_layout(self) -> bool {
        self < Self::FIVE
    }

    /// Headers written with this revision carry uncompressed size and time range.
    pub fn stores_uncompressed_size(self) -> bool {
        self >= Self::ELEVEN
    }
}

impl fmt::Display for CacheFormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl TryFrom<u32> for CacheFormatVersion {
    type Error = CacheError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        let version = Self(raw);
        if version < Self::ONE || version > Self::CURRENT {
            return Err(CacheError::UnsupportedVersion(raw));
        }
        Ok(version)
    }
}

/// On-disk width in bytes of one chromatogram group header.
pub fn header_struct_size(version: CacheFormatVersion) -> usize {
    if version <= CacheFormatVersion::FOUR {
        48
    } else if version < CacheFormatVersion::ELEVEN {
        56
    } else {
        72
    }
}

/// On-disk width in bytes of one peak candidate.
pub fn peak_struct_size(version: CacheFormatVersion) -> usize {
    if version < CacheFormatVersion::TWELVE {
        32
    } else if version < CacheFormatVersion::SIXTEEN {
        36
    } else {
        52
    }
}
