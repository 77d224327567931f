//! Structural flags of a chromatogram group header.
//!
//! The same set of markers has been stored with two different bit layouts: one
//! for revisions up to and including 17 ("legacy") and one for revisions after
//! the format-18 break ("current"). [`StructuralFlags`] holds markers by
//! identity; the on-disk tables are only consulted when decoding or re-deriving
//! legacy bits, so a set decoded from either table compares equal to the same
//! set decoded from the other.
//!
//! | Marker | Legacy bit | Current bit |
//! |--------|-----------|-------------|
//! | `HAS_MASS_ERRORS` | `0x0001` | `0x0001` |
//! | `HAS_CALCULATED_MZS` | `0x0002` | `0x0002` |
//! | `EXTRACTED_BASE_PEAK` | `0x0004` | `0x0004` |
//! | `HAS_MS1_SCAN_IDS` | `0x0008` | `0x0008` |
//! | `HAS_SIM_SCAN_IDS` | `0x0010` | `0x0010` |
//! | `HAS_FRAG_SCAN_IDS` | `0x0020` | `0x0020` |
//! | `POLARITY_NEGATIVE` | `0x0040` | `0x0040` |
//! | `RAW_CHROMATOGRAMS` | `0x0080` | `0x0080` |
//! | `ION_MOBILITY_DRIFT_TIME` | `0x0100` | `0x0400` |
//! | `ION_MOBILITY_INVERSE_K0` | `0x0200` | `0x0800` |
//! | `ION_MOBILITY_COMPENSATION_VOLTAGE` | `0x0400` | `0x1000` |
//! | `EXTRACTED_QC_TRACE` | `0x0800` | `0x0200` |
//! | `DDA_ACQUISITION_METHOD` | none | `0x0100` |

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Set of structural markers describing how a chromatogram group was extracted.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct StructuralFlags: u16 {
        /// Point arrays include per-point mass errors
        const HAS_MASS_ERRORS = 1 << 0;
        /// Product m/z values were calculated rather than measured
        const HAS_CALCULATED_MZS = 1 << 1;
        /// Group is a base peak chromatogram
        const EXTRACTED_BASE_PEAK = 1 << 2;
        /// Point arrays include MS1 scan ids
        const HAS_MS1_SCAN_IDS = 1 << 3;
        /// Point arrays include SIM scan ids
        const HAS_SIM_SCAN_IDS = 1 << 4;
        /// Point arrays include fragment scan ids
        const HAS_FRAG_SCAN_IDS = 1 << 5;
        /// Precursor was acquired in negative ion mode
        const POLARITY_NEGATIVE = 1 << 6;
        /// Points are stored as raw chromatogram group data
        const RAW_CHROMATOGRAMS = 1 << 7;
        /// Ion mobility filter in drift time (msec)
        const ION_MOBILITY_DRIFT_TIME = 1 << 8;
        /// Ion mobility filter in inverse reduced mobility (Vs/cm^2)
        const ION_MOBILITY_INVERSE_K0 = 1 << 9;
        /// Ion mobility filter in compensation voltage (V)
        const ION_MOBILITY_COMPENSATION_VOLTAGE = 1 << 10;
        /// Data was acquired with a data-dependent method
        const DDA_ACQUISITION_METHOD = 1 << 11;
        /// Group is an instrument QC trace
        const EXTRACTED_QC_TRACE = 1 << 12;
    }
}

/// Bit positions used by revisions up to and including 17. Zero means the
/// marker cannot be represented in this table.
const LEGACY_BITS: [(StructuralFlags, u16); 13] = [
    (StructuralFlags::HAS_MASS_ERRORS, 0x0001),
    (StructuralFlags::HAS_CALCULATED_MZS, 0x0002),
    (StructuralFlags::EXTRACTED_BASE_PEAK, 0x0004),
    (StructuralFlags::HAS_MS1_SCAN_IDS, 0x0008),
    (StructuralFlags::HAS_SIM_SCAN_IDS, 0x0010),
    (StructuralFlags::HAS_FRAG_SCAN_IDS, 0x0020),
    (StructuralFlags::POLARITY_NEGATIVE, 0x0040),
    (StructuralFlags::RAW_CHROMATOGRAMS, 0x0080),
    (StructuralFlags::ION_MOBILITY_DRIFT_TIME, 0x0100),
    (StructuralFlags::ION_MOBILITY_INVERSE_K0, 0x0200),
    (StructuralFlags::ION_MOBILITY_COMPENSATION_VOLTAGE, 0x0400),
    (StructuralFlags::EXTRACTED_QC_TRACE, 0x0800),
    (StructuralFlags::DDA_ACQUISITION_METHOD, 0),
];

/// Bit positions used after the format-18 break.
const CURRENT_BITS: [(StructuralFlags, u16); 13] = [
    (StructuralFlags::HAS_MASS_ERRORS, 0x0001),
    (StructuralFlags::HAS_CALCULATED_MZS, 0x0002),
    (StructuralFlags::EXTRACTED_BASE_PEAK, 0x0004),
    (StructuralFlags::HAS_MS1_SCAN_IDS, 0x0008),
    (StructuralFlags::HAS_SIM_SCAN_IDS, 0x0010),
    (StructuralFlags::HAS_FRAG_SCAN_IDS, 0x0020),
    (StructuralFlags::POLARITY_NEGATIVE, 0x0040),
    (StructuralFlags::RAW_CHROMATOGRAMS, 0x0080),
    (StructuralFlags::DDA_ACQUISITION_METHOD, 0x0100),
    (StructuralFlags::EXTRACTED_QC_TRACE, 0x0200),
    (StructuralFlags::ION_MOBILITY_DRIFT_TIME, 0x0400),
    (StructuralFlags::ION_MOBILITY_INVERSE_K0, 0x0800),
    (StructuralFlags::ION_MOBILITY_COMPENSATION_VOLTAGE, 0x1000),
];

fn decode_with(table: &[(StructuralFlags, u16)], bits: u16) -> StructuralFlags {
    table
        .iter()
        .filter(|(_, mask)| *mask != 0 && bits & mask != 0)
        .fold(StructuralFlags::empty(), |acc, (flag, _)| acc | *flag)
}

/// Unit of the ion mobility filter applied when extracting a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IonMobilityType {
    /// Drift time in milliseconds
    DriftTime,
    /// Inverse reduced ion mobility
    InverseK0,
    /// Compensation voltage (FAIMS)
    CompensationVoltage,
}

impl StructuralFlags {
    /// Decode flag bits written by revisions up to and including 17.
    pub fn from_legacy_bits(bits: u16) -> Self {
        decode_with(&LEGACY_BITS, bits)
    }

    /// Decode flag bits written after the format-18 break.
    pub fn from_current_bits(bits: u16) -> Self {
        decode_with(&CURRENT_BITS, bits)
    }

    /// Re-derive the legacy bit encoding of this set. Markers without a legacy
    /// bit are dropped.
    pub fn to_legacy_bits(self) -> u16 {
        LEGACY_BITS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .fold(0, |acc, (_, mask)| acc | mask)
    }

    /// Ion mobility unit of the group, if an ion mobility filter was applied.
    pub fn ion_mobility_type(self) -> Option<IonMobilityType> {
        if self.contains(Self::ION_MOBILITY_DRIFT_TIME) {
            Some(IonMobilityType::DriftTime)
        } else if self.contains(Self::ION_MOBILITY_INVERSE_K0) {
            Some(IonMobilityType::InverseK0)
        } else if self.contains(Self::ION_MOBILITY_COMPENSATION_VOLTAGE) {
            Some(IonMobilityType::CompensationVoltage)
        } else {
            None
        }
    }
}
