use super::*;
use crate::error::CacheError;
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Cursor;

/// Fields written by the layout builders below
#[derive(Clone, Copy)]
struct RawHeader {
    precursor: f64,
    location_points: i64,
    uncompressed_size: i32,
    start_transition_index: i32,
    text_id_index: i32,
    text_id_len: u16,
    num_points: i32,
    compressed_size: i32,
    start_time: f32,
    end_time: f32,
    num_transitions: u16,
    flag_bits: u16,
    file_index: u16,
}

impl Default for RawHeader {
    fn default() -> Self {
        Self {
            precursor: 445.12,
            location_points: 1_048_576,
            uncompressed_size: 4096,
            start_transition_index: 30,
            text_id_index: 7,
            text_id_len: 12,
            num_points: 100,
            compressed_size: 1500,
            start_time: 5.0,
            end_time: 10.0,
            num_transitions: 3,
            flag_bits: 0,
            file_index: 2,
        }
    }
}

fn current_bytes(raw: &RawHeader) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.write_f64::<LittleEndian>(raw.precursor).unwrap();
    buf.write_i64::<LittleEndian>(raw.location_points).unwrap();
    buf.write_i32::<LittleEndian>(raw.uncompressed_size).unwrap();
    buf.write_i32::<LittleEndian>(raw.start_transition_index).unwrap();
    buf.write_i32::<LittleEndian>(raw.text_id_index).unwrap();
    buf.write_i32::<LittleEndian>(99).unwrap();
    buf.write_i32::<LittleEndian>(98).unwrap();
    buf.write_i32::<LittleEndian>(raw.num_points).unwrap();
    buf.write_i32::<LittleEndian>(raw.compressed_size).unwrap();
    buf.write_f32::<LittleEndian>(raw.start_time).unwrap();
    buf.write_f32::<LittleEndian>(raw.end_time).unwrap();
    buf.write_f32::<LittleEndian>(123.4).unwrap();
    buf.write_u16::<LittleEndian>(raw.num_transitions).unwrap();
    buf.write_u16::<LittleEndian>(raw.flag_bits).unwrap();
    buf.write_u16::<LittleEndian>(raw.file_index).unwrap();
    buf.extend_from_slice(&[4, 1, 1]);
    buf.extend_from_slice(&[0xAA; 7]);
    buf
}

fn legacy_bytes(version: CacheFormatVersion, raw: &RawHeader) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.write_i32::<LittleEndian>(raw.text_id_index).unwrap();
    buf.write_i32::<LittleEndian>(raw.start_transition_index).unwrap();
    buf.write_i32::<LittleEndian>(99).unwrap();
    buf.write_i32::<LittleEndian>(98).unwrap();
    buf.write_i32::<LittleEndian>(raw.num_points).unwrap();
    buf.write_i32::<LittleEndian>(raw.compressed_size).unwrap();
    buf.write_u16::<LittleEndian>(raw.flag_bits).unwrap();
    buf.write_u16::<LittleEndian>(raw.file_index).unwrap();
    buf.write_u16::<LittleEndian>(raw.text_id_len).unwrap();
    buf.write_u16::<LittleEndian>(raw.num_transitions).unwrap();
    buf.extend_from_slice(&[4, 1, 1, 0]);
    buf.write_u16::<LittleEndian>(0xBEEF).unwrap();
    buf.write_u16::<LittleEndian>(0xCAFE).unwrap();
    buf.write_f64::<LittleEndian>(raw.precursor).unwrap();
    buf.write_i64::<LittleEndian>(raw.location_points).unwrap();
    if version >= CacheFormatVersion::ELEVEN {
        buf.write_i32::<LittleEndian>(raw.uncompressed_size).unwrap();
        buf.write_f32::<LittleEndian>(raw.start_time).unwrap();
        buf.write_f32::<LittleEndian>(raw.end_time).unwrap();
        buf.write_f32::<LittleEndian>(0.0).unwrap();
    }
    buf
}

fn earliest_bytes(raw: &RawHeader, file_index: i32, num_transitions: i32, num_peaks: i32) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.write_f32::<LittleEndian>(raw.precursor as f32).unwrap();
    buf.write_i32::<LittleEndian>(file_index).unwrap();
    buf.write_i32::<LittleEndian>(num_transitions).unwrap();
    buf.write_i32::<LittleEndian>(raw.start_transition_index).unwrap();
    buf.write_i32::<LittleEndian>(num_peaks).unwrap();
    buf.write_i32::<LittleEndian>(77).unwrap();
    buf.write_i32::<LittleEndian>(-1).unwrap();
    buf.write_i32::<LittleEndian>(raw.num_points).unwrap();
    buf.write_i32::<LittleEndian>(raw.compressed_size).unwrap();
    buf.write_i32::<LittleEndian>(0).unwrap();
    buf.write_i64::<LittleEndian>(raw.location_points).unwrap();
    buf
}

fn decode_exact(version: CacheFormatVersion, bytes: &[u8]) -> ChromGroupHeader {
    assert_eq!(bytes.len(), ChromGroupHeader::struct_size(version));
    let mut cursor = Cursor::new(bytes);
    let header = ChromGroupHeader::decode(version, &mut cursor).unwrap();
    assert_eq!(cursor.position() as usize, bytes.len());
    header
}

fn assert_truncated(version: CacheFormatVersion, bytes: &[u8]) {
    let short = &bytes[..bytes.len() - 1];
    let err = ChromGroupHeader::decode(version, &mut Cursor::new(short)).unwrap_err();
    assert!(err.is_truncation(), "expected truncation, got {:?}", err);
}

#[test]
fn test_current_layout() {
    let raw = RawHeader {
        flag_bits: 0x0001 | 0x0100,
        ..Default::default()
    };
    let bytes = current_bytes(&raw);
    let header = decode_exact(CacheFormatVersion::CURRENT, &bytes);

    assert_eq!(header.precursor_mz(), 445.12);
    assert_eq!(header.location_points, 1_048_576);
    assert_eq!(header.stored_uncompressed_size(), Some(4096));
    assert_eq!(header.uncompressed_size(), 4096);
    assert_eq!(header.start_transition_index, 30);
    assert_eq!(header.text_id_index, 7);
    assert_eq!(header.text_id_len, 0);
    assert_eq!(header.num_points, 100);
    assert_eq!(header.compressed_size, 1500);
    assert_eq!(header.time_range(), Some((5.0, 10.0)));
    assert_eq!(header.num_transitions, 3);
    assert_eq!(header.file_index, 2);
    assert_eq!(
        header.flags,
        StructuralFlags::HAS_MASS_ERRORS | StructuralFlags::DDA_ACQUISITION_METHOD
    );
    assert!(!header.is_negative_polarity());
    assert_eq!(header.transition_range(), 30..33);

    assert_truncated(CacheFormatVersion::CURRENT, &bytes);
}

#[test]
fn test_current_negative_precursor() {
    let raw = RawHeader {
        precursor: -120.5,
        ..Default::default()
    };
    let header = decode_exact(CacheFormatVersion::EIGHTEEN, &current_bytes(&raw));

    assert_eq!(header.precursor_mz(), -120.5);
    assert!(header.is_negative_polarity());
    assert!(header.flags.contains(StructuralFlags::POLARITY_NEGATIVE));
    assert_eq!(header.precursor_magnitude(), 120.5);
}

#[test]
fn test_current_negative_flag_with_positive_precursor() {
    let raw = RawHeader {
        precursor: 300.25,
        flag_bits: 0x0040,
        ..Default::default()
    };
    let header = decode_exact(CacheFormatVersion::EIGHTEEN, &current_bytes(&raw));
    assert_eq!(header.precursor_mz(), -300.25);
    assert_eq!(header.precursor_magnitude(), 300.25);
}

#[test]
fn test_current_sentinel_times() {
    let raw = RawHeader {
        start_time: NO_TIME,
        end_time: NO_TIME,
        uncompressed_size: NO_UNCOMPRESSED_SIZE,
        ..Default::default()
    };
    let header = decode_exact(CacheFormatVersion::CURRENT, &current_bytes(&raw));
    assert_eq!(header.start_time(), None);
    assert_eq!(header.end_time(), None);
    assert_eq!(header.stored_uncompressed_size(), None);
    assert!(!header.excludes_time(1000.0));
}

#[test]
fn test_legacy_layout_before_eleven() {
    let version = CacheFormatVersion::TEN;
    let raw = RawHeader {
        flag_bits: 0x0100 | 0x0080,
        ..Default::default()
    };
    let bytes = legacy_bytes(version, &raw);
    assert_eq!(bytes.len(), 56);
    let header = decode_exact(version, &bytes);

    assert_eq!(header.text_id_index, 7);
    assert_eq!(header.text_id_len, 12);
    assert!(header.has_text_id());
    assert_eq!(header.start_transition_index, 30);
    assert_eq!(header.num_points, 100);
    assert_eq!(header.compressed_size, 1500);
    assert_eq!(header.file_index, 2);
    assert_eq!(header.num_transitions, 3);
    assert_eq!(header.precursor_mz(), 445.12);
    assert_eq!(header.location_points, 1_048_576);
    assert_eq!(
        header.flags,
        StructuralFlags::ION_MOBILITY_DRIFT_TIME | StructuralFlags::RAW_CHROMATOGRAMS
    );
    assert_eq!(header.stored_uncompressed_size(), None);
    assert_eq!(header.start_time(), None);
    assert_eq!(header.end_time(), None);
    assert_eq!(header.binary_format(), BinaryFormat::ChromatogramGroupData);

    assert_truncated(version, &bytes);
}

#[test]
fn test_legacy_layout_from_eleven() {
    for version in [CacheFormatVersion::ELEVEN, CacheFormatVersion::SEVENTEEN] {
        let raw = RawHeader {
            flag_bits: 0x0040,
            ..Default::default()
        };
        let bytes = legacy_bytes(version, &raw);
        assert_eq!(bytes.len(), 72);
        let header = decode_exact(version, &bytes);

        assert_eq!(header.stored_uncompressed_size(), Some(4096));
        assert_eq!(header.time_range(), Some((5.0, 10.0)));
        // Legacy layouts store the magnitude and carry polarity in the flags
        assert_eq!(header.precursor_mz(), -445.12);

        assert_truncated(version, &bytes);
    }
}

#[test]
fn test_earliest_layout() {
    let version = CacheFormatVersion::FOUR;
    let raw = RawHeader {
        precursor: 512.5,
        ..Default::default()
    };
    let bytes = earliest_bytes(&raw, 3, 6, 2);
    let header = decode_exact(version, &bytes);

    assert_eq!(header.precursor_mz(), 512.5);
    assert_eq!(header.file_index, 3);
    assert_eq!(header.num_transitions, 6);
    assert_eq!(header.start_transition_index, 30);
    assert_eq!(header.num_points, 100);
    assert_eq!(header.compressed_size, 1500);
    assert_eq!(header.location_points, 1_048_576);
    assert!(header.flags.is_empty());
    assert!(!header.has_text_id());
    assert_eq!(header.time_range(), None);
    assert_eq!(header.stored_uncompressed_size(), None);
    assert_eq!(header.uncompressed_size(), 4 * 100 * 7);

    assert_truncated(version, &bytes);
}

#[test]
fn test_earliest_narrowing_overflow() {
    let raw = RawHeader::default();

    let err = ChromGroupHeader::decode(
        CacheFormatVersion::ONE,
        &mut Cursor::new(earliest_bytes(&raw, 70_000, 6, 2)),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        CacheError::NarrowingOverflow { field: "file_index", value: 70_000, .. }
    ));

    let err = ChromGroupHeader::decode(
        CacheFormatVersion::TWO,
        &mut Cursor::new(earliest_bytes(&raw, 1, -3, 2)),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        CacheError::NarrowingOverflow { field: "num_transitions", .. }
    ));

    let err = ChromGroupHeader::decode(
        CacheFormatVersion::THREE,
        &mut Cursor::new(earliest_bytes(&raw, 1, 6, 300)),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        CacheError::NarrowingOverflow { field: "num_peaks", target: "u8", .. }
    ));
}

#[test]
fn test_uncompressed_size_formula() {
    let version = CacheFormatVersion::TEN;
    let mut raw = RawHeader {
        num_points: 10,
        num_transitions: 3,
        ..Default::default()
    };

    let header = decode_exact(version, &legacy_bytes(version, &raw));
    assert_eq!(header.uncompressed_size(), 160);

    raw.flag_bits = StructuralFlags::HAS_MASS_ERRORS.to_legacy_bits();
    let header = decode_exact(version, &legacy_bytes(version, &raw));
    assert_eq!(header.uncompressed_size(), 220);

    raw.flag_bits =
        (StructuralFlags::HAS_MASS_ERRORS | StructuralFlags::HAS_MS1_SCAN_IDS).to_legacy_bits();
    let header = decode_exact(version, &legacy_bytes(version, &raw));
    assert_eq!(header.uncompressed_size(), 260);

    raw.flag_bits = (StructuralFlags::HAS_MASS_ERRORS
        | StructuralFlags::HAS_MS1_SCAN_IDS
        | StructuralFlags::HAS_FRAG_SCAN_IDS
        | StructuralFlags::HAS_SIM_SCAN_IDS)
        .to_legacy_bits();
    let header = decode_exact(version, &legacy_bytes(version, &raw));
    assert_eq!(header.uncompressed_size(), 340);
}

#[test]
fn test_excludes_time() {
    let raw = RawHeader::default();
    let header = decode_exact(CacheFormatVersion::CURRENT, &current_bytes(&raw));
    assert!(header.excludes_time(4.9));
    assert!(!header.excludes_time(5.0));
    assert!(!header.excludes_time(7.5));
    assert!(!header.excludes_time(10.0));
    assert!(header.excludes_time(10.1));

    let version = CacheFormatVersion::FIVE;
    let header = decode_exact(version, &legacy_bytes(version, &raw));
    assert!(!header.excludes_time(4.9));
    assert!(!header.excludes_time(10.1));
}

#[test]
fn test_binary_format() {
    let raw = RawHeader::default();
    let header = decode_exact(CacheFormatVersion::CURRENT, &current_bytes(&raw));
    assert_eq!(header.binary_format(), BinaryFormat::ParallelArrays);
    assert_eq!(header.binary_format().to_string(), "parallel arrays");

    let raw = RawHeader {
        flag_bits: 0x0080,
        ..Default::default()
    };
    let header = decode_exact(CacheFormatVersion::CURRENT, &current_bytes(&raw));
    assert_eq!(
        header.binary_format().to_string(),
        "raw chromatogram group data"
    );
}

#[test]
fn test_consecutive_headers_stay_aligned() {
    let version = CacheFormatVersion::TWELVE;
    let first = RawHeader {
        num_points: 11,
        ..Default::default()
    };
    let second = RawHeader {
        num_points: 22,
        start_transition_index: 33,
        ..Default::default()
    };
    let mut bytes = legacy_bytes(version, &first);
    bytes.extend(legacy_bytes(version, &second));

    let mut cursor = Cursor::new(&bytes);
    let a = ChromGroupHeader::decode(version, &mut cursor).unwrap();
    let b = ChromGroupHeader::decode(version, &mut cursor).unwrap();
    assert_eq!(a.num_points, 11);
    assert_eq!(b.num_points, 22);
    assert_eq!(b.start_transition_index, 33);
    assert_eq!(cursor.position(), 144);
}
