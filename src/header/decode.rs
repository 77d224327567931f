//! Byte layouts of the three header eras.

use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};
use log::trace;

use super::{ChromGroupHeader, NO_TEXT_ID, NO_TIME, NO_UNCOMPRESSED_SIZE};
use crate::error::Result;
use crate::flags::StructuralFlags;
use crate::utils::{narrow_u16, narrow_u8, skip};
use crate::version::CacheFormatVersion;

/// Alignment bytes after the 65 field bytes of the current layout.
const CURRENT_TRAILING_PADDING: usize = 7;

pub(super) fn decode<R: Read>(version: CacheFormatVersion, reader: &mut R) -> Result<ChromGroupHeader> {
    if version.is_current_layout() {
        trace!("Decoding {} group header with current layout", version);
        decode_current(reader)
    } else if version.is_earliest_layout() {
        trace!("Decoding {} group header with earliest layout", version);
        decode_earliest(version, reader)
    } else {
        trace!("Decoding {} group header with text id layout", version);
        decode_legacy(version, reader)
    }
}

fn time_or_none(raw: f32) -> Option<f32> {
    (raw != NO_TIME).then_some(raw)
}

fn size_or_none(raw: i32) -> Option<i32> {
    (raw != NO_UNCOMPRESSED_SIZE).then_some(raw)
}

/// Trailing fields shared by the earliest and legacy layouts.
struct TimeTail {
    uncompressed_size: Option<i32>,
    start_time: Option<f32>,
    end_time: Option<f32>,
}

fn read_time_tail<R: Read>(version: CacheFormatVersion, reader: &mut R) -> Result<TimeTail> {
    if !version.stores_uncompressed_size() {
        return Ok(TimeTail {
            uncompressed_size: None,
            start_time: None,
            end_time: None,
        });
    }

    let uncompressed_size = size_or_none(reader.read_i32::<LittleEndian>()?);
    let start_time = time_or_none(reader.read_f32::<LittleEndian>()?);
    let end_time = time_or_none(reader.read_f32::<LittleEndian>()?);
    let _collisional_cross_section = reader.read_f32::<LittleEndian>()?;

    Ok(TimeTail {
        uncompressed_size,
        start_time,
        end_time,
    })
}

fn decode_current<R: Read>(reader: &mut R) -> Result<ChromGroupHeader> {
    let mut precursor = reader.read_f64::<LittleEndian>()?;
    let location_points = reader.read_i64::<LittleEndian>()?;
    let uncompressed_size = size_or_none(reader.read_i32::<LittleEndian>()?);
    let start_transition_index = reader.read_i32::<LittleEndian>()?;
    let text_id_index = reader.read_i32::<LittleEndian>()?;
    skip(reader, 4)?; // start peak index
    skip(reader, 4)?; // start score index
    let num_points = reader.read_i32::<LittleEndian>()?;
    let compressed_size = reader.read_i32::<LittleEndian>()?;
    let start_time = time_or_none(reader.read_f32::<LittleEndian>()?);
    let end_time = time_or_none(reader.read_f32::<LittleEndian>()?);
    let _collisional_cross_section = reader.read_f32::<LittleEndian>()?;
    let num_transitions = reader.read_u16::<LittleEndian>()?;
    let mut flags = StructuralFlags::from_current_bits(reader.read_u16::<LittleEndian>()?);
    let file_index = reader.read_u16::<LittleEndian>()?;
    skip(reader, 1)?; // peak count
    skip(reader, 1)?; // max peak index
    skip(reader, 1)?; // processed scans
    skip(reader, CURRENT_TRAILING_PADDING)?;

    if precursor < 0.0 {
        flags |= StructuralFlags::POLARITY_NEGATIVE;
        precursor = -precursor;
    }

    Ok(ChromGroupHeader {
        text_id_index,
        text_id_len: 0,
        start_transition_index,
        num_transitions,
        num_points,
        compressed_size,
        location_points,
        file_index,
        flags,
        precursor,
        uncompressed_size,
        start_time,
        end_time,
    })
}

fn decode_earliest<R: Read>(version: CacheFormatVersion, reader: &mut R) -> Result<ChromGroupHeader> {
    let precursor = reader.read_f32::<LittleEndian>()? as f64;
    let file_index = narrow_u16("file_index", reader.read_i32::<LittleEndian>()?)?;
    let num_transitions = narrow_u16("num_transitions", reader.read_i32::<LittleEndian>()?)?;
    let start_transition_index = reader.read_i32::<LittleEndian>()?;
    let _num_peaks = narrow_u8("num_peaks", reader.read_i32::<LittleEndian>()?)?;
    skip(reader, 4)?; // start peak index
    let _max_peak_index = reader.read_i32::<LittleEndian>()?; // -1 when unset
    let num_points = reader.read_i32::<LittleEndian>()?;
    let compressed_size = reader.read_i32::<LittleEndian>()?;
    skip(reader, 4)?; // alignment
    let location_points = reader.read_i64::<LittleEndian>()?;
    let tail = read_time_tail(version, reader)?;

    Ok(ChromGroupHeader {
        text_id_index: NO_TEXT_ID,
        text_id_len: 0,
        start_transition_index,
        num_transitions,
        num_points,
        compressed_size,
        location_points,
        file_index,
        flags: StructuralFlags::empty(),
        precursor,
        uncompressed_size: tail.uncompressed_size,
        start_time: tail.start_time,
        end_time: tail.end_time,
    })
}

fn decode_legacy<R: Read>(version: CacheFormatVersion, reader: &mut R) -> Result<ChromGroupHeader> {
    let text_id_index = reader.read_i32::<LittleEndian>()?;
    let start_transition_index = reader.read_i32::<LittleEndian>()?;
    skip(reader, 4)?; // start peak index
    skip(reader, 4)?; // start score index
    let num_points = reader.read_i32::<LittleEndian>()?;
    let compressed_size = reader.read_i32::<LittleEndian>()?;
    let flags = StructuralFlags::from_legacy_bits(reader.read_u16::<LittleEndian>()?);
    let file_index = reader.read_u16::<LittleEndian>()?;
    let text_id_len = reader.read_u16::<LittleEndian>()?;
    let num_transitions = reader.read_u16::<LittleEndian>()?;
    skip(reader, 1)?; // peak count
    skip(reader, 1)?; // max peak index
    skip(reader, 1)?; // processed scans
    skip(reader, 1)?; // alignment
    skip(reader, 2)?; // status id
    skip(reader, 2)?; // status rank
    let precursor = reader.read_f64::<LittleEndian>()?;
    let location_points = reader.read_i64::<LittleEndian>()?;
    let tail = read_time_tail(version, reader)?;

    Ok(ChromGroupHeader {
        text_id_index,
        text_id_len,
        start_transition_index,
        num_transitions,
        num_points,
        compressed_size,
        location_points,
        file_index,
        flags,
        precursor,
        uncompressed_size: tail.uncompressed_size,
        start_time: tail.start_time,
        end_time: tail.end_time,
    })
}
