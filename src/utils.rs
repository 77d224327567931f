//! Low-level helpers shared by the record decoders.

use std::io::Read;

use crate::error::{CacheError, Result};

/// Consume and discard `n` bytes.
///
/// Discarded fields are still read so that a short stream fails at the same
/// point a full decode would.
pub(crate) fn skip<R: Read>(reader: &mut R, n: usize) -> Result<()> {
    let mut scratch = [0u8; 8];
    let mut remaining = n;
    while remaining > 0 {
        let chunk = remaining.min(scratch.len());
        reader.read_exact(&mut scratch[..chunk])?;
        remaining -= chunk;
    }
    Ok(())
}

/// Narrow a 32-bit on-disk value to `u16`, failing on overflow.
pub(crate) fn narrow_u16(field: &'static str, value: i32) -> Result<u16> {
    u16::try_from(value).map_err(|_| CacheError::NarrowingOverflow {
        field,
        value: value as i64,
        target: "u16",
    })
}

/// Narrow a 32-bit on-disk value to `u8`, failing on overflow.
pub(crate) fn narrow_u8(field: &'static str, value: i32) -> Result<u8> {
    u8::try_from(value).map_err(|_| CacheError::NarrowingOverflow {
        field,
        value: value as i64,
        target: "u8",
    })
}
