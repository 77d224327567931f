//! Reading runs of fixed-width records whose on-disk width varies by revision.
//!
//! Older cache revisions wrote narrower structs than the current in-memory
//! shape. Rather than keeping one decoder per historical width, each on-disk
//! block is resized to the newest width (zero-extended or truncated) and handed
//! to a single decoder.

use std::io::Read;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Where zero padding is added (or bytes are dropped) when an on-disk block is
/// resized to the in-memory width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PadAlignment {
    /// Pad or truncate after the existing bytes
    #[default]
    End,
    /// Pad or truncate before the existing bytes
    Start,
}

/// A record type decoded from a block of exactly [`FixedRecord::MEMORY_SIZE`] bytes.
pub trait FixedRecord: Sized {
    /// Width of the newest in-memory shape of this record
    const MEMORY_SIZE: usize;

    /// Decode one record from a block of `MEMORY_SIZE` bytes.
    fn decode_block(block: &[u8]) -> Result<Self>;
}

/// Resize `block` into `out` so that `out.len() == width`.
pub fn resize_into(block: &[u8], width: usize, alignment: PadAlignment, out: &mut Vec<u8>) {
    out.clear();
    if block.len() >= width {
        let kept = match alignment {
            PadAlignment::End => &block[..width],
            PadAlignment::Start => &block[block.len() - width..],
        };
        out.extend_from_slice(kept);
        return;
    }

    let padding = width - block.len();
    match alignment {
        PadAlignment::End => {
            out.extend_from_slice(block);
            out.resize(width, 0);
        }
        PadAlignment::Start => {
            out.resize(padding, 0);
            out.extend_from_slice(block);
        }
    }
}

/// Resize a block to `width` bytes, allocating a new buffer.
pub fn resize_block(block: &[u8], width: usize, alignment: PadAlignment) -> Vec<u8> {
    let mut out = Vec::with_capacity(width);
    resize_into(block, width, alignment, &mut out);
    out
}

/// Reader for contiguous runs of fixed-width records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructArrayReader {
    disk_size: usize,
    memory_size: usize,
    alignment: PadAlignment,
}

impl StructArrayReader {
    /// Create a reader for blocks of `disk_size` bytes decoded as `memory_size` bytes.
    pub fn new(disk_size: usize, memory_size: usize) -> Result<Self> {
        if disk_size == 0 || memory_size == 0 {
            return Err(CacheError::InvalidArgument(format!(
                "record widths must be non-zero (disk {}, memory {})",
                disk_size, memory_size
            )));
        }
        Ok(Self {
            disk_size,
            memory_size,
            alignment: PadAlignment::End,
        })
    }

    /// Create a reader for `T` stored with `disk_size` bytes per record.
    pub fn for_record<T: FixedRecord>(disk_size: usize) -> Result<Self> {
        Self::new(disk_size, T::MEMORY_SIZE)
    }

    /// Set the padding policy used when the widths differ.
    pub fn with_alignment(mut self, alignment: PadAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// On-disk width of one block
    pub fn disk_size(&self) -> usize {
        self.disk_size
    }

    /// Width of the block handed to the decoder
    pub fn memory_size(&self) -> usize {
        self.memory_size
    }

    /// Padding policy
    pub fn alignment(&self) -> PadAlignment {
        self.alignment
    }

    /// Read `count` blocks and decode each with `decode`.
    ///
    /// Exactly `count * disk_size` bytes are consumed on success. A short read
    /// fails the whole run; no partial records are returned.
    pub fn read_array<R, T, F>(&self, reader: &mut R, count: usize, mut decode: F) -> Result<Vec<T>>
    where
        R: Read,
        F: FnMut(&[u8]) -> Result<T>,
    {
        debug!(
            "Reading {} records ({} bytes on disk, {} in memory, {:?} alignment)",
            count, self.disk_size, self.memory_size, self.alignment
        );

        let mut disk_block = vec![0u8; self.disk_size];
        let mut memory_block = Vec::with_capacity(self.memory_size);
        // Counts come from the cache index; don't trust them for preallocation.
        let mut records = Vec::with_capacity(count.min(4096));

        for _ in 0..count {
            reader.read_exact(&mut disk_block)?;
            let block = if self.disk_size == self.memory_size {
                &disk_block[..]
            } else {
                resize_into(&disk_block, self.memory_size, self.alignment, &mut memory_block);
                &memory_block[..]
            };
            records.push(decode(block)?);
        }

        Ok(records)
    }

    /// Read `count` records of a [`FixedRecord`] type.
    pub fn read_records<R: Read, T: FixedRecord>(&self, reader: &mut R, count: usize) -> Result<Vec<T>> {
        if self.memory_size != T::MEMORY_SIZE {
            return Err(CacheError::InvalidArgument(format!(
                "reader decodes {} byte blocks but record expects {}",
                self.memory_size,
                T::MEMORY_SIZE
            )));
        }
        self.read_array(reader, count, T::decode_block)
    }
}
