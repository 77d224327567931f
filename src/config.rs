//! Decode configuration, optionally loaded from a TOML file.
//!
//! ```toml
//! # chromcache.toml
//! [decode]
//! alignment = "end"
//! max_records = 1000000
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{CacheError, Result};
use crate::struct_array::PadAlignment;

/// Settings applied by [`CacheReader`](crate::cache::CacheReader)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Padding policy when narrow peak records are widened
    pub alignment: PadAlignment,
    /// Largest record count accepted for a single run
    pub max_records: Option<usize>,
}

impl DecodeConfig {
    /// Set the padding policy.
    pub fn with_alignment(mut self, alignment: PadAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Reject runs longer than `max_records`.
    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = Some(max_records);
        self
    }

    /// Fail if `count` exceeds the configured limit.
    pub fn check_count(&self, count: usize) -> Result<()> {
        match self.max_records {
            Some(max) if count > max => Err(CacheError::InvalidArgument(format!(
                "record count {} exceeds configured maximum {}",
                count, max
            ))),
            _ => Ok(()),
        }
    }
}

/// Root structure of a `chromcache.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChromCacheConfig {
    /// Decoding settings
    #[serde(default)]
    pub decode: DecodeConfig,
}

impl ChromCacheConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CacheError::Config(e.to_string()))
    }
}
