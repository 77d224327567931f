//! Error types for chromatogram cache decoding.

/// Errors that can occur while decoding cache records
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// I/O error, including short reads of a fixed-size record
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A 32-bit field of an early layout does not fit its legacy narrow width
    #[error("Corrupt record: {field} value {value} does not fit in {target}")]
    NarrowingOverflow {
        /// Name of the offending field
        field: &'static str,
        /// Raw value read from disk
        value: i64,
        /// Name of the target integer type
        target: &'static str,
    },

    /// Raw revision number outside the known range of cache layouts
    #[error("Unsupported cache format version: {0}")]
    UnsupportedVersion(u32),

    /// Caller supplied widths, offsets or counts that cannot describe a record run
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration parsing error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CacheError {
    /// Whether this error was caused by the byte source ending before a
    /// record was complete.
    pub fn is_truncation(&self) -> bool {
        matches!(self, CacheError::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof)
    }
}

/// A convenience `Result` alias using [`CacheError`].
pub type Result<T> = std::result::Result<T, CacheError>;
