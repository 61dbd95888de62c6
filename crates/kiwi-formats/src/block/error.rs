//! Error types for block container parsing and building

use crate::block::{Signature, Version};
use thiserror::Error;

/// Errors that can occur when parsing or building block containers
#[derive(Debug, Error)]
pub enum BlockError {
    /// Signature text is not exactly four ASCII characters
    #[error("Invalid signature {0:?}: expected exactly 4 ASCII characters")]
    InvalidSignature(String),

    /// Header kind does not match the expected block kind
    #[error("Kind mismatch: expected '{expected}', got '{actual}' ({actual_hex})")]
    KindMismatch {
        /// Signature of the expected kind
        expected: Signature,
        /// Signature found in the header
        actual: Signature,
        /// Raw signature bytes as hex, for non-printable signatures
        actual_hex: String,
    },

    /// Header version does not match the version of the expected kind
    #[error("Version mismatch for '{signature}': expected {expected}, got {actual}")]
    VersionMismatch {
        /// Signature of the block
        signature: Signature,
        /// Version of the expected kind
        expected: Version,
        /// Version found in the header
        actual: Version,
    },

    /// Version text could not be parsed
    #[error("Invalid version {0:?}: expected 'major.minor' or a hex value like '0x0100'")]
    InvalidVersion(String),

    /// Data is too short for the expected layout
    #[error("Truncated data: expected {expected} bytes, got {actual} bytes")]
    TruncatedData {
        /// Expected minimum size
        expected: usize,
        /// Actual data size
        actual: usize,
    },

    /// Header size field disagrees with the size of the contents
    #[error("Size mismatch: header says {expected} bytes, contents occupy {actual} bytes")]
    SizeMismatch {
        /// Size from the header
        expected: u32,
        /// Computed size
        actual: u64,
    },

    /// Child block declares a size smaller than its own header
    #[error("Invalid size {size} for block '{signature}' (minimum is {minimum})")]
    InvalidBlockSize {
        /// Signature of the offending block
        signature: Signature,
        /// Declared size
        size: u32,
        /// Minimum legal size
        minimum: u32,
    },

    /// More children than the 16-bit block count can describe
    #[error("Too many blocks: {0} (maximum is 65535)")]
    TooManyBlocks(usize),

    /// Serialized size does not fit in the 32-bit size field
    #[error("Serialized size {0} exceeds the 32-bit size field")]
    SizeOverflow(u64),

    /// A kind with this signature is already registered
    #[error("Block kind '{0}' is already registered")]
    DuplicateKind(Signature),

    /// Binary read error
    #[error("Binary parsing error: {0}")]
    BinRead(String),

    /// Binary write error
    #[error("Binary write error: {0}")]
    BinWrite(String),

    /// IO error during parsing or building
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<binrw::Error> for BlockError {
    fn from(e: binrw::Error) -> Self {
        Self::BinRead(e.to_string())
    }
}

/// Result type alias for block container operations
pub type Result<T> = std::result::Result<T, BlockError>;
