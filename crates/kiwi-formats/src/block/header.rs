//! Block and file header structures
//!
//! Every block starts with an 8-byte block header:
//!
//! - `kind`: 4-byte signature
//! - `size`: u32, size of the block in bytes including this header
//!
//! A container file starts with a 12-byte file header, which is a block
//! header whose `size` covers the whole file, followed by:
//!
//! - `version`: u16, packed major/minor
//! - `num_blocks`: u16, number of child blocks that follow
//!
//! All multi-byte fields are big-endian.

use crate::block::error::{BlockError, Result};
use crate::block::{Signature, Version};
use binrw::{BinRead, BinWrite};

/// Size of a block header in bytes
pub const BLOCK_HEADER_SIZE: usize = 8;

/// Size of a file header in bytes
pub const FILE_HEADER_SIZE: usize = 12;

/// Generic block header (8 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[br(big)]
#[bw(big)]
pub struct BlockHeader {
    /// Block signature
    pub kind: Signature,

    /// Block size in bytes, including this header
    pub size: u32,
}

impl BlockHeader {
    /// Create a new block header
    pub const fn new(kind: Signature, size: u32) -> Self {
        Self { kind, size }
    }

    /// Size of the data following this header
    pub fn payload_size(&self) -> usize {
        (self.size as usize).saturating_sub(BLOCK_HEADER_SIZE)
    }

    /// Validate that the size can hold the header itself
    pub fn validate(&self) -> Result<()> {
        if (self.size as usize) < BLOCK_HEADER_SIZE {
            return Err(BlockError::InvalidBlockSize {
                signature: self.kind,
                size: self.size,
                minimum: BLOCK_HEADER_SIZE as u32,
            });
        }
        Ok(())
    }
}

/// Header of a block container file (12 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[br(big)]
#[bw(big)]
pub struct FileHeader {
    /// Block header; `size` is the total file size
    pub block: BlockHeader,

    /// Format version of this kind
    pub version: Version,

    /// Number of child blocks
    pub num_blocks: u16,
}

impl FileHeader {
    /// Create a new file header
    pub const fn new(kind: Signature, version: Version, size: u32, num_blocks: u16) -> Self {
        Self {
            block: BlockHeader::new(kind, size),
            version,
            num_blocks,
        }
    }

    /// Signature of the file
    pub const fn kind(&self) -> Signature {
        self.block.kind
    }

    /// Total file size from the header
    pub const fn size(&self) -> u32 {
        self.block.size
    }

    /// Validate that the size can hold the header itself
    pub fn validate(&self) -> Result<()> {
        if (self.block.size as usize) < FILE_HEADER_SIZE {
            return Err(BlockError::InvalidBlockSize {
                signature: self.block.kind,
                size: self.block.size,
                minimum: FILE_HEADER_SIZE as u32,
            });
        }
        Ok(())
    }
}
