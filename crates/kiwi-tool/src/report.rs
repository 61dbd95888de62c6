//! Command output.
//!
//! Every command produces a report that renders either as text or as JSON.

use kiwi_formats::block::{AnyHeaderBlock, BLOCK_HEADER_SIZE, BlockRegistry, FILE_HEADER_SIZE};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Header and child listing of a container file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectReport {
    /// Signature as text
    pub signature: String,
    /// Signature bytes as hex
    pub signature_hex: String,
    /// Registered name of the kind, if known
    pub kind_name: Option<String>,
    /// Version as `major.minor`
    pub version: String,
    /// Packed version value
    pub version_raw: u16,
    /// Total size in bytes
    pub size: u64,
    /// Child blocks in file order
    pub blocks: Vec<BlockReport>,
}

/// One child block in an [`InspectReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockReport {
    /// Position in the file
    pub index: usize,
    /// Byte offset of the block header
    pub offset: u64,
    /// Signature as text
    pub signature: String,
    /// Size including the block header
    pub size: u64,
    /// Leading payload bytes as hex
    pub preview: String,
}

impl InspectReport {
    /// Describe a parsed container.
    pub fn new(block: &AnyHeaderBlock, registry: &BlockRegistry, preview: usize) -> Self {
        let mut offset = FILE_HEADER_SIZE as u64;
        let blocks = block
            .children
            .iter()
            .enumerate()
            .map(|(index, child)| {
                let report = BlockReport {
                    index,
                    offset,
                    signature: child.signature.to_string(),
                    size: child.binary_size(),
                    preview: hex::encode(&child.payload[..child.payload.len().min(preview)]),
                };
                offset += child.binary_size();
                report
            })
            .collect();

        Self {
            signature: block.signature.to_string(),
            signature_hex: hex::encode(block.signature.as_bytes()),
            kind_name: block
                .descriptor_in(registry)
                .map(|desc| desc.name.to_string()),
            version: block.version.to_string(),
            version_raw: block.version.raw(),
            size: block.binary_size(),
            blocks,
        }
    }
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({}) v{} [0x{:04X}]",
            self.signature,
            self.kind_name.as_deref().unwrap_or("unregistered kind"),
            self.version,
            self.version_raw
        )?;
        writeln!(f, "  size:   {} bytes", self.size)?;
        write!(f, "  blocks: {}", self.blocks.len())?;

        for block in &self.blocks {
            write!(
                f,
                "\n  [{:>3}] {:#08x} {} {:>8} bytes",
                block.index, block.offset, block.signature, block.size
            )?;
            if !block.preview.is_empty() {
                let shown = block.preview.len() / 2;
                let more = if (block.size as usize - BLOCK_HEADER_SIZE) > shown {
                    " ..."
                } else {
                    ""
                };
                write!(f, "  {}{}", block.preview, more)?;
            }
        }
        Ok(())
    }
}

/// Result of `verify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    /// Verified file
    pub path: PathBuf,
    /// Signature as text
    pub signature: String,
    /// Version as `major.minor`
    pub version: String,
    /// Number of child blocks
    pub blocks: usize,
    /// Whether the kind is registered
    pub registered: bool,
}

impl fmt::Display for VerifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OK {}: {} v{}, {} block(s){}",
            self.path.display(),
            self.signature,
            self.version,
            self.blocks,
            if self.registered {
                ""
            } else {
                " (unregistered kind)"
            }
        )
    }
}

/// Result of `pack`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackReport {
    /// Written file
    pub output: PathBuf,
    /// Signature as text
    pub signature: String,
    /// Version as `major.minor`
    pub version: String,
    /// Number of child blocks
    pub blocks: usize,
    /// Bytes written
    pub size: u64,
}

impl fmt::Display for PackReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {}: {} v{}, {} block(s), {} bytes",
            self.output.display(),
            self.signature,
            self.version,
            self.blocks,
            self.size
        )
    }
}

/// Result of `unpack`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnpackReport {
    /// Payload files in block order
    pub files: Vec<PathBuf>,
}

impl fmt::Display for UnpackReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Extracted {} block(s)", self.files.len())?;
        for file in &self.files {
            write!(f, "\n  {}", file.display())?;
        }
        Ok(())
    }
}
