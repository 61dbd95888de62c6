//! Generic libkiwi block container format
//!
//! libkiwi stores its binary files as a header block followed by a flat
//! sequence of child blocks. Each file kind is identified by a four-character
//! signature and a packed major/minor version.
//!
//! # Format Overview
//!
//! - File header: kind (4) + size (u32) + version (u16) + block count (u16)
//! - Child blocks: kind (4) + size (u32) + payload
//! - Sizes include the header they belong to; the file header size covers
//!   the whole file
//! - All multi-byte integers: big-endian
//!
//! # Usage
//!
//! ```rust
//! use kiwi_formats::block::{AnyHeaderBlock, HeaderBlockBuilder, Signature};
//! use kiwi_formats::message::Kmsg;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let block = HeaderBlockBuilder::<Kmsg>::new()
//!     .add_block(Signature::parse("STR1")?, b"hello".to_vec())
//!     .build()?;
//!
//! let data = block.build()?;
//!
//! // Parse without knowing the kind up front
//! let any = AnyHeaderBlock::parse(&data)?;
//! assert_eq!(any.signature.to_string(), "KMSG");
//! assert_eq!(any.children.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod error;
pub mod header;
pub mod header_block;
pub mod kind;
pub mod raw;
pub mod registry;
pub mod signature;
pub mod version;

// Re-export main types
pub use builder::HeaderBlockBuilder;
pub use error::{BlockError, Result};
pub use header::{BLOCK_HEADER_SIZE, BlockHeader, FILE_HEADER_SIZE, FileHeader};
pub use header_block::{AnyHeaderBlock, HeaderBlock, check_header};
pub use kind::{BlockDescriptor, BlockKind};
pub use raw::RawBlock;
pub use registry::BlockRegistry;
pub use signature::Signature;
pub use version::Version;
