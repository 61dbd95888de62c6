//! Message files (`KMSG` header block)
//!
//! A message file is a header block with signature `KMSG` and version 1.0.
//! Its child blocks are kept as opaque payloads.
//!
//! ```rust
//! use kiwi_formats::message::KmsgBlock;
//!
//! let block = KmsgBlock::default();
//! assert_eq!(block.signature().to_string(), "KMSG");
//! assert_eq!(block.version().raw(), 0x0100);
//! assert!(block.is_empty());
//! ```

use crate::block::{BlockKind, HeaderBlock, HeaderBlockBuilder, Signature, Version};

/// Message header block kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Kmsg;

impl BlockKind for Kmsg {
    const SIGNATURE: Signature = Signature::new(*b"KMSG");
    const VERSION: Version = Version::new(1, 0);
    const NAME: &'static str = "Message header block";
}

/// Message file: a `KMSG` header block and its children
pub type KmsgBlock = HeaderBlock<Kmsg>;

/// Builder for message files
pub type KmsgBlockBuilder = HeaderBlockBuilder<Kmsg>;
