//! Builder for constructing header blocks

use crate::block::error::Result;
use crate::block::{BlockKind, HeaderBlock, RawBlock, Signature};
use std::marker::PhantomData;

/// Builder for constructing `HeaderBlock` instances
///
/// Children are written in the order they are added. The header size and
/// block count are derived at build time.
pub struct HeaderBlockBuilder<K: BlockKind> {
    children: Vec<RawBlock>,
    kind: PhantomData<fn() -> K>,
}

impl<K: BlockKind> HeaderBlockBuilder<K> {
    /// Create a new builder with no children
    #[must_use]
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
            kind: PhantomData,
        }
    }

    /// Add a child block from a signature and payload
    #[must_use]
    pub fn add_block(mut self, signature: Signature, payload: impl Into<Vec<u8>>) -> Self {
        self.children.push(RawBlock::new(signature, payload));
        self
    }

    /// Add an existing child block
    #[must_use]
    pub fn add_raw(mut self, block: RawBlock) -> Self {
        self.children.push(block);
        self
    }

    /// Add several child blocks
    #[must_use]
    pub fn extend(mut self, blocks: impl IntoIterator<Item = RawBlock>) -> Self {
        self.children.extend(blocks);
        self
    }

    /// Build the final `HeaderBlock`
    ///
    /// Fails if the block count or total size exceed their header fields.
    pub fn build(self) -> Result<HeaderBlock<K>> {
        let block = HeaderBlock::new(self.children);
        block.validate()?;
        Ok(block)
    }
}

impl<K: BlockKind> Default for HeaderBlockBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}
