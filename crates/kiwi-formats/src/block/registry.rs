//! Registry of known block kinds

use crate::block::error::{BlockError, Result};
use crate::block::{BlockDescriptor, BlockKind, Signature};
use crate::message::Kmsg;

/// Lookup table from signature to block kind descriptor
///
/// Used where the kind of a file is only known at runtime, such as when
/// inspecting arbitrary files or packing a kind named on the command line.
#[derive(Debug, Clone, Default)]
pub struct BlockRegistry {
    descriptors: Vec<BlockDescriptor>,
}

impl BlockRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry containing every kind this crate defines
    pub fn with_builtin() -> Self {
        Self {
            descriptors: vec![Kmsg::descriptor()],
        }
    }

    /// Register a block kind by type
    pub fn register_kind<K: BlockKind>(&mut self) -> Result<()> {
        self.register(K::descriptor())
    }

    /// Register a descriptor
    ///
    /// Fails if a descriptor with the same signature is already present.
    pub fn register(&mut self, descriptor: BlockDescriptor) -> Result<()> {
        if self.lookup(descriptor.signature).is_some() {
            return Err(BlockError::DuplicateKind(descriptor.signature));
        }
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Find the descriptor registered for a signature
    pub fn lookup(&self, signature: Signature) -> Option<&BlockDescriptor> {
        self.descriptors.iter().find(|d| d.signature == signature)
    }

    /// Iterate over registered descriptors in registration order
    pub fn iter(&self) -> impl Iterator<Item = &BlockDescriptor> {
        self.descriptors.iter()
    }

    /// Number of registered kinds
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::block::Version;

    #[test]
    fn test_builtin_contains_kmsg() {
        let registry = BlockRegistry::with_builtin();
        let desc = registry
            .lookup(Signature::new(*b"KMSG"))
            .expect("KMSG should be registered");
        assert_eq!(desc.version, Version::new(1, 0));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = BlockRegistry::new();
        assert!(registry.is_empty());

        registry
            .register(BlockDescriptor::new(
                Signature::new(*b"KSCN"),
                Version::new(2, 0),
                "Scene",
            ))
            .unwrap();

        assert!(registry.lookup(Signature::new(*b"KSCN")).is_some());
        assert!(registry.lookup(Signature::new(*b"KMSG")).is_none());
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = BlockRegistry::with_builtin();
        let result = registry.register_kind::<Kmsg>();
        assert!(matches!(result, Err(BlockError::DuplicateKind(sig)) if sig.as_bytes() == b"KMSG"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_iter_preserves_order() {
        let mut registry = BlockRegistry::with_builtin();
        registry
            .register(BlockDescriptor::new(
                Signature::new(*b"ZZZZ"),
                Version::new(1, 0),
                "Last",
            ))
            .unwrap();

        let names: Vec<_> = registry.iter().map(|d| d.name).collect();
        assert_eq!(names.last(), Some(&"Last"));
        assert_eq!(names.len(), 2);
    }
}
