//! Block kinds and their descriptors

use crate::block::{Signature, Version};
use std::fmt;

/// A header block variant, identified by a fixed signature and version
///
/// Implementors are usually zero-sized marker types:
///
/// ```rust
/// use kiwi_formats::block::{BlockKind, HeaderBlock, Signature, Version};
///
/// struct Scene;
///
/// impl BlockKind for Scene {
///     const SIGNATURE: Signature = Signature::new(*b"KSCN");
///     const VERSION: Version = Version::new(1, 2);
///     const NAME: &'static str = "Scene header block";
/// }
///
/// let block = HeaderBlock::<Scene>::default();
/// assert_eq!(block.signature().to_string(), "KSCN");
/// ```
pub trait BlockKind {
    /// Signature written to the header `kind` field
    const SIGNATURE: Signature;

    /// Version written to the header `version` field
    const VERSION: Version;

    /// Human-readable name
    const NAME: &'static str;

    /// Runtime descriptor for this kind
    fn descriptor() -> BlockDescriptor {
        BlockDescriptor::new(Self::SIGNATURE, Self::VERSION, Self::NAME)
    }
}

/// Runtime description of a block kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockDescriptor {
    /// Block signature
    pub signature: Signature,
    /// Expected version
    pub version: Version,
    /// Human-readable name
    pub name: &'static str,
}

impl BlockDescriptor {
    /// Create a new descriptor
    pub const fn new(signature: Signature, version: Version, name: &'static str) -> Self {
        Self {
            signature,
            version,
            name,
        }
    }

    /// Whether a header with this signature and version belongs to this kind
    pub fn accepts(&self, signature: Signature, version: Version) -> bool {
        self.signature == signature && self.version == version
    }
}

impl fmt::Display for BlockDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{} ({})", self.signature, self.version, self.name)
    }
}
