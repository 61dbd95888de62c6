//! Header blocks: a file header followed by a sequence of child blocks
//!
//! [`AnyHeaderBlock`] holds a container whose kind is only known at runtime.
//! [`HeaderBlock`] is the same container bound to a [`BlockKind`], so its
//! signature and version are fixed by the type.

use crate::block::error::{BlockError, Result};
use crate::block::header::{BLOCK_HEADER_SIZE, BlockHeader, FILE_HEADER_SIZE, FileHeader};
use crate::block::{BlockDescriptor, BlockKind, BlockRegistry, RawBlock, Signature, Version};
use binrw::{BinRead, BinWrite};
use std::fmt;
use std::io::Cursor;
use std::marker::PhantomData;
use tracing::debug;

/// Compute the file header for a container with the given children
fn container_header(
    signature: Signature,
    version: Version,
    children: &[RawBlock],
) -> Result<FileHeader> {
    let num_blocks =
        u16::try_from(children.len()).map_err(|_| BlockError::TooManyBlocks(children.len()))?;

    let total = container_size(children);
    let size = u32::try_from(total).map_err(|_| BlockError::SizeOverflow(total))?;

    Ok(FileHeader::new(signature, version, size, num_blocks))
}

fn container_size(children: &[RawBlock]) -> u64 {
    FILE_HEADER_SIZE as u64 + children.iter().map(RawBlock::binary_size).sum::<u64>()
}

/// Serialize a header and its children
fn write_container(
    signature: Signature,
    version: Version,
    children: &[RawBlock],
) -> Result<Vec<u8>> {
    let header = container_header(signature, version, children)?;

    let mut buffer = Vec::with_capacity(header.size() as usize);
    let mut cursor = Cursor::new(&mut buffer);

    header
        .write_options(&mut cursor, binrw::Endian::Big, ())
        .map_err(|e| BlockError::BinWrite(e.to_string()))?;

    for child in children {
        child
            .write_options(&mut cursor, binrw::Endian::Big, ())
            .map_err(|e| BlockError::BinWrite(e.to_string()))?;
    }

    Ok(buffer)
}

/// Header block of any kind
///
/// Parsing accepts any signature and version. Use [`AnyHeaderBlock::into_kind`]
/// to check the header against a specific [`BlockKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnyHeaderBlock {
    /// File signature
    pub signature: Signature,
    /// File version
    pub version: Version,
    /// Child blocks in file order
    pub children: Vec<RawBlock>,
}

impl AnyHeaderBlock {
    /// Create a new header block
    pub fn new(signature: Signature, version: Version, children: Vec<RawBlock>) -> Self {
        Self {
            signature,
            version,
            children,
        }
    }

    /// Parse a container from binary data
    ///
    /// Bytes past the size recorded in the header are ignored.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < FILE_HEADER_SIZE {
            return Err(BlockError::TruncatedData {
                expected: FILE_HEADER_SIZE,
                actual: data.len(),
            });
        }

        let header = FileHeader::read_options(&mut Cursor::new(data), binrw::Endian::Big, ())?;
        header.validate()?;

        let declared = header.size() as usize;
        if data.len() < declared {
            return Err(BlockError::TruncatedData {
                expected: declared,
                actual: data.len(),
            });
        }
        if data.len() > declared {
            debug!(
                "Ignoring {} bytes past the end of '{}' container",
                data.len() - declared,
                header.kind()
            );
        }

        let body = &data[..declared];
        let mut offset = FILE_HEADER_SIZE;
        let mut children = Vec::with_capacity(header.num_blocks as usize);

        for index in 0..header.num_blocks {
            if body.len() - offset < BLOCK_HEADER_SIZE {
                return Err(BlockError::TruncatedData {
                    expected: offset + BLOCK_HEADER_SIZE,
                    actual: body.len(),
                });
            }

            let mut cursor = Cursor::new(&body[offset..]);
            let block = BlockHeader::read_options(&mut cursor, binrw::Endian::Big, ())?;
            block.validate()?;

            let end = offset + block.size as usize;
            if end > body.len() {
                return Err(BlockError::TruncatedData {
                    expected: end,
                    actual: body.len(),
                });
            }

            debug!(
                "Block {} at offset {:#x}: '{}' ({} bytes)",
                index, offset, block.kind, block.size
            );

            children.push(RawBlock::new(
                block.kind,
                &body[offset + BLOCK_HEADER_SIZE..end],
            ));
            offset = end;
        }

        if offset != declared {
            return Err(BlockError::SizeMismatch {
                expected: header.size(),
                actual: offset as u64,
            });
        }

        Ok(Self {
            signature: header.kind(),
            version: header.version,
            children,
        })
    }

    /// Build the container to binary data
    pub fn build(&self) -> Result<Vec<u8>> {
        write_container(self.signature, self.version, &self.children)
    }

    /// Check that the container can be serialized
    pub fn validate(&self) -> Result<()> {
        container_header(self.signature, self.version, &self.children).map(|_| ())
    }

    /// File header that [`AnyHeaderBlock::build`] would write
    pub fn file_header(&self) -> Result<FileHeader> {
        container_header(self.signature, self.version, &self.children)
    }

    /// Serialized size in bytes
    pub fn binary_size(&self) -> u64 {
        container_size(&self.children)
    }

    /// Find the registered descriptor for this container's signature
    pub fn descriptor_in<'a>(&self, registry: &'a BlockRegistry) -> Option<&'a BlockDescriptor> {
        registry.lookup(self.signature)
    }

    /// Check that the signature and version belong to `K`
    pub fn check_kind<K: BlockKind>(&self) -> Result<()> {
        check_header(&K::descriptor(), self.signature, self.version)
    }

    /// Convert into a typed header block, checking signature and version
    pub fn into_kind<K: BlockKind>(self) -> Result<HeaderBlock<K>> {
        self.check_kind::<K>()?;
        Ok(HeaderBlock::new(self.children))
    }
}

/// Check a header's signature and version against a descriptor
pub fn check_header(
    descriptor: &BlockDescriptor,
    signature: Signature,
    version: Version,
) -> Result<()> {
    if descriptor.signature != signature {
        return Err(BlockError::KindMismatch {
            expected: descriptor.signature,
            actual: signature,
            actual_hex: hex::encode(signature.as_bytes()),
        });
    }

    if descriptor.version != version {
        return Err(BlockError::VersionMismatch {
            signature,
            expected: descriptor.version,
            actual: version,
        });
    }

    Ok(())
}

impl crate::KiwiFormat for AnyHeaderBlock {
    fn parse(data: &[u8]) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        Self::parse(data).map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
    }

    fn build(&self) -> std::result::Result<Vec<u8>, Box<dyn std::error::Error>> {
        self.build()
            .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
    }
}

/// Header block of a specific kind
///
/// The signature and version come from `K`; only the children are stored.
pub struct HeaderBlock<K: BlockKind> {
    children: Vec<RawBlock>,
    kind: PhantomData<fn() -> K>,
}

impl<K: BlockKind> HeaderBlock<K> {
    /// Create a header block owning the given children
    pub fn new(children: Vec<RawBlock>) -> Self {
        Self {
            children,
            kind: PhantomData,
        }
    }

    /// Signature of this kind
    pub fn signature(&self) -> Signature {
        K::SIGNATURE
    }

    /// Version of this kind
    pub fn version(&self) -> Version {
        K::VERSION
    }

    /// Descriptor of this kind
    pub fn descriptor(&self) -> BlockDescriptor {
        K::descriptor()
    }

    /// Child blocks in file order
    pub fn children(&self) -> &[RawBlock] {
        &self.children
    }

    /// Mutable access to the child blocks
    pub fn children_mut(&mut self) -> &mut Vec<RawBlock> {
        &mut self.children
    }

    /// Take ownership of the child blocks
    pub fn into_children(self) -> Vec<RawBlock> {
        self.children
    }

    /// Append a child block
    pub fn push(&mut self, block: RawBlock) {
        self.children.push(block);
    }

    /// Number of child blocks
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether there are no child blocks
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// First child with the given signature
    pub fn find(&self, signature: Signature) -> Option<&RawBlock> {
        self.children.iter().find(|b| b.signature == signature)
    }

    /// All children with the given signature
    pub fn find_all(&self, signature: Signature) -> impl Iterator<Item = &RawBlock> {
        self.children.iter().filter(move |b| b.signature == signature)
    }

    /// Serialized size in bytes
    pub fn binary_size(&self) -> u64 {
        container_size(&self.children)
    }

    /// File header that [`HeaderBlock::build`] would write
    pub fn file_header(&self) -> Result<FileHeader> {
        container_header(K::SIGNATURE, K::VERSION, &self.children)
    }

    /// Check that the block can be serialized
    pub fn validate(&self) -> Result<()> {
        self.file_header().map(|_| ())
    }

    /// Parse a header block, checking signature and version against `K`
    pub fn parse(data: &[u8]) -> Result<Self> {
        AnyHeaderBlock::parse(data)?.into_kind()
    }

    /// Build the header block to binary data
    pub fn build(&self) -> Result<Vec<u8>> {
        write_container(K::SIGNATURE, K::VERSION, &self.children)
    }
}

impl<K: BlockKind> Default for HeaderBlock<K> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<K: BlockKind> Clone for HeaderBlock<K> {
    fn clone(&self) -> Self {
        Self::new(self.children.clone())
    }
}

impl<K: BlockKind> PartialEq for HeaderBlock<K> {
    fn eq(&self, other: &Self) -> bool {
        self.children == other.children
    }
}

impl<K: BlockKind> Eq for HeaderBlock<K> {}

impl<K: BlockKind> fmt::Debug for HeaderBlock<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderBlock")
            .field("signature", &K::SIGNATURE)
            .field("version", &K::VERSION)
            .field("children", &self.children)
            .finish()
    }
}

impl<K: BlockKind> From<HeaderBlock<K>> for AnyHeaderBlock {
    fn from(block: HeaderBlock<K>) -> Self {
        Self::new(K::SIGNATURE, K::VERSION, block.children)
    }
}

impl<K: BlockKind> TryFrom<AnyHeaderBlock> for HeaderBlock<K> {
    type Error = BlockError;

    fn try_from(block: AnyHeaderBlock) -> Result<Self> {
        block.into_kind()
    }
}

impl<K: BlockKind> crate::KiwiFormat for HeaderBlock<K> {
    fn parse(data: &[u8]) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        Self::parse(data).map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
    }

    fn build(&self) -> std::result::Result<Vec<u8>, Box<dyn std::error::Error>> {
        self.build()
            .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::KiwiFormat;
    use pretty_assertions::assert_eq;

    struct Test;

    impl BlockKind for Test {
        const SIGNATURE: Signature = Signature::new(*b"TEST");
        const VERSION: Version = Version::new(2, 1);
        const NAME: &'static str = "Test header block";
    }

    fn container_bytes(
        kind: &[u8; 4],
        version: u16,
        declared_size: Option<u32>,
        declared_count: Option<u16>,
        children: &[(&[u8; 4], &[u8])],
    ) -> Vec<u8> {
        let body_len: usize = children.iter().map(|(_, p)| 8 + p.len()).sum();
        let size = declared_size.unwrap_or((12 + body_len) as u32);
        let count = declared_count.unwrap_or(children.len() as u16);

        let mut data = Vec::new();
        data.extend_from_slice(kind);
        data.extend_from_slice(&size.to_be_bytes());
        data.extend_from_slice(&version.to_be_bytes());
        data.extend_from_slice(&count.to_be_bytes());
        for (sig, payload) in children {
            data.extend_from_slice(*sig);
            data.extend_from_slice(&((8 + payload.len()) as u32).to_be_bytes());
            data.extend_from_slice(payload);
        }
        data
    }

    #[test]
    fn test_parse_any() {
        let data = container_bytes(
            b"ABCD",
            0x0305,
            None,
            None,
            &[(b"STR1", b"hello"), (b"NUM1", &[0, 0, 0, 7])],
        );

        let block = AnyHeaderBlock::parse(&data).expect("Should parse");
        assert_eq!(block.signature.as_bytes(), b"ABCD");
        assert_eq!(block.version, Version::new(3, 5));
        assert_eq!(block.children.len(), 2);
        assert_eq!(block.children[0].signature.as_bytes(), b"STR1");
        assert_eq!(block.children[0].payload, b"hello");
        assert_eq!(block.children[1].payload, [0, 0, 0, 7]);
        assert_eq!(block.binary_size(), data.len() as u64);
    }

    #[test]
    fn test_build_matches_hand_written_bytes() {
        let data = container_bytes(b"TEST", 0x0201, None, None, &[(b"DATA", &[1, 2, 3])]);

        let block = HeaderBlock::<Test>::new(vec![RawBlock::new(
            Signature::new(*b"DATA"),
            vec![1, 2, 3],
        )]);

        assert_eq!(block.build().unwrap(), data);
    }

    #[test]
    fn test_typed_round_trip() {
        let mut block = HeaderBlock::<Test>::default();
        block.push(RawBlock::new(Signature::new(*b"AAAA"), vec![0xAA; 5]));
        block.push(RawBlock::new(Signature::new(*b"BBBB"), Vec::new()));

        let data = block.build().unwrap();
        assert_eq!(data.len() as u64, block.binary_size());

        let parsed = HeaderBlock::<Test>::parse(&data).unwrap();
        assert_eq!(parsed, block);
        assert!(HeaderBlock::<Test>::verify_round_trip(&data).is_ok());
    }

    #[test]
    fn test_kind_mismatch() {
        let data = container_bytes(b"NOPE", 0x0201, None, None, &[]);
        let result = HeaderBlock::<Test>::parse(&data);
        match result {
            Err(BlockError::KindMismatch {
                expected,
                actual,
                actual_hex,
            }) => {
                assert_eq!(expected.as_bytes(), b"TEST");
                assert_eq!(actual.as_bytes(), b"NOPE");
                assert_eq!(actual_hex, "4e4f5045");
            }
            other => panic!("Expected KindMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_version_mismatch() {
        let data = container_bytes(b"TEST", 0x0200, None, None, &[]);
        assert!(matches!(
            HeaderBlock::<Test>::parse(&data),
            Err(BlockError::VersionMismatch { expected, actual, .. })
                if expected == Version::new(2, 1) && actual == Version::new(2, 0)
        ));
    }

    #[test]
    fn test_truncated_header() {
        assert!(matches!(
            AnyHeaderBlock::parse(&[b'T', b'E', b'S', b'T', 0]),
            Err(BlockError::TruncatedData {
                expected: 12,
                actual: 5
            })
        ));
    }

    #[test]
    fn test_truncated_file() {
        let mut data = container_bytes(b"TEST", 0x0201, None, None, &[(b"DATA", &[9; 16])]);
        data.truncate(20);
        assert!(matches!(
            AnyHeaderBlock::parse(&data),
            Err(BlockError::TruncatedData {
                expected: 36,
                actual: 20
            })
        ));
    }

    #[test]
    fn test_child_overruns_container() {
        // Header claims fewer bytes than the child needs
        let data = container_bytes(b"TEST", 0x0201, Some(24), None, &[(b"DATA", &[9; 16])]);
        assert!(matches!(
            AnyHeaderBlock::parse(&data),
            Err(BlockError::TruncatedData {
                expected: 36,
                actual: 24
            })
        ));
    }

    #[test]
    fn test_block_count_exceeds_contents() {
        let data = container_bytes(b"TEST", 0x0201, None, Some(2), &[(b"DATA", &[1])]);
        assert!(matches!(
            AnyHeaderBlock::parse(&data),
            Err(BlockError::TruncatedData { .. })
        ));
    }

    #[test]
    fn test_unclaimed_bytes_inside_container() {
        // Header counts one block but the size covers two
        let data = container_bytes(
            b"TEST",
            0x0201,
            None,
            Some(1),
            &[(b"DATA", &[1]), (b"MORE", &[2])],
        );
        assert!(matches!(
            AnyHeaderBlock::parse(&data),
            Err(BlockError::SizeMismatch {
                expected: 30,
                actual: 21
            })
        ));
    }

    #[test]
    fn test_undersized_child_rejected() {
        let mut data = container_bytes(b"TEST", 0x0201, None, None, &[(b"DATA", &[0; 4])]);
        // Overwrite the child size with 4
        data[16..20].copy_from_slice(&4u32.to_be_bytes());
        assert!(matches!(
            AnyHeaderBlock::parse(&data),
            Err(BlockError::InvalidBlockSize { size: 4, .. })
        ));
    }

    #[test]
    fn test_trailing_padding_ignored() {
        let mut data = container_bytes(b"TEST", 0x0201, None, None, &[(b"DATA", &[5; 3])]);
        let original_len = data.len();
        data.extend_from_slice(&[0; 9]);

        let block = HeaderBlock::<Test>::parse(&data).expect("Should ignore padding");
        assert_eq!(block.len(), 1);
        assert_eq!(block.build().unwrap().len(), original_len);
    }

    #[test]
    fn test_find_and_find_all() {
        let block = HeaderBlock::<Test>::new(vec![
            RawBlock::new(Signature::new(*b"STR1"), vec![1]),
            RawBlock::new(Signature::new(*b"NUM1"), vec![2]),
            RawBlock::new(Signature::new(*b"STR1"), vec![3]),
        ]);

        let first = block.find(Signature::new(*b"STR1")).unwrap();
        assert_eq!(first.payload, [1]);
        assert_eq!(block.find_all(Signature::new(*b"STR1")).count(), 2);
        assert!(block.find(Signature::new(*b"NONE")).is_none());
    }

    #[test]
    fn test_too_many_blocks() {
        let children = vec![RawBlock::new(Signature::new(*b"TINY"), Vec::new()); 65_536];
        let block = HeaderBlock::<Test>::new(children);
        assert!(matches!(
            block.validate(),
            Err(BlockError::TooManyBlocks(65_536))
        ));
        assert!(block.build().is_err());
    }

    #[test]
    fn test_any_to_typed_conversion() {
        let any = AnyHeaderBlock::new(
            Test::SIGNATURE,
            Test::VERSION,
            vec![RawBlock::new(Signature::new(*b"DATA"), vec![7])],
        );
        let typed: HeaderBlock<Test> = any.clone().try_into().unwrap();
        assert_eq!(AnyHeaderBlock::from(typed), any);
    }

    #[test]
    fn test_descriptor_in_registry() {
        let registry = BlockRegistry::with_builtin();
        let any = AnyHeaderBlock::new(Signature::new(*b"KMSG"), Version::new(1, 0), Vec::new());
        assert_eq!(any.descriptor_in(&registry).unwrap().name, "Message header block");

        let unknown = AnyHeaderBlock::new(Test::SIGNATURE, Test::VERSION, Vec::new());
        assert!(unknown.descriptor_in(&registry).is_none());
    }
}
