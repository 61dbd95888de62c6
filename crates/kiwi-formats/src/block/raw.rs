//! Opaque child blocks

use crate::block::error::{BlockError, Result};
use crate::block::header::{BLOCK_HEADER_SIZE, BlockHeader};
use crate::block::Signature;
use binrw::{BinResult, BinWrite};
use std::io::{Seek, Write};

/// Child block with an uninterpreted payload
///
/// The payload excludes the 8-byte block header; the header is derived from
/// the signature and payload length when the block is written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawBlock {
    /// Block signature
    pub signature: Signature,
    /// Block contents following the header
    pub payload: Vec<u8>,
}

impl RawBlock {
    /// Create a new block
    pub fn new(signature: Signature, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            signature,
            payload: payload.into(),
        }
    }

    /// Serialized size including the block header
    pub fn binary_size(&self) -> u64 {
        (BLOCK_HEADER_SIZE + self.payload.len()) as u64
    }

    /// Block header describing this block
    pub fn header(&self) -> Result<BlockHeader> {
        let size = self.binary_size();
        let size = u32::try_from(size).map_err(|_| BlockError::SizeOverflow(size))?;
        Ok(BlockHeader::new(self.signature, size))
    }
}

impl BinWrite for RawBlock {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        let header = self.header().map_err(|e| binrw::Error::Custom {
            pos: writer.stream_position().unwrap_or(0),
            err: Box::new(e),
        })?;
        header.write_options(writer, endian, ())?;
        writer.write_all(&self.payload)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use binrw::io::Cursor;

    #[test]
    fn test_binary_size_includes_header() {
        let block = RawBlock::new(Signature::new(*b"DATA"), vec![1, 2, 3]);
        assert_eq!(block.binary_size(), 11);
        assert_eq!(block.header().unwrap().size, 11);
    }

    #[test]
    fn test_write_layout() {
        let block = RawBlock::new(Signature::new(*b"STR1"), b"hi".to_vec());

        let mut buf = Vec::new();
        block
            .write_options(&mut Cursor::new(&mut buf), binrw::Endian::Big, ())
            .expect("Should write block");

        assert_eq!(
            buf,
            [b'S', b'T', b'R', b'1', 0x00, 0x00, 0x00, 0x0A, b'h', b'i']
        );
    }

    #[test]
    fn test_empty_payload() {
        let block = RawBlock::new(Signature::new(*b"NONE"), Vec::new());
        assert_eq!(block.binary_size(), 8);
    }
}
