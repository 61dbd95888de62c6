//! Four-character block signatures

use crate::block::error::{BlockError, Result};
use binrw::{BinRead, BinWrite};
use std::fmt;
use std::str::FromStr;

/// Four-byte block signature (libkiwi calls this the block "kind")
///
/// Stored on disk as the raw bytes, which is the same as a big-endian `u32`.
#[derive(BinRead, BinWrite, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature([u8; 4]);

impl Signature {
    /// Signature length in bytes
    pub const LEN: usize = 4;

    /// Create a signature from raw bytes
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Parse a signature from text
    ///
    /// The text must be exactly four ASCII characters.
    pub fn parse(text: &str) -> Result<Self> {
        let bytes: [u8; 4] = text
            .as_bytes()
            .try_into()
            .map_err(|_| BlockError::InvalidSignature(text.to_string()))?;

        if !bytes.iter().all(u8::is_ascii) {
            return Err(BlockError::InvalidSignature(text.to_string()));
        }

        Ok(Self(bytes))
    }

    /// Create a signature from its `u32` representation
    pub const fn from_u32(value: u32) -> Self {
        Self(value.to_be_bytes())
    }

    /// Get the `u32` representation (big-endian interpretation of the bytes)
    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    /// Get the raw bytes
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Get the raw bytes by value
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0
    }

    /// Whether every byte is a printable ASCII character
    pub fn is_printable(&self) -> bool {
        self.0.iter().all(|b| b.is_ascii_graphic() || *b == b' ')
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            let c = if b.is_ascii_graphic() || b == b' ' {
                char::from(b)
            } else {
                '.'
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl FromStr for Signature {
    type Err = BlockError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<[u8; 4]> for Signature {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let sig = Signature::parse("KMSG").expect("Should parse");
        assert_eq!(sig.as_bytes(), b"KMSG");
        assert_eq!(sig.to_u32(), 0x4B4D_5347);
        assert_eq!(sig.to_string(), "KMSG");
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!(matches!(
            Signature::parse("KMS"),
            Err(BlockError::InvalidSignature(_))
        ));
        assert!(matches!(
            Signature::parse("KMSG1"),
            Err(BlockError::InvalidSignature(_))
        ));
        assert!(Signature::parse("").is_err());
    }

    #[test]
    fn test_parse_rejects_non_ascii() {
        // "é" is two bytes, so this is four bytes but not ASCII
        assert!(Signature::parse("Aé1").is_err());
    }

    #[test]
    fn test_u32_conversion() {
        let sig = Signature::from_u32(0x5445_5354);
        assert_eq!(sig.as_bytes(), b"TEST");
        assert_eq!(Signature::from_u32(sig.to_u32()), sig);
    }

    #[test]
    fn test_display_non_printable() {
        let sig = Signature::new([b'A', 0x00, 0xFF, b'Z']);
        assert!(!sig.is_printable());
        assert_eq!(sig.to_string(), "A..Z");
    }

    #[test]
    fn test_from_str() {
        let sig: Signature = "DATA".parse().unwrap();
        assert_eq!(sig, Signature::new(*b"DATA"));
    }
}
