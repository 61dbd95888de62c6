//! Packed major/minor format versions

use crate::block::error::{BlockError, Result};
use binrw::{BinRead, BinWrite};
use std::fmt;
use std::str::FromStr;

/// Packed 16-bit format version
///
/// The high byte holds the major version and the low byte the minor
/// version, so `0x0100` is version 1.0.
#[derive(BinRead, BinWrite, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version(u16);

impl Version {
    /// Create a version from major and minor components
    pub const fn new(major: u8, minor: u8) -> Self {
        Self(((major as u16) << 8) | minor as u16)
    }

    /// Create a version from its packed representation
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Get the packed representation
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Get the major version (high byte)
    pub const fn major(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Get the minor version (low byte)
    pub const fn minor(self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major(), self.minor())
    }
}

impl FromStr for Version {
    type Err = BlockError;

    /// Accepts `major.minor` (`"1.0"`) or a packed hex value (`"0x0100"`)
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || BlockError::InvalidVersion(s.to_string());

        if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            return u16::from_str_radix(hex, 16)
                .map(Self::from_raw)
                .map_err(|_| invalid());
        }

        let (major, minor) = s.split_once('.').ok_or_else(invalid)?;
        let major = major.parse::<u8>().map_err(|_| invalid())?;
        let minor = minor.parse::<u8>().map_err(|_| invalid())?;
        Ok(Self::new(major, minor))
    }
}

impl From<u16> for Version {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}
