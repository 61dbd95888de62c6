//! Parsers and builders for libkiwi binary block container files
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::uninlined_format_args)] // Backwards compatibility
#![allow(clippy::doc_markdown)] // Format names don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::return_self_not_must_use)] // Builder patterns
#![allow(clippy::use_self)] // Type clarity
//! libkiwi files share one layout: a header block carrying a signature,
//! total size, version and block count, followed by the child blocks. This
//! crate provides symmetric (parser and builder) support for that layout and
//! for the file kinds built on it.
//!
//! # Supported Formats
//!
//! - **Block container**: generic header block with opaque child blocks,
//!   usable with any signature/version pair
//! - **KMSG**: message files (version 1.0)
//!
//! # Design Principles
//!
//! - **Symmetric Operations**: Both parsing and building supported
//! - **Type Safety**: File kinds are types, so a message file can't be
//!   written with the wrong signature or version
//! - **Round-Trip Guarantee**: parse(build(data)) == data

#![warn(missing_docs)]

/// Generic block container format
///
/// Signatures, versions, block kinds, the kind registry and the header block
/// types shared by every libkiwi file kind.
///
/// See the [`block`] module for the binary layout and usage examples.
pub mod block;
/// Message files (`KMSG`)
pub mod message;

/// Common format trait that all formats should implement
pub trait KiwiFormat: Sized {
    /// Parse from bytes
    fn parse(data: &[u8]) -> Result<Self, Box<dyn std::error::Error>>;

    /// Build to bytes
    fn build(&self) -> Result<Vec<u8>, Box<dyn std::error::Error>>;

    /// Verify round-trip correctness
    fn verify_round_trip(data: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
        let parsed = Self::parse(data)?;
        let rebuilt = parsed.build()?;
        if data != rebuilt.as_slice() {
            return Err("Round-trip verification failed".into());
        }
        Ok(())
    }
}
