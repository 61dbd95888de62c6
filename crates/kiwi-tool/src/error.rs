//! Error types for the block container tool.

use kiwi_formats::block::{BlockError, Signature};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid child block argument
    #[error("Invalid child block '{spec}': {reason}")]
    InvalidChildSpec {
        /// The argument as given
        spec: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Signature or version argument could not be parsed
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] BlockError),

    /// Kind is not registered and no version was given
    #[error("Unknown block kind '{0}': pass --version to use an unregistered kind")]
    UnknownKind(Signature),

    /// Output file exists and overwriting was not requested
    #[error("Output file already exists: {} (use --force to overwrite)", .0.display())]
    OutputExists(PathBuf),

    /// Input file is missing
    #[error("Input file not found: {}", .0.display())]
    MissingInput(PathBuf),
}

/// Errors raised while running a command.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Failed to read an input file
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to write an output file
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        /// File being written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// File contents are not a valid container
    #[error("Invalid container {}: {source}", .path.display())]
    Format {
        /// File being parsed
        path: PathBuf,
        /// Underlying format error
        #[source]
        source: BlockError,
    },

    /// Container could not be built
    #[error("Failed to build container: {0}")]
    Build(#[from] BlockError),

    /// Rebuilt bytes differ from the file contents
    #[error("Round-trip verification failed for {}: first difference at offset {offset:#x}", .path.display())]
    RoundTrip {
        /// File being verified
        path: PathBuf,
        /// First differing byte offset
        offset: usize,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Report serialization error
    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}
