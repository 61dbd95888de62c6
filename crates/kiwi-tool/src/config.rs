//! Command-line configuration.
//!
//! Options can be provided via CLI arguments or environment variables:
//! - `--log-level` / `KIWI_BLOCKS_LOG` (ignored when `RUST_LOG` is set)
//! - `--log-format` / `KIWI_BLOCKS_LOG_FORMAT`
//! - `--kind` / `KIWI_BLOCKS_KIND` for `pack` and `verify`
//!
//! # Example
//!
//! ```no_run
//! use kiwi_tool::ToolConfig;
//!
//! let config = ToolConfig::from_args();
//! config.validate().expect("Invalid configuration");
//! ```

use crate::error::ConfigError;
use clap::{Parser, Subcommand, ValueEnum};
use kiwi_formats::block::{BlockDescriptor, BlockRegistry, Signature, Version};
use std::path::PathBuf;

/// Default number of payload bytes shown per block by `inspect`
pub const DEFAULT_PREVIEW_BYTES: usize = 16;

/// Tool configuration loaded from CLI args and environment variables.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "kiwi-blocks",
    about = "Inspect, verify, pack and unpack libkiwi block container files",
    version
)]
pub struct ToolConfig {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, env = "KIWI_BLOCKS_LOG", default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(
        long,
        global = true,
        env = "KIWI_BLOCKS_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Text
    )]
    pub log_format: LogFormat,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

/// Tool subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the header and child blocks of a container
    Inspect {
        /// Container file
        file: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Payload bytes to preview per block
        #[arg(long, default_value_t = DEFAULT_PREVIEW_BYTES)]
        preview: usize,
    },

    /// Parse a container, check its kind and confirm it rebuilds byte for byte
    Verify {
        /// Container file
        file: PathBuf,

        /// Expected signature (defaults to whatever the file declares)
        #[arg(long, env = "KIWI_BLOCKS_KIND")]
        kind: Option<String>,
    },

    /// Build a container from child payload files
    Pack {
        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Container signature
        #[arg(long, env = "KIWI_BLOCKS_KIND", default_value = "KMSG")]
        kind: String,

        /// Container version ("1.0" or "0x0100"); required for unregistered kinds
        #[arg(long)]
        version: Option<String>,

        /// Overwrite the output file if it exists
        #[arg(long)]
        force: bool,

        /// Child blocks as SIG=PATH, written in the order given
        #[arg(required = true, value_parser = parse_child_spec)]
        blocks: Vec<ChildSpec>,
    },

    /// Write each child block payload to its own file
    Unpack {
        /// Container file
        file: PathBuf,

        /// Directory to write payloads into
        #[arg(short, long)]
        output_dir: PathBuf,
    },
}

/// Child block argument of `pack`: a signature and the file holding its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildSpec {
    /// Block signature
    pub signature: Signature,
    /// Payload file
    pub path: PathBuf,
}

/// Parse a `SIG=PATH` argument.
pub fn parse_child_spec(spec: &str) -> Result<ChildSpec, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidChildSpec {
        spec: spec.to_string(),
        reason: reason.to_string(),
    };

    let (signature, path) = spec
        .split_once('=')
        .ok_or_else(|| invalid("expected SIG=PATH"))?;

    if path.is_empty() {
        return Err(invalid("missing payload path"));
    }

    let signature = Signature::parse(signature).map_err(|e| invalid(&e.to_string()))?;

    Ok(ChildSpec {
        signature,
        path: PathBuf::from(path),
    })
}

/// Resolve the descriptor used to pack a container.
///
/// Registered kinds use their registered version unless `version` overrides
/// it. Unregistered kinds require an explicit version.
pub fn resolve_pack_kind(
    registry: &BlockRegistry,
    kind: &str,
    version: Option<&str>,
) -> Result<BlockDescriptor, ConfigError> {
    let signature = Signature::parse(kind)?;
    let version = version.map(str::parse::<Version>).transpose()?;

    match (registry.lookup(signature), version) {
        (Some(desc), None) => Ok(*desc),
        (Some(desc), Some(version)) => Ok(BlockDescriptor::new(signature, version, desc.name)),
        (None, Some(version)) => Ok(BlockDescriptor::new(signature, version, "Unregistered")),
        (None, None) => Err(ConfigError::UnknownKind(signature)),
    }
}

impl ToolConfig {
    /// Parse configuration from command-line arguments.
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Validate configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - An input file doesn't exist
    /// - A signature or version argument is malformed
    /// - `pack` names an unregistered kind without `--version`
    /// - `pack` would overwrite a file without `--force`
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.command {
            Command::Inspect { file, .. } | Command::Unpack { file, .. } => {
                require_file(file)?;
            }
            Command::Verify { file, kind } => {
                require_file(file)?;
                if let Some(kind) = kind {
                    Signature::parse(kind)?;
                }
            }
            Command::Pack {
                output,
                kind,
                version,
                force,
                blocks,
            } => {
                resolve_pack_kind(&BlockRegistry::with_builtin(), kind, version.as_deref())?;

                for block in blocks {
                    require_file(&block.path)?;
                }

                if output.exists() && !force {
                    return Err(ConfigError::OutputExists(output.clone()));
                }
            }
        }

        Ok(())
    }
}

fn require_file(path: &std::path::Path) -> Result<(), ConfigError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ConfigError::MissingInput(path.to_path_buf()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_child_spec() {
        let spec = parse_child_spec("DAT1=payloads/dat1.bin").unwrap();
        assert_eq!(spec.signature, Signature::new(*b"DAT1"));
        assert_eq!(spec.path, PathBuf::from("payloads/dat1.bin"));

        // Only the first '=' separates the signature
        let spec = parse_child_spec("INF1=a=b.bin").unwrap();
        assert_eq!(spec.path, PathBuf::from("a=b.bin"));
    }

    #[test]
    fn test_parse_child_spec_rejects_malformed() {
        assert!(parse_child_spec("DAT1").is_err());
        assert!(parse_child_spec("DAT1=").is_err());
        assert!(parse_child_spec("TOOLONG=x.bin").is_err());
        assert!(parse_child_spec("=x.bin").is_err());
    }

    #[test]
    fn test_resolve_pack_kind() {
        let registry = BlockRegistry::with_builtin();

        let desc = resolve_pack_kind(&registry, "KMSG", None).unwrap();
        assert_eq!(desc.version, Version::new(1, 0));

        let desc = resolve_pack_kind(&registry, "KMSG", Some("0x0102")).unwrap();
        assert_eq!(desc.version, Version::new(1, 2));

        let desc = resolve_pack_kind(&registry, "RLYT", Some("2.0")).unwrap();
        assert_eq!(desc.signature, Signature::new(*b"RLYT"));

        assert!(matches!(
            resolve_pack_kind(&registry, "RLYT", None),
            Err(ConfigError::UnknownKind(_))
        ));
        assert!(matches!(
            resolve_pack_kind(&registry, "KMSG", Some("one")),
            Err(ConfigError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_cli_parsing() {
        let config = ToolConfig::try_parse_from([
            "kiwi-blocks",
            "pack",
            "-o",
            "out.kmsg",
            "INF1=inf.bin",
            "DAT1=dat.bin",
        ])
        .unwrap();

        match config.command {
            Command::Pack {
                output,
                kind,
                blocks,
                ..
            } => {
                assert_eq!(output, PathBuf::from("out.kmsg"));
                assert_eq!(kind, "KMSG");
                assert_eq!(blocks.len(), 2);
                assert_eq!(blocks[1].signature, Signature::new(*b"DAT1"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_validate_missing_input() {
        let config = ToolConfig::try_parse_from([
            "kiwi-blocks",
            "inspect",
            "/nonexistent/file.kmsg",
        ])
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingInput(_))
        ));
    }
}
