//! Command-line tooling for libkiwi block container files.
//!
//! This crate backs the `kiwi-blocks` binary and exposes its commands as a
//! library so they can be driven from tests and scripts:
//! - `inspect`: print a container's header and child blocks (text or JSON)
//! - `verify`: check kind and version and confirm a byte-exact rebuild
//! - `pack`: build a container from payload files
//! - `unpack`: write each child payload to its own file
//!
//! # Architecture
//!
//! - `config`: CLI/environment configuration and validation
//! - `commands`: command implementations on top of `kiwi-formats`
//! - `report`: command output types
//! - `error`: error types
//!
//! # Example
//!
//! ```no_run
//! use kiwi_tool::{ToolConfig, commands};
//!
//! fn main() -> anyhow::Result<()> {
//!     tracing_subscriber::fmt::init();
//!
//!     let config = ToolConfig::from_args();
//!     config.validate()?;
//!
//!     println!("{}", commands::run(&config)?);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod commands;
pub mod config;
pub mod error;
pub mod report;

pub use config::{ChildSpec, Command, LogFormat, ToolConfig};
pub use error::{ConfigError, ToolError};
pub use report::{BlockReport, InspectReport, PackReport, UnpackReport, VerifyReport};
