//! kiwi-blocks binary entry point.
//!
//! This is a thin wrapper around the kiwi-tool library that:
//! 1. Parses command-line arguments
//! 2. Initializes logging
//! 3. Validates configuration
//! 4. Runs the selected command

use anyhow::Result;
use kiwi_tool::{LogFormat, ToolConfig, commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let config = ToolConfig::from_args();

    // RUST_LOG takes precedence over --log-level
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    // Logs go to stderr so command output can be piped
    match config.log_format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }

    tracing::debug!("Configuration loaded: {:?}", config.command);

    config.validate()?;

    let output = commands::run(&config)?;
    println!("{output}");

    Ok(())
}
