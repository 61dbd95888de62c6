//! Command implementations.

use crate::config::{ChildSpec, Command, ToolConfig, resolve_pack_kind};
use crate::error::{ConfigError, ToolError};
use crate::report::{InspectReport, PackReport, UnpackReport, VerifyReport};
use kiwi_formats::block::{
    AnyHeaderBlock, BlockDescriptor, BlockRegistry, RawBlock, Signature, check_header,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Run the configured command and return the text to print.
pub fn run(config: &ToolConfig) -> Result<String, ToolError> {
    let registry = BlockRegistry::with_builtin();

    match &config.command {
        Command::Inspect {
            file,
            json,
            preview,
        } => {
            let report = inspect(&registry, file, *preview)?;
            if *json {
                Ok(serde_json::to_string_pretty(&report)?)
            } else {
                Ok(report.to_string())
            }
        }
        Command::Verify { file, kind } => {
            let expected = kind
                .as_deref()
                .map(Signature::parse)
                .transpose()
                .map_err(ConfigError::from)?;
            Ok(verify(&registry, file, expected)?.to_string())
        }
        Command::Pack {
            output,
            kind,
            version,
            blocks,
            ..
        } => {
            let descriptor = resolve_pack_kind(&registry, kind, version.as_deref())?;
            Ok(pack(&descriptor, blocks, output)?.to_string())
        }
        Command::Unpack { file, output_dir } => Ok(unpack(file, output_dir)?.to_string()),
    }
}

fn read_container(path: &Path) -> Result<(Vec<u8>, AnyHeaderBlock), ToolError> {
    let data = std::fs::read(path).map_err(|source| ToolError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let block = AnyHeaderBlock::parse(&data).map_err(|source| ToolError::Format {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        "Parsed {}: '{}' v{} with {} block(s)",
        path.display(),
        block.signature,
        block.version,
        block.children.len()
    );

    Ok((data, block))
}

/// Describe the header and children of a container file.
pub fn inspect(
    registry: &BlockRegistry,
    path: &Path,
    preview: usize,
) -> Result<InspectReport, ToolError> {
    let (_, block) = read_container(path)?;
    Ok(InspectReport::new(&block, registry, preview))
}

/// Check a container's kind and confirm it rebuilds byte for byte.
///
/// With `expected`, the file signature must match it. The version is checked
/// whenever the file's kind is registered.
pub fn verify(
    registry: &BlockRegistry,
    path: &Path,
    expected: Option<Signature>,
) -> Result<VerifyReport, ToolError> {
    let (data, block) = read_container(path)?;

    let format_error = |source| ToolError::Format {
        path: path.to_path_buf(),
        source,
    };

    let descriptor = match expected {
        Some(signature) => match registry.lookup(signature) {
            Some(desc) => Some(*desc),
            None => {
                warn!("Kind '{}' is not registered; only checking the signature", signature);
                Some(BlockDescriptor::new(signature, block.version, "Unregistered"))
            }
        },
        None => block.descriptor_in(registry).copied(),
    };

    match &descriptor {
        Some(desc) => check_header(desc, block.signature, block.version).map_err(format_error)?,
        None => warn!(
            "Kind '{}' is not registered; skipping version check",
            block.signature
        ),
    }

    let rebuilt = block.build().map_err(format_error)?;
    if let Some(offset) = first_difference(&data, &rebuilt) {
        return Err(ToolError::RoundTrip {
            path: path.to_path_buf(),
            offset,
        });
    }

    if data.len() > rebuilt.len() {
        info!(
            "{} has {} byte(s) of trailing data after the container",
            path.display(),
            data.len() - rebuilt.len()
        );
    }

    Ok(VerifyReport {
        path: path.to_path_buf(),
        signature: block.signature.to_string(),
        version: block.version.to_string(),
        blocks: block.children.len(),
        registered: registry.lookup(block.signature).is_some(),
    })
}

/// Offset of the first byte where `rebuilt` disagrees with the start of `data`
fn first_difference(data: &[u8], rebuilt: &[u8]) -> Option<usize> {
    match data.iter().zip(rebuilt).position(|(a, b)| a != b) {
        Some(offset) => Some(offset),
        None if rebuilt.len() > data.len() => Some(data.len()),
        None => None,
    }
}

/// Build a container from payload files and write it to `output`.
pub fn pack(
    descriptor: &BlockDescriptor,
    blocks: &[ChildSpec],
    output: &Path,
) -> Result<PackReport, ToolError> {
    let mut children = Vec::with_capacity(blocks.len());
    for spec in blocks {
        let payload = std::fs::read(&spec.path).map_err(|source| ToolError::Read {
            path: spec.path.clone(),
            source,
        })?;
        debug!(
            "Adding '{}' block from {} ({} bytes)",
            spec.signature,
            spec.path.display(),
            payload.len()
        );
        children.push(RawBlock::new(spec.signature, payload));
    }

    let block = AnyHeaderBlock::new(descriptor.signature, descriptor.version, children);
    let data = block.build()?;

    std::fs::write(output, &data).map_err(|source| ToolError::Write {
        path: output.to_path_buf(),
        source,
    })?;

    info!("Packed {} block(s) into {}", blocks.len(), output.display());

    Ok(PackReport {
        output: output.to_path_buf(),
        signature: descriptor.signature.to_string(),
        version: descriptor.version.to_string(),
        blocks: blocks.len(),
        size: data.len() as u64,
    })
}

/// File name used for a child payload: `NN_SIG.bin`.
///
/// Signature bytes that aren't ASCII alphanumerics become `_`.
pub fn payload_file_name(index: usize, signature: Signature) -> String {
    let sig: String = signature
        .as_bytes()
        .iter()
        .map(|&b| {
            if b.is_ascii_alphanumeric() {
                char::from(b)
            } else {
                '_'
            }
        })
        .collect();
    format!("{index:02}_{sig}.bin")
}

/// Write each child payload of a container into `output_dir`.
pub fn unpack(path: &Path, output_dir: &Path) -> Result<UnpackReport, ToolError> {
    let (_, block) = read_container(path)?;

    std::fs::create_dir_all(output_dir).map_err(|source| ToolError::Write {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = Vec::with_capacity(block.children.len());
    for (index, child) in block.children.iter().enumerate() {
        let file = output_dir.join(payload_file_name(index, child.signature));
        std::fs::write(&file, &child.payload).map_err(|source| ToolError::Write {
            path: file.clone(),
            source,
        })?;
        files.push(file);
    }

    info!(
        "Unpacked {} block(s) from {} into {}",
        files.len(),
        path.display(),
        output_dir.display()
    );

    Ok(UnpackReport { files })
}
