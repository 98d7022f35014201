//! Error types for the memslot CLI

use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by CLI commands
#[derive(Debug, Error)]
pub enum CliError {
    /// Detection or a flash command failed
    #[error("{0}")]
    Core(#[from] memslot_core::Error),

    /// Failed to read an input file
    #[error("Failed to read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the output file
    #[error("Failed to write {}: {source}", .path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Requested range lies outside the device or its contents
    #[error("Range 0x{offset:08X}+0x{length:X} exceeds {limit} available bytes")]
    OutOfBounds { offset: u32, length: u64, limit: u64 },

    /// Device density cannot be represented on this host
    #[error("Device size {0} is not addressable")]
    UnaddressableSize(String),

    /// Profile could not be serialized
    #[error("Failed to serialize profile: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Progress bar template is invalid
    #[error("Invalid progress template: {0}")]
    Template(#[from] indicatif::style::TemplateError),
}

/// Result type for CLI commands
pub type Result<T> = std::result::Result<T, CliError>;
