//! CLI argument parsing

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Parse a string as a hex or decimal u32
pub fn parse_hex_u32(s: &str) -> Result<u32, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u32>().map_err(|e| format!("Invalid number: {}", e))
    }
}

#[derive(Parser)]
#[command(name = "memslot")]
#[command(author, version, about = "SFDP autodetection for serial flash", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Controller data lines the device is wired to
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum DataSelectArg {
    /// Data lines 0-3 (quad capable)
    #[default]
    Sel0,
    /// Data lines 2-3 (dual only)
    Sel1,
    /// Data lines 4-7 (quad capable)
    Sel2,
    /// Data lines 6-7 (dual only)
    Sel3,
}

/// Output format for the detected profile
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human readable summary
    #[default]
    Text,
    /// TOML document
    Toml,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect device capabilities from an SFDP image
    Detect {
        /// SFDP image (the SFDP address space starting at 0)
        #[arg(short, long)]
        image: PathBuf,

        /// Controller data lines the device is wired to
        #[arg(short, long, value_enum, default_value_t)]
        data_select: DataSelectArg,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// List the SFDP parameter headers of an image
    Headers {
        /// SFDP image (the SFDP address space starting at 0)
        #[arg(short, long)]
        image: PathBuf,
    },

    /// Read flash contents through the detected read command
    Read {
        /// SFDP image (the SFDP address space starting at 0)
        #[arg(short, long)]
        image: PathBuf,

        /// Flash contents served by the emulated device
        #[arg(short, long)]
        contents: PathBuf,

        /// Start address (hex with 0x prefix, or decimal)
        #[arg(long, value_parser = parse_hex_u32, default_value = "0")]
        offset: u32,

        /// Number of bytes to read (defaults to the end of the device)
        #[arg(short, long, value_parser = parse_hex_u32)]
        length: Option<u32>,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Controller data lines the device is wired to
        #[arg(short, long, value_enum, default_value_t)]
        data_select: DataSelectArg,
    },
}
