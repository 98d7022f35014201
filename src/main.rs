//! memslot - SFDP autodetection for serial flash memory slots
//!
//! Runs JEDEC SFDP detection against an SFDP image served by an in-memory
//! emulated device and reports the resulting capability profile.
//!
//! # Commands
//!
//! - `detect` prints the profile as text or TOML
//! - `headers` lists the parameter headers of the image
//! - `read` reads flash contents through the detected read command

mod cli;
mod commands;
mod error;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // RUST_LOG still overrides the level picked by -v
    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Detect {
            image,
            data_select,
            format,
        } => commands::detect::run_detect(&image, data_select.into(), format)?,
        Commands::Headers { image } => commands::headers::run_headers(&image)?,
        Commands::Read {
            image,
            contents,
            offset,
            length,
            output,
            data_select,
        } => commands::read::run_read(
            &image,
            &contents,
            offset,
            length,
            &output,
            data_select.into(),
        )?,
    }

    Ok(())
}
