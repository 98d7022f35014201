//! CLI command implementations
//!
//! Every command runs against the in-memory emulated device: the SFDP image
//! given on the command line is served through RDSFDP, so detection follows
//! exactly the bus sequence it would use on hardware.

pub mod detect;
pub mod headers;
pub mod read;

use crate::cli::DataSelectArg;
use crate::error::{CliError, Result};
use memslot_core::sfdp::DataSelect;
use memslot_dummy::{DummyConfig, DummyFlash};
use std::path::Path;

impl From<DataSelectArg> for DataSelect {
    fn from(arg: DataSelectArg) -> Self {
        match arg {
            DataSelectArg::Sel0 => DataSelect::Sel0,
            DataSelectArg::Sel1 => DataSelect::Sel1,
            DataSelectArg::Sel2 => DataSelect::Sel2,
            DataSelectArg::Sel3 => DataSelect::Sel3,
        }
    }
}

/// Read a whole input file
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| CliError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Build the emulated device serving `image` and, optionally, `contents`
pub fn open_device(image: &Path, contents: Option<&[u8]>) -> Result<DummyFlash> {
    let sfdp = read_file(image)?;
    log::info!("Loaded {} byte SFDP image from {}", sfdp.len(), image.display());

    let config = DummyConfig {
        size: contents.map_or(0, <[u8]>::len),
        sfdp,
        ..DummyConfig::default()
    };
    Ok(DummyFlash::with_data(config, contents.unwrap_or_default()))
}
