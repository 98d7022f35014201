//! Read command implementation

use crate::error::{CliError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use memslot_core::sfdp::{self, DataSelect};
use memslot_core::{memslot, DeviceProfile};
use memslot_dummy::DummyFlash;
use std::path::Path;

/// Default chunk size for reading (4 KiB)
const READ_CHUNK_SIZE: usize = 4096;

/// Run the read command
pub fn run_read(
    image: &Path,
    contents: &Path,
    offset: u32,
    length: Option<u32>,
    output: &Path,
    data_select: DataSelect,
) -> Result<()> {
    let contents = super::read_file(contents)?;
    let mut device = super::open_device(image, Some(contents.as_slice()))?;
    let profile = sfdp::detect(&mut device, data_select)?;

    let device_size = profile
        .size_bytes()
        .ok_or_else(|| CliError::UnaddressableSize(profile.memory_size.to_string()))?;
    let limit = device_size.min(contents.len() as u64);

    let length = match length {
        Some(len) => len as u64,
        None => limit.saturating_sub(offset as u64),
    };
    if offset as u64 + length > limit {
        return Err(CliError::OutOfBounds {
            offset,
            length,
            limit,
        });
    }

    println!(
        "Reading {} bytes at 0x{:08X} with {} read ({})",
        length, offset, profile.read_mode, profile.read
    );

    let data = read_with_progress(&mut device, &profile, offset, length as usize)?;

    std::fs::write(output, &data).map_err(|source| CliError::WriteFile {
        path: output.to_path_buf(),
        source,
    })?;

    println!("Wrote {} bytes to {:?}", data.len(), output);

    Ok(())
}

/// Read a range with progress bar
fn read_with_progress(
    device: &mut DummyFlash,
    profile: &DeviceProfile,
    offset: u32,
    length: usize,
) -> Result<Vec<u8>> {
    let mut data = vec![0u8; length];

    let pb = ProgressBar::new(length as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")?
            .progress_chars("#>-"),
    );

    for (i, chunk) in data.chunks_mut(READ_CHUNK_SIZE).enumerate() {
        let address = offset + (i * READ_CHUNK_SIZE) as u32;
        memslot::read(device, profile, address, chunk)?;
        pb.inc(chunk.len() as u64);
    }

    pb.finish_with_message("Read complete");

    Ok(data)
}
