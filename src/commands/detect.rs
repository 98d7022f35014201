//! Detect command implementation

use crate::cli::OutputFormat;
use crate::error::Result;
use memslot_core::sfdp::{self, DataSelect};
use memslot_core::DeviceProfile;
use std::path::Path;

/// Run the detect command
pub fn run_detect(image: &Path, data_select: DataSelect, format: OutputFormat) -> Result<()> {
    let mut device = super::open_device(image, None)?;
    let profile = sfdp::detect(&mut device, data_select)?;

    match format {
        OutputFormat::Text => print_profile(&profile),
        OutputFormat::Toml => print!("{}", to_toml(&profile)?),
    }

    Ok(())
}

/// Serialize a profile as a TOML document
pub fn to_toml(profile: &DeviceProfile) -> Result<String> {
    Ok(toml::to_string_pretty(profile)?)
}

fn print_profile(profile: &DeviceProfile) {
    println!("SFDP revision:   {}", profile.revision);
    println!(
        "Memory size:     {} (raw 0x{:08X})",
        profile.memory_size,
        profile.memory_size.to_raw()
    );
    match profile.address_bytes {
        Some(n) => println!("Address bytes:   {}", n),
        None => println!("Address bytes:   unknown"),
    }
    println!("Page size:       {} bytes", profile.page_size);
    println!("Erase size:      {} bytes", profile.erase_size);
    println!();
    println!("Read command:    {} {}", profile.read_mode, profile.read);
    println!("Program:         {}", profile.program);
    println!("Sector erase:    {}", profile.sector_erase);
    println!("Chip erase:      {}", profile.chip_erase);
    println!("Write enable:    {}", profile.write_enable);
    println!("Write disable:   {}", profile.write_disable);
    println!(
        "Read status:     {} (busy mask 0x{:02X})",
        profile.read_status, profile.busy_mask
    );
    match profile.quad_enable {
        Some(qe) => println!("Quad enable:     {}", qe),
        None => println!("Quad enable:     unavailable"),
    }
    println!();
    println!("Max sector erase time: {} us", profile.erase_time_us);
    println!("Max chip erase time:   {} us", profile.chip_erase_time_us);
    println!("Max page program time: {} us", profile.program_time_us);
}

#[cfg(test)]
mod tests {
    use super::*;
    use memslot_dummy::DEFAULT_SFDP;

    #[test]
    fn test_toml_export() {
        let profile = DeviceProfile::from_sfdp_image(&DEFAULT_SFDP, DataSelect::Sel0).unwrap();
        let doc = to_toml(&profile).unwrap();
        assert!(doc.contains("read_mode = \"Quad144\""));
        assert!(doc.contains("page_size = 256"));
        assert!(doc.contains("erase_time_us = 16000"));
    }
}
