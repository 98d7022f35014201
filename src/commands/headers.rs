//! Headers command implementation

use crate::error::Result;
use memslot_core::sfdp;
use std::path::Path;

/// Run the headers command
pub fn run_headers(image: &Path) -> Result<()> {
    let mut device = super::open_device(image, None)?;
    let (header, buffer) = sfdp::read_header_area(&mut device)?;

    println!(
        "SFDP revision {}, {} parameter header(s), access protocol 0x{:02X}",
        header.revision,
        header.num_param_headers(),
        header.access_protocol
    );
    println!();
    println!(
        "{:>3}  {:<6}  {:<5}  {:>6}  {:<8}  Name",
        "#", "ID", "Rev", "Bytes", "Pointer"
    );

    for (index, param) in sfdp::parameter_headers(&buffer, &header).enumerate() {
        let param = param?;
        println!(
            "{:>3}  0x{:04X}  {:<5}  {:>6}  0x{:06X}  {}",
            index,
            param.id,
            param.revision.to_string(),
            param.length_bytes(),
            param.table_pointer,
            param.name().unwrap_or(if param.is_jedec() { "JEDEC" } else { "Vendor" })
        );
    }

    Ok(())
}
