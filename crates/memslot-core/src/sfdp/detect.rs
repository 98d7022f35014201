//! SFDP detection
//!
//! Sequences the header scanner, locator and decoders against a source of
//! SFDP bytes and assembles a [`DeviceProfile`].

use super::bfpt::BasicFlashTable;
use super::buffer::SfdpBuffer;
use super::header::scan_header;
use super::locator::locate_table;
use super::read_mode::DataSelect;
use super::types::{SfdpHeader, PARAM_ID_BASIC, SFDP_HEADER_SIZE};
use crate::error::Result;
use crate::memslot;
use crate::profile::DeviceProfile;
use crate::transport::Transport;

/// Read and validate the SFDP header and all parameter headers
///
/// The returned buffer holds the header followed by every parameter header
/// and can be walked with [`parameter_headers`](super::parameter_headers).
pub fn read_header_area<T: Transport + ?Sized>(
    transport: &mut T,
) -> Result<(SfdpHeader, SfdpBuffer)> {
    header_area_with(|address, buf| memslot::read_sfdp(transport, address, buf))
}

/// Detect the device behind `transport`
///
/// Reads the SFDP header, the parameter headers and the Basic Flash
/// Parameter Table, then builds the profile for the given wiring.
pub fn detect<T: Transport + ?Sized>(
    transport: &mut T,
    data_select: DataSelect,
) -> Result<DeviceProfile> {
    detect_with(
        |address, buf| memslot::read_sfdp(transport, address, buf),
        data_select,
    )
}

fn header_area_with<F>(mut read: F) -> Result<(SfdpHeader, SfdpBuffer)>
where
    F: FnMut(u32, &mut [u8]) -> Result<()>,
{
    let mut buffer = SfdpBuffer::zeroed(SFDP_HEADER_SIZE)?;
    log::debug!("Reading SFDP header (8 bytes at address 0x00)...");
    read(0, buffer.as_mut_slice())?;
    let header = scan_header(&buffer)?;

    let mut buffer = SfdpBuffer::zeroed(header.header_area_len())?;
    read(0, buffer.as_mut_slice())?;

    Ok((header, buffer))
}

pub(crate) fn detect_with<F>(mut read: F, data_select: DataSelect) -> Result<DeviceProfile>
where
    F: FnMut(u32, &mut [u8]) -> Result<()>,
{
    let (header, buffer) = header_area_with(&mut read)?;
    let table = locate_table(&buffer, &header, PARAM_ID_BASIC)?;

    let mut bfpt = SfdpBuffer::zeroed(table.length)?;
    read(table.address, bfpt.as_mut_slice())?;
    let bfpt = BasicFlashTable::decode(&bfpt)?;

    DeviceProfile::from_table(header.revision, &bfpt, data_select)
}
