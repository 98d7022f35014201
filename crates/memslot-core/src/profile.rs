//! Device capability profile
//!
//! The profile is everything the memory-slot layer needs to drive a device:
//! addressing, geometry, command descriptors and worst-case timings. It is
//! assembled once from a decoded Basic Flash Parameter Table.

use crate::error::{Error, Result};
use crate::sfdp::{
    self, select_erase_type, select_read_mode, BasicFlashTable, DataSelect, MemorySize,
    QuadEnableStrategy, ReadModeVariant, SfdpRevision,
};
use crate::spi::{opcodes, AddressWidth, CommandDescriptor};

/// Capabilities discovered from SFDP
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceProfile {
    /// SFDP revision of the device
    pub revision: SfdpRevision,
    /// Address bytes (3 or 4), `None` if the device reported a reserved code
    pub address_bytes: Option<u8>,
    /// Device density
    pub memory_size: MemorySize,
    /// Program page size in bytes
    pub page_size: u32,
    /// Size erased by `sector_erase`, in bytes
    pub erase_size: u32,
    /// Busy bit mask in the status register read by `read_status`
    pub busy_mask: u8,
    /// Quad enable method, `None` if the requirement code is reserved
    pub quad_enable: Option<QuadEnableStrategy>,
    /// Read variant chosen for `read`
    pub read_mode: ReadModeVariant,
    /// Read command
    pub read: CommandDescriptor,
    /// Write Enable command
    pub write_enable: CommandDescriptor,
    /// Write Disable command
    pub write_disable: CommandDescriptor,
    /// Page Program command
    pub program: CommandDescriptor,
    /// Chip Erase command
    pub chip_erase: CommandDescriptor,
    /// Sector Erase command
    pub sector_erase: CommandDescriptor,
    /// Read Status command holding the busy bit
    pub read_status: CommandDescriptor,
    /// Worst-case sector erase time
    pub erase_time_us: u64,
    /// Worst-case chip erase time
    pub chip_erase_time_us: u64,
    /// Worst-case page program time
    pub program_time_us: u64,
}

impl DeviceProfile {
    /// Assemble a profile from a decoded Basic Flash Parameter Table
    pub fn from_table(
        revision: SfdpRevision,
        table: &BasicFlashTable,
        data_select: DataSelect,
    ) -> Result<Self> {
        let address_bytes = table.address_bytes();
        if address_bytes.is_none() {
            log::warn!(
                "Reserved address-byte code {}, addressed commands unavailable",
                table.address_code
            );
        }

        let erase = select_erase_type(table)?;
        let timings = sfdp::decode_timings(table, &erase)?;

        let quad_enable = match QuadEnableStrategy::from_code(table.quad_enable_code) {
            Ok(qe) => Some(qe),
            Err(e) => {
                log::warn!(
                    "Quad enable requirement {} not usable: {}",
                    table.quad_enable_code,
                    e
                );
                None
            }
        };

        let read_mode = select_read_mode(table, data_select);

        Ok(Self {
            revision,
            address_bytes,
            memory_size: table.density,
            page_size: table.page_size(),
            erase_size: erase.size,
            busy_mask: opcodes::SR1_WIP,
            quad_enable,
            read_mode,
            read: read_mode.command(table),
            write_enable: CommandDescriptor::write_enable(),
            write_disable: CommandDescriptor::write_disable(),
            program: CommandDescriptor::program(),
            chip_erase: CommandDescriptor::chip_erase(),
            sector_erase: CommandDescriptor::simple(erase.opcode),
            read_status: CommandDescriptor::read_status(),
            erase_time_us: timings.erase_time_us,
            chip_erase_time_us: timings.chip_erase_time_us,
            program_time_us: timings.program_time_us,
        })
    }

    /// Run detection over an SFDP image held in memory
    ///
    /// `image` is the SFDP address space starting at address 0.
    pub fn from_sfdp_image(image: &[u8], data_select: DataSelect) -> Result<Self> {
        sfdp::detect_with(
            |address, buf| {
                let start = address as usize;
                let src = start
                    .checked_add(buf.len())
                    .and_then(|end| image.get(start..end))
                    .ok_or(Error::OutOfRange {
                        offset: start,
                        len: image.len(),
                    })?;
                buf.copy_from_slice(src);
                Ok(())
            },
            data_select,
        )
    }

    /// Address width for addressed commands
    ///
    /// Fails with [`Error::BadParam`] when the address size is unknown.
    pub fn address_width(&self) -> Result<AddressWidth> {
        match self.address_bytes {
            Some(3) => Ok(AddressWidth::ThreeByte),
            Some(4) => Ok(AddressWidth::FourByte),
            _ => Err(Error::BadParam),
        }
    }

    /// Device size in bytes, if representable
    pub fn size_bytes(&self) -> Option<u64> {
        self.memory_size.bytes()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::sfdp::bfpt::tests::BFPT_8MIB;
    use crate::spi::BusWidth;

    /// SFDP header, one BFPT header pointing at 0x10, then the table
    pub(crate) fn sfdp_image() -> [u8; 80] {
        let mut image = [0u8; 80];
        image[..16].copy_from_slice(&[
            b'S', b'F', b'D', b'P', 0x06, 0x01, 0x00, 0xFF, // header, 1 parameter header
            0x00, 0x06, 0x01, 0x10, 0x10, 0x00, 0x00, 0xFF, // BFPT rev 1.6, 16 DWORDs @ 0x10
        ]);
        image[16..].copy_from_slice(&BFPT_8MIB);
        image
    }

    #[test]
    fn test_profile_from_image() {
        let profile = DeviceProfile::from_sfdp_image(&sfdp_image(), DataSelect::Sel0).unwrap();

        assert_eq!(profile.revision, SfdpRevision::JESD216B);
        assert_eq!(profile.address_bytes, Some(3));
        assert_eq!(profile.address_width(), Ok(AddressWidth::ThreeByte));
        assert_eq!(profile.size_bytes(), Some(8 * 1024 * 1024));
        assert_eq!(profile.page_size, 256);
        assert_eq!(profile.erase_size, 4096);
        assert_eq!(profile.busy_mask, 0x01);
        assert_eq!(profile.quad_enable, Some(QuadEnableStrategy::Sr2Bit1));
        assert_eq!(profile.read_mode, ReadModeVariant::Quad144);
        assert_eq!(profile.read.opcode, 0xEB);
        assert_eq!(profile.read.data_width, BusWidth::Quad);
        assert_eq!(profile.sector_erase.opcode, 0x20);
        assert_eq!(profile.chip_erase.opcode, 0x60);
        assert_eq!(profile.program.opcode, 0x02);
        assert_eq!(profile.read_status.opcode, 0x05);
        assert_eq!(profile.erase_time_us, 16_000);
    }

    #[test]
    fn test_soft_failures() {
        let mut image = sfdp_image();
        // Reserved address code and QER 6
        image[16 + 2] |= 0x06;
        image[16 + 0x3A] = 0x60;

        let profile = DeviceProfile::from_sfdp_image(&image, DataSelect::Sel1).unwrap();
        assert_eq!(profile.address_bytes, None);
        assert_eq!(profile.address_width(), Err(Error::BadParam));
        assert_eq!(profile.quad_enable, None);
        assert_eq!(profile.read_mode, ReadModeVariant::Dual122);
    }

    #[test]
    fn test_hard_failures() {
        let mut image = sfdp_image();
        image[16 + 0x1D] = 0xFF;
        image[16 + 0x1F] = 0xFF;
        image[16 + 0x21] = 0xFF;
        assert_eq!(
            DeviceProfile::from_sfdp_image(&image, DataSelect::Sel0),
            Err(Error::CommandNotFound)
        );

        let image = sfdp_image();
        assert_eq!(
            DeviceProfile::from_sfdp_image(&image[..40], DataSelect::Sel0),
            Err(Error::OutOfRange { offset: 16, len: 40 })
        );

        let mut image = sfdp_image();
        image[4] = 0x05;
        assert_eq!(
            DeviceProfile::from_sfdp_image(&image, DataSelect::Sel0),
            Err(Error::UnsupportedDevice)
        );
    }
}
