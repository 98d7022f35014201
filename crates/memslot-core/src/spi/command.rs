//! Command descriptor

use super::{opcodes, BusWidth};

/// Mode byte sent between the address and the dummy phase
///
/// Fast read variants that declare mode clocks in SFDP expect this byte;
/// it selects whether the device stays in continuous-read mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct ModeByte {
    /// The mode value
    pub value: u8,
    /// Width the mode byte is sent on
    pub width: BusWidth,
}

/// Describes how one flash command is put on the bus
///
/// Unlike a transaction, a descriptor carries no address or data. It is
/// produced once by detection and reused for every operation of its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandDescriptor {
    /// The opcode byte
    pub opcode: u8,
    /// Width of the opcode phase
    pub command_width: BusWidth,
    /// Width of the address phase
    pub address_width: BusWidth,
    /// Optional mode byte
    pub mode: Option<ModeByte>,
    /// Number of dummy cycles after address (and mode)
    pub dummy_cycles: u8,
    /// Width of the data phase
    pub data_width: BusWidth,
}

impl CommandDescriptor {
    /// Create a single-wire command with no mode byte and no dummy cycles
    pub const fn simple(opcode: u8) -> Self {
        Self {
            opcode,
            command_width: BusWidth::Single,
            address_width: BusWidth::Single,
            mode: None,
            dummy_cycles: 0,
            data_width: BusWidth::Single,
        }
    }

    /// Set the address and data widths
    pub const fn with_widths(mut self, address: BusWidth, data: BusWidth) -> Self {
        self.address_width = address;
        self.data_width = data;
        self
    }

    /// Set the mode byte
    pub const fn with_mode(mut self, mode: Option<ModeByte>) -> Self {
        self.mode = mode;
        self
    }

    /// Set the number of dummy cycles
    pub const fn with_dummy_cycles(mut self, cycles: u8) -> Self {
        self.dummy_cycles = cycles;
        self
    }

    /// 1-1-1 read, supported by every SFDP compliant device
    pub const fn read_single() -> Self {
        Self::simple(opcodes::READ)
    }

    /// Read SFDP with its mandatory 8 dummy cycles
    pub const fn read_sfdp() -> Self {
        Self::simple(opcodes::RDSFDP).with_dummy_cycles(opcodes::RDSFDP_DUMMY_CYCLES)
    }

    /// Write Enable
    pub const fn write_enable() -> Self {
        Self::simple(opcodes::WREN)
    }

    /// Write Disable
    pub const fn write_disable() -> Self {
        Self::simple(opcodes::WRDI)
    }

    /// 1-1-1 Page Program
    pub const fn program() -> Self {
        Self::simple(opcodes::PP)
    }

    /// Chip Erase
    pub const fn chip_erase() -> Self {
        Self::simple(opcodes::CE_60)
    }

    /// Read the status register holding the busy (WIP) bit
    pub const fn read_status() -> Self {
        Self::simple(opcodes::RDSR)
    }

    /// Returns true if any phase needs more than one line
    pub fn is_multi_io(&self) -> bool {
        self.command_width.is_multi_io()
            || self.address_width.is_multi_io()
            || self.data_width.is_multi_io()
            || self.mode.map_or(false, |m| m.width.is_multi_io())
    }
}

impl core::fmt::Display for CommandDescriptor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "0x{:02X} ({}-{}-{}",
            self.opcode, self.command_width, self.address_width, self.data_width
        )?;
        if let Some(mode) = self.mode {
            write!(f, ", mode 0x{:02X} x{}", mode.value, mode.width)?;
        }
        if self.dummy_cycles > 0 {
            write!(f, ", {} dummy", self.dummy_cycles)?;
        }
        write!(f, ")")
    }
}
