//! Read-mode selection
//!
//! Picks the widest fast read the device advertises that the controller
//! wiring can carry, and turns its table fields into a command descriptor.

use super::bfpt::{BasicFlashTable, FastReadParams, FastReadSupport};
use crate::spi::{opcodes, BusWidth, CommandDescriptor, ModeByte};

/// Data lines of the controller the device is connected to
///
/// `Sel0` and `Sel2` select four lines and allow quad reads. `Sel1` and
/// `Sel3` select two lines and limit the device to dual and single reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum DataSelect {
    /// Data lines 0-3
    #[default]
    Sel0,
    /// Data lines 2-3
    Sel1,
    /// Data lines 4-7
    Sel2,
    /// Data lines 6-7
    Sel3,
}

impl DataSelect {
    /// Returns true if four data lines are wired
    pub fn is_quad_capable(&self) -> bool {
        matches!(self, Self::Sel0 | Self::Sel2)
    }
}

/// Read command variant, named command-address-data widths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum ReadModeVariant {
    /// 1-4-4 fast read
    Quad144,
    /// 1-1-4 fast read
    Quad114,
    /// 1-2-2 fast read
    Dual122,
    /// 1-1-2 fast read
    Dual112,
    /// 1-1-1 read (0x03)
    Single111,
}

impl ReadModeVariant {
    /// Address and data widths, and the width of the mode byte
    fn widths(&self) -> (BusWidth, BusWidth, BusWidth) {
        match self {
            Self::Quad144 => (BusWidth::Quad, BusWidth::Quad, BusWidth::Quad),
            Self::Quad114 => (BusWidth::Single, BusWidth::Quad, BusWidth::Single),
            Self::Dual122 => (BusWidth::Dual, BusWidth::Dual, BusWidth::Dual),
            Self::Dual112 => (BusWidth::Single, BusWidth::Dual, BusWidth::Single),
            Self::Single111 => (BusWidth::Single, BusWidth::Single, BusWidth::Single),
        }
    }

    fn params(&self, table: &BasicFlashTable) -> Option<FastReadParams> {
        match self {
            Self::Quad144 => Some(table.read_144),
            Self::Quad114 => Some(table.read_114),
            Self::Dual122 => Some(table.read_122),
            Self::Dual112 => Some(table.read_112),
            Self::Single111 => None,
        }
    }

    /// Build the read command descriptor from the table fields
    pub fn command(&self, table: &BasicFlashTable) -> CommandDescriptor {
        let Some(params) = self.params(table) else {
            return CommandDescriptor::read_single();
        };
        let (address, data, mode_width) = self.widths();
        let mode = (params.mode_clocks != 0).then_some(ModeByte {
            value: opcodes::MODE_ENHANCED_DISABLED,
            width: mode_width,
        });

        CommandDescriptor::simple(params.opcode)
            .with_widths(address, data)
            .with_mode(mode)
            .with_dummy_cycles(params.dummy_clocks)
    }
}

impl core::fmt::Display for ReadModeVariant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Quad144 => "1-4-4",
            Self::Quad114 => "1-1-4",
            Self::Dual122 => "1-2-2",
            Self::Dual112 => "1-1-2",
            Self::Single111 => "1-1-1",
        };
        f.write_str(name)
    }
}

/// Choose the read variant for the given wiring
///
/// Quad-capable wiring tries 1-4-4 then 1-1-4. Every wiring then tries
/// 1-2-2 then 1-1-2, and falls back to 1-1-1.
pub fn select_read_mode(table: &BasicFlashTable, data_select: DataSelect) -> ReadModeVariant {
    let quad: &[(FastReadSupport, ReadModeVariant)] = &[
        (FastReadSupport::READ_1_4_4, ReadModeVariant::Quad144),
        (FastReadSupport::READ_1_1_4, ReadModeVariant::Quad114),
    ];
    let dual: &[(FastReadSupport, ReadModeVariant)] = &[
        (FastReadSupport::READ_1_2_2, ReadModeVariant::Dual122),
        (FastReadSupport::READ_1_1_2, ReadModeVariant::Dual112),
    ];

    let mut ladder = data_select
        .is_quad_capable()
        .then_some(quad)
        .into_iter()
        .flatten()
        .chain(dual);

    let variant = ladder
        .find_map(|(flag, variant)| table.fast_read.contains(*flag).then_some(*variant))
        .unwrap_or(ReadModeVariant::Single111);

    log::debug!("Selected {} read for {:?} wiring", variant, data_select);
    variant
}
