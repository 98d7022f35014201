//! Erase type selection and timing decode
//!
//! All times are worst-case bounds in microseconds:
//! `(count + 1) * unit * 2 * (multiplier + 1)`, where `multiplier` is the
//! maximum-time multiplier in DWORD 10 bits 3:0.

use super::bfpt::{BasicFlashTable, EraseSlot, ERASE_TYPE_COUNT};
use crate::error::{Error, Result};

/// Bitfield extraction helper macro.
///
/// `bits!(word, length, offset)` extracts `length` number of bits at offset `offset`.
macro_rules! bits {
    ($d:expr, $n:expr, $o:expr) => {
        (($d as u64) >> $o) & ((1u64 << $n) - 1)
    };
}

/// Byte offset of the first erase opcode within the table
const ERASE_OPCODE_BASE: usize = 0x1D;
/// Distance between two erase opcodes
const ERASE_OPCODE_STRIDE: usize = 2;
/// Width of one erase-type typical time field in DWORD 10
const ERASE_TIME_FIELD_BITS: u32 = 7;
/// Offset of the first erase-type typical time field in DWORD 10
const ERASE_TIME_FIELD_BASE: u32 = 4;

/// Sector erase time units (1 ms, 16 ms, 128 ms, 1 s)
const SECTOR_ERASE_UNITS_US: [u64; 4] = [1_000, 16_000, 128_000, 1_000_000];
/// Chip erase time units (16 ms, 256 ms, 4 s, 64 s)
const CHIP_ERASE_UNITS_US: [u64; 4] = [16_000, 256_000, 4_000_000, 64_000_000];
/// Page program time units (8 us, 64 us)
const PAGE_PROGRAM_UNITS_US: [u64; 2] = [8, 64];

/// Erase type chosen for sector erase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EraseSelection {
    /// Zero-based erase type index
    pub index: usize,
    /// Erase opcode
    pub opcode: u8,
    /// Erase size in bytes
    pub size: u32,
}

/// Worst-case times for the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timings {
    /// Sector erase, for the selected erase type
    pub erase_time_us: u64,
    /// Chip erase
    pub chip_erase_time_us: u64,
    /// Page program
    pub program_time_us: u64,
}

/// Pick the first used erase type
pub fn select_erase_type(table: &BasicFlashTable) -> Result<EraseSelection> {
    let slot: &EraseSlot = table
        .erase_slots
        .iter()
        .find(|slot| slot.is_used())
        .ok_or(Error::CommandNotFound)?;

    if slot.size_exponent >= 32 {
        log::debug!("Erase size exponent {} out of range", slot.size_exponent);
        return Err(Error::MalformedTable);
    }

    let index = slot.opcode_offset.saturating_sub(ERASE_OPCODE_BASE) / ERASE_OPCODE_STRIDE;
    let selection = EraseSelection {
        index,
        opcode: slot.opcode,
        size: 1u32 << slot.size_exponent,
    };

    log::debug!(
        "Sector erase: type {} opcode 0x{:02X}, {} bytes",
        index + 1,
        selection.opcode,
        selection.size
    );

    Ok(selection)
}

fn max_time_us(count: u64, unit_us: u64, multiplier: u64) -> u64 {
    (count + 1) * unit_us * 2 * (multiplier + 1)
}

fn multiplier(erase_timing: u32) -> u64 {
    bits!(erase_timing, 4, 0)
}

/// Worst-case sector erase time for erase type `index`
///
/// Returns [`Error::BadParam`] for an index past the fourth erase type.
pub fn sector_erase_time_us(erase_timing: u32, index: usize) -> Result<u64> {
    if index >= ERASE_TYPE_COUNT {
        return Err(Error::BadParam);
    }
    let offset = ERASE_TIME_FIELD_BASE + ERASE_TIME_FIELD_BITS * index as u32;
    let count = bits!(erase_timing, 5, offset);
    let unit = bits!(erase_timing, 2, offset + 5) as usize;
    Ok(max_time_us(count, SECTOR_ERASE_UNITS_US[unit], multiplier(erase_timing)))
}

/// Worst-case chip erase time
pub fn chip_erase_time_us(erase_timing: u32, program_timing: u32) -> u64 {
    let count = bits!(program_timing, 5, 24);
    let unit = bits!(program_timing, 2, 29) as usize;
    max_time_us(count, CHIP_ERASE_UNITS_US[unit], multiplier(erase_timing))
}

/// Worst-case page program time
pub fn program_time_us(erase_timing: u32, program_timing: u32) -> u64 {
    let count = bits!(program_timing, 5, 8);
    let unit = bits!(program_timing, 1, 13) as usize;
    max_time_us(count, PAGE_PROGRAM_UNITS_US[unit], multiplier(erase_timing))
}

/// Decode all three bounds for the given erase type
pub fn decode_timings(table: &BasicFlashTable, erase: &EraseSelection) -> Result<Timings> {
    let timings = Timings {
        erase_time_us: sector_erase_time_us(table.erase_timing, erase.index)?,
        chip_erase_time_us: chip_erase_time_us(table.erase_timing, table.program_timing),
        program_time_us: program_time_us(table.erase_timing, table.program_timing),
    };
    log::debug!("Timings: {:?}", timings);
    Ok(timings)
}
