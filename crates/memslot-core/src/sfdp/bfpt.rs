//! Basic Flash Parameter Table decoder
//!
//! Decodes the JESD216B subset of the Basic Flash Parameter Table (ID
//! 0xFF00) that the detector needs. Offsets below are byte offsets within
//! the table.

use super::buffer::SfdpBuffer;
use super::types::BFPT_MIN_LEN;
use crate::error::{Error, Result};
use bitflags::bitflags;

// ============================================================================
// Field offsets
// ============================================================================

/// Fast read support and address-byte code
const FAST_READ_SUPPORT: usize = 0x02;
/// Memory density (DWORD 2)
const DENSITY: usize = 0x04;
/// 1-4-4 fast read parameters; the opcode follows at the next byte
const READ_144: usize = 0x08;
/// 1-1-4 fast read parameters
const READ_114: usize = 0x0A;
/// 1-1-2 fast read parameters
const READ_112: usize = 0x0C;
/// 1-2-2 fast read parameters
const READ_122: usize = 0x0E;
/// First erase type (size exponent, opcode follows)
const ERASE_TYPE_1: usize = 0x1C;
/// Erase timing word (DWORD 10)
const ERASE_TIMING: usize = 0x24;
/// Program and chip erase timing word (DWORD 11)
const PROGRAM_TIMING: usize = 0x28;
/// Quad enable requirement byte (DWORD 15)
const QUAD_ENABLE: usize = 0x3A;

/// Number of erase type slots
pub const ERASE_TYPE_COUNT: usize = 4;

// ============================================================================
// Fast read support
// ============================================================================

bitflags! {
    /// Fast read variants advertised in byte 0x02
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FastReadSupport: u8 {
        /// 1-1-2 fast read
        const READ_1_1_2 = 1 << 0;
        /// 1-2-2 fast read
        const READ_1_2_2 = 1 << 4;
        /// 1-4-4 fast read
        const READ_1_4_4 = 1 << 5;
        /// 1-1-4 fast read
        const READ_1_1_4 = 1 << 6;
    }
}

/// Parameters for a fast read command
///
/// Contains the opcode, number of mode clocks, and number of dummy/wait cycles
/// needed for a specific fast read mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FastReadParams {
    /// Instruction opcode
    pub opcode: u8,
    /// Number of mode clock cycles
    pub mode_clocks: u8,
    /// Number of dummy/wait clock cycles before valid output
    pub dummy_clocks: u8,
}

impl FastReadParams {
    /// Parse from the parameter byte and the opcode byte that follows it
    ///
    /// Layout of `params`: [7:5] mode clocks, [4:0] dummy clocks
    pub fn parse(params: u8, opcode: u8) -> Self {
        Self {
            opcode,
            mode_clocks: (params >> 5) & 0x07,
            dummy_clocks: params & 0x1F,
        }
    }

    fn read_at(table: &SfdpBuffer, offset: usize) -> Result<Self> {
        Ok(Self::parse(
            table.read_u8_at(offset)?,
            table.read_u8_at(offset + 1)?,
        ))
    }
}

// ============================================================================
// Memory size
// ============================================================================

/// Device density
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum MemorySize {
    /// Size in bytes (densities up to 2 Gibit)
    Bytes(u32),
    /// Size is 2^exponent bytes
    PowerOfTwo(u32),
}

impl MemorySize {
    /// Tag marking a power-of-two size in the raw encoding
    pub const POWER_OF_TWO_FLAG: u32 = 0x8000_0000;

    /// Decode DWORD 2 of the Basic Flash Parameter Table
    ///
    /// Bit 31 clear: bits 30:0 hold the density in bits minus one.
    /// Bit 31 set: bits 30:0 hold N with a density of 2^N bits.
    pub fn from_density(dword: u32) -> Result<Self> {
        if dword & Self::POWER_OF_TWO_FLAG == 0 {
            let bits = dword as u64 + 1;
            Ok(Self::Bytes((bits / 8) as u32))
        } else {
            let n = dword & !Self::POWER_OF_TWO_FLAG;
            if n < 3 {
                log::debug!("Density exponent {} below one byte", n);
                return Err(Error::MalformedTable);
            }
            Ok(Self::PowerOfTwo(n - 3))
        }
    }

    /// Size in bytes, if representable
    pub fn bytes(&self) -> Option<u64> {
        match *self {
            Self::Bytes(b) => Some(b as u64),
            Self::PowerOfTwo(e) => 1u64.checked_shl(e),
        }
    }

    /// Encoding used by register-level configuration: the byte count, or
    /// the exponent tagged with bit 31
    pub fn to_raw(&self) -> u32 {
        match *self {
            Self::Bytes(b) => b,
            Self::PowerOfTwo(e) => e | Self::POWER_OF_TWO_FLAG,
        }
    }
}

impl core::fmt::Display for MemorySize {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.bytes() {
            Some(b) if b >= 1024 * 1024 && b % (1024 * 1024) == 0 => {
                write!(f, "{} MiB", b / (1024 * 1024))
            }
            Some(b) if b >= 1024 && b % 1024 == 0 => write!(f, "{} KiB", b / 1024),
            Some(b) => write!(f, "{} bytes", b),
            None => write!(f, "2^{} bytes", self.to_raw() & !Self::POWER_OF_TWO_FLAG),
        }
    }
}

// ============================================================================
// Erase types
// ============================================================================

/// One of the four erase type slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EraseSlot {
    /// Erase size exponent (size = 2^N bytes)
    pub size_exponent: u8,
    /// Erase opcode, 0xFF when the slot is unused
    pub opcode: u8,
    /// Byte offset of the opcode within the table
    pub opcode_offset: usize,
}

impl EraseSlot {
    /// Opcode marking an unused slot
    pub const UNUSED: u8 = 0xFF;

    /// Check if this slot describes an erase command
    pub fn is_used(&self) -> bool {
        self.opcode != Self::UNUSED
    }
}

// ============================================================================
// Basic Flash Parameter Table
// ============================================================================

/// Decoded fields of the Basic Flash Parameter Table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasicFlashTable {
    /// Address-byte code from byte 0x02 bits 2:1
    pub address_code: u8,
    /// Advertised fast read variants
    pub fast_read: FastReadSupport,
    /// 1-4-4 fast read parameters
    pub read_144: FastReadParams,
    /// 1-1-4 fast read parameters
    pub read_114: FastReadParams,
    /// 1-1-2 fast read parameters
    pub read_112: FastReadParams,
    /// 1-2-2 fast read parameters
    pub read_122: FastReadParams,
    /// Device density
    pub density: MemorySize,
    /// Erase types 1 to 4
    pub erase_slots: [EraseSlot; ERASE_TYPE_COUNT],
    /// Raw erase timing word (DWORD 10)
    pub erase_timing: u32,
    /// Raw program and chip erase timing word (DWORD 11)
    pub program_timing: u32,
    /// Page size exponent (page size = 2^N bytes)
    pub page_size_exponent: u8,
    /// Quad enable requirement code (0-7)
    pub quad_enable_code: u8,
}

impl BasicFlashTable {
    /// Decode a table read from the SFDP space
    ///
    /// The table must hold at least 16 DWORDs; shorter tables fail with
    /// [`Error::OutOfRange`] on the first missing field.
    pub fn decode(table: &SfdpBuffer) -> Result<Self> {
        if table.len() < BFPT_MIN_LEN {
            log::debug!(
                "Basic Flash Parameter Table is {} bytes, need {}",
                table.len(),
                BFPT_MIN_LEN
            );
            return Err(Error::OutOfRange {
                offset: BFPT_MIN_LEN - 1,
                len: table.len(),
            });
        }

        let support = table.read_u8_at(FAST_READ_SUPPORT)?;

        let mut erase_slots = [EraseSlot::default(); ERASE_TYPE_COUNT];
        for (i, slot) in erase_slots.iter_mut().enumerate() {
            let offset = ERASE_TYPE_1 + i * 2;
            *slot = EraseSlot {
                size_exponent: table.read_u8_at(offset)?,
                opcode: table.read_u8_at(offset + 1)?,
                opcode_offset: offset + 1,
            };
        }

        let decoded = Self {
            address_code: (support >> 1) & 0x03,
            fast_read: FastReadSupport::from_bits_truncate(support),
            read_144: FastReadParams::read_at(table, READ_144)?,
            read_114: FastReadParams::read_at(table, READ_114)?,
            read_112: FastReadParams::read_at(table, READ_112)?,
            read_122: FastReadParams::read_at(table, READ_122)?,
            density: MemorySize::from_density(table.read_u32_le_at(DENSITY)?)?,
            erase_slots,
            erase_timing: table.read_u32_le_at(ERASE_TIMING)?,
            program_timing: table.read_u32_le_at(PROGRAM_TIMING)?,
            page_size_exponent: table.read_u8_at(PROGRAM_TIMING)? >> 4,
            quad_enable_code: (table.read_u8_at(QUAD_ENABLE)? >> 4) & 0x07,
        };

        log::debug!(
            "BFPT: density {}, fast read {:?}, page 2^{}, QER {}",
            decoded.density,
            decoded.fast_read,
            decoded.page_size_exponent,
            decoded.quad_enable_code
        );

        Ok(decoded)
    }

    /// Number of address bytes, or `None` for the reserved code
    ///
    /// Devices that accept 3 or 4 bytes are driven with 3.
    pub fn address_bytes(&self) -> Option<u8> {
        match self.address_code {
            0 | 1 => Some(3),
            2 => Some(4),
            _ => None,
        }
    }

    /// Page size in bytes
    pub fn page_size(&self) -> u32 {
        1u32 << self.page_size_exponent
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 16-DWORD JESD216B table: 8 MiB, 3-byte addressing, all four fast
    /// reads, 4K/32K/64K erase, 256-byte pages, QER 1
    #[rustfmt::skip]
    pub(crate) const BFPT_8MIB: [u8; 64] = [
        0xE5, 0x20, 0xF1, 0xFF, // DWORD 1: 1-1-2, 1-2-2, 1-4-4, 1-1-4
        0xFF, 0xFF, 0xFF, 0x03, // DWORD 2: 64 Mbit
        0x44, 0xEB, 0x08, 0x6B, // DWORD 3: 1-4-4 0xEB (2 mode, 4 dummy), 1-1-4 0x6B (8 dummy)
        0x08, 0x3B, 0x42, 0xBB, // DWORD 4: 1-1-2 0x3B (8 dummy), 1-2-2 0xBB (2 mode, 2 dummy)
        0xEE, 0xFF, 0xFF, 0xFF, // DWORD 5
        0xFF, 0xFF, 0x00, 0x00, // DWORD 6
        0xFF, 0xFF, 0x00, 0xFF, // DWORD 7
        0x0C, 0x20, 0x0F, 0x52, // DWORD 8: 4K 0x20, 32K 0x52
        0x10, 0xD8, 0x00, 0xFF, // DWORD 9: 64K 0xD8, type 4 unused
        0x31, 0x00, 0x00, 0x00, // DWORD 10: multiplier 1, type 1 count 3 unit 1 ms
        0x81, 0x09, 0x00, 0x23, // DWORD 11: page 2^8, program count 9 x 8 us, chip count 3 x 256 ms
        0xFF, 0xFF, 0xFF, 0xFF, // DWORD 12
        0xFF, 0xFF, 0xFF, 0xFF, // DWORD 13
        0xFF, 0xFF, 0xFF, 0xFF, // DWORD 14
        0x00, 0x00, 0x10, 0x00, // DWORD 15: QER 1
        0x00, 0x00, 0x00, 0x00, // DWORD 16
    ];

    fn decode(bytes: &[u8]) -> Result<BasicFlashTable> {
        BasicFlashTable::decode(&SfdpBuffer::from_slice(bytes).unwrap())
    }

    #[test]
    fn test_decode_reference_table() {
        let t = decode(&BFPT_8MIB).unwrap();
        assert_eq!(t.address_bytes(), Some(3));
        assert_eq!(t.density, MemorySize::Bytes(8 * 1024 * 1024));
        assert!(t.fast_read.contains(FastReadSupport::READ_1_4_4));
        assert!(t.fast_read.contains(FastReadSupport::READ_1_1_2));
        assert_eq!(t.read_144, FastReadParams { opcode: 0xEB, mode_clocks: 2, dummy_clocks: 4 });
        assert_eq!(t.read_114, FastReadParams { opcode: 0x6B, mode_clocks: 0, dummy_clocks: 8 });
        assert_eq!(t.read_122, FastReadParams { opcode: 0xBB, mode_clocks: 2, dummy_clocks: 2 });
        assert_eq!(t.erase_slots[0].opcode, 0x20);
        assert_eq!(t.erase_slots[0].opcode_offset, 0x1D);
        assert_eq!(t.erase_slots[2].size_exponent, 16);
        assert!(!t.erase_slots[3].is_used());
        assert_eq!(t.page_size(), 256);
        assert_eq!(t.quad_enable_code, 1);
    }

    #[test]
    fn test_density() {
        assert_eq!(
            MemorySize::from_density(0x7FFF_FFFF).unwrap().bytes(),
            Some(256 * 1024 * 1024)
        );
        assert_eq!(
            MemorySize::from_density(0x00FF_FFFF).unwrap(),
            MemorySize::Bytes(2 * 1024 * 1024)
        );

        // 2^34 bits = 2 GiB
        let big = MemorySize::from_density(0x8000_0022).unwrap();
        assert_eq!(big, MemorySize::PowerOfTwo(31));
        assert_eq!(big.bytes(), Some(1 << 31));
        assert_eq!(big.to_raw(), 0x8000_001F);

        assert_eq!(
            MemorySize::from_density(0x8000_0002),
            Err(Error::MalformedTable)
        );
        assert_eq!(MemorySize::PowerOfTwo(64).bytes(), None);
    }

    #[test]
    fn test_address_codes() {
        let mut bytes = BFPT_8MIB;
        bytes[2] = (bytes[2] & !0x06) | (1 << 1);
        assert_eq!(decode(&bytes).unwrap().address_bytes(), Some(3));
        bytes[2] = (bytes[2] & !0x06) | (2 << 1);
        assert_eq!(decode(&bytes).unwrap().address_bytes(), Some(4));
        bytes[2] |= 0x06;
        assert_eq!(decode(&bytes).unwrap().address_bytes(), None);
    }

    #[test]
    fn test_short_table() {
        // JESD216 (9 DWORD) tables lack the QER and timing fields
        assert_eq!(
            decode(&BFPT_8MIB[..36]),
            Err(Error::OutOfRange { offset: 63, len: 36 })
        );
    }
}
