//! Standard serial flash opcodes
//!
//! Only the opcodes the memory-slot layer issues or that appear in the
//! SFDP quad-enable requirement table are listed here.

// ============================================================================
// Write control
// ============================================================================

/// Write Enable - required before any write/erase operation
pub const WREN: u8 = 0x06;
/// Write Disable - clears WEL bit in status register
pub const WRDI: u8 = 0x04;

// ============================================================================
// Status register operations
// ============================================================================

/// Read Status Register 1
pub const RDSR: u8 = 0x05;
/// Read Status Register 2 (QE bit 1 variant)
pub const RDSR2: u8 = 0x35;
/// Read Status Register 2 (QE bit 7 variant)
pub const RDSR2_QE7: u8 = 0x3F;
/// Write Status Register 1 (two data bytes also write register 2)
pub const WRSR: u8 = 0x01;
/// Write Status Register 2 (QE bit 7 variant)
pub const WRSR2_QE7: u8 = 0x3E;

// ============================================================================
// Read / program / erase
// ============================================================================

/// Read Data, single I/O, no dummy cycles
pub const READ: u8 = 0x03;
/// Page Program, single I/O
pub const PP: u8 = 0x02;
/// Sector Erase 4 KiB
pub const SE_20: u8 = 0x20;
/// Block Erase 32 KiB
pub const BE_52: u8 = 0x52;
/// Block Erase 64 KiB
pub const BE_D8: u8 = 0xD8;
/// Chip Erase
pub const CE_60: u8 = 0x60;
/// Chip Erase (alternate opcode)
pub const CE_C7: u8 = 0xC7;

// ============================================================================
// SFDP (Serial Flash Discoverable Parameters)
// ============================================================================

/// Read SFDP (JEDEC JESD216)
pub const RDSFDP: u8 = 0x5A;
/// Dummy cycles between the RDSFDP address and the first data byte
pub const RDSFDP_DUMMY_CYCLES: u8 = 8;

// ============================================================================
// Status register bit definitions
// ============================================================================

/// Status Register 1: Write In Progress / Busy
pub const SR1_WIP: u8 = 0x01;
/// Status Register 1: Write Enable Latch
pub const SR1_WEL: u8 = 0x02;
/// Status Register 1: Quad Enable (QER 2)
pub const SR1_QE_BIT6: u8 = 0x40;
/// Status Register 2: Quad Enable (QER 1, 4, 5)
pub const SR2_QE_BIT1: u8 = 0x02;
/// Status Register 2: Quad Enable (QER 3)
pub const SR2_QE_BIT7: u8 = 0x80;

/// Mode byte that keeps continuous-read ("enhanced") mode disabled
pub const MODE_ENHANCED_DISABLED: u8 = 0xFF;
