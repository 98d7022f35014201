//! SFDP type definitions
//!
//! Types representing the SFDP header structures as defined by JEDEC JESD216.

use super::buffer::SfdpBuffer;
use crate::error::Result;

/// SFDP signature magic value ("SFDP" in little-endian)
pub const SFDP_SIGNATURE: u32 = 0x50444653;

/// Size of the SFDP header and of each parameter header
pub const SFDP_HEADER_SIZE: usize = 8;

/// Smallest Basic Flash Parameter Table understood (16 DWORDs, JESD216B)
pub const BFPT_MIN_LEN: usize = 64;

// ============================================================================
// Parameter IDs (MSB << 8 | LSB)
// ============================================================================

/// Basic Flash Parameter Table ID
pub const PARAM_ID_BASIC: u16 = 0xFF00;
/// Sector Map Parameter Table ID
pub const PARAM_ID_SECTOR_MAP: u16 = 0xFF81;
/// 4-byte Address Instruction Table ID
pub const PARAM_ID_4BYTE_ADDR: u16 = 0xFF84;

// ============================================================================
// SFDP Revision
// ============================================================================

/// SFDP revision information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct SfdpRevision {
    /// Major revision number
    pub major: u8,
    /// Minor revision number
    pub minor: u8,
}

impl SfdpRevision {
    /// Create a new revision
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// JESD216B (16 DWORDs, added QE requirements)
    pub const JESD216B: Self = Self::new(1, 6);
}

impl core::fmt::Display for SfdpRevision {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

// ============================================================================
// SFDP Header
// ============================================================================

/// SFDP header structure (first 8 bytes at address 0x00)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SfdpHeader {
    /// SFDP signature (should be 0x50444653)
    pub signature: u32,
    /// SFDP revision
    pub revision: SfdpRevision,
    /// Number of parameter headers (0-based, so actual count is nph + 1)
    pub nph: u8,
    /// Access protocol (0xFF for legacy)
    pub access_protocol: u8,
}

impl SfdpHeader {
    /// Read the SFDP header at the start of `buffer`
    pub fn read_from(buffer: &SfdpBuffer) -> Result<Self> {
        Ok(Self {
            signature: buffer.read_u32_le_at(0)?,
            revision: SfdpRevision::new(buffer.read_u8_at(5)?, buffer.read_u8_at(4)?),
            nph: buffer.read_u8_at(6)?,
            access_protocol: buffer.read_u8_at(7)?,
        })
    }

    /// Check if the signature is valid
    pub fn is_valid(&self) -> bool {
        self.signature == SFDP_SIGNATURE
    }

    /// Get the number of parameter headers
    pub fn num_param_headers(&self) -> usize {
        (self.nph as usize) + 1
    }

    /// Number of bytes covering the SFDP header and every parameter header
    pub fn header_area_len(&self) -> usize {
        SFDP_HEADER_SIZE * (1 + self.num_param_headers())
    }
}

// ============================================================================
// Parameter Header
// ============================================================================

/// Parameter header structure (8 bytes each, starting at address 0x08)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterHeader {
    /// Parameter ID (MSB << 8 | LSB)
    pub id: u16,
    /// Parameter table revision
    pub revision: SfdpRevision,
    /// Parameter table length in DWORDs
    pub length_dwords: u8,
    /// Parameter table pointer (24-bit byte address)
    pub table_pointer: u32,
}

impl ParameterHeader {
    /// Read the parameter header starting at byte `offset` of `buffer`
    ///
    /// The ID LSB is the first byte of the header and the MSB the last.
    pub fn read_at(buffer: &SfdpBuffer, offset: usize) -> Result<Self> {
        let id_lsb = buffer.read_u8_at(offset)?;
        let id_msb = buffer.read_u8_at(offset + 7)?;
        Ok(Self {
            id: u16::from_le_bytes([id_lsb, id_msb]),
            revision: SfdpRevision::new(
                buffer.read_u8_at(offset + 2)?,
                buffer.read_u8_at(offset + 1)?,
            ),
            length_dwords: buffer.read_u8_at(offset + 3)?,
            table_pointer: buffer.read_u24_le_at(offset + 4)?,
        })
    }

    /// Get the table length in bytes
    pub fn length_bytes(&self) -> usize {
        (self.length_dwords as usize) * 4
    }

    /// Check if this is the Basic Flash Parameter Table
    pub fn is_basic(&self) -> bool {
        self.id == PARAM_ID_BASIC
    }

    /// Check if this is a JEDEC-defined table (MSB >= 0x80)
    pub fn is_jedec(&self) -> bool {
        (self.id >> 8) >= 0x80
    }

    /// Human readable name of well-known tables
    pub fn name(&self) -> Option<&'static str> {
        match self.id {
            PARAM_ID_BASIC => Some("Basic Flash Parameter Table"),
            PARAM_ID_SECTOR_MAP => Some("Sector Map"),
            PARAM_ID_4BYTE_ADDR => Some("4-byte Address Instruction"),
            _ => None,
        }
    }
}

// ============================================================================
// Parameter Table
// ============================================================================

/// Location of a parameter table chosen by the locator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterTable {
    /// Parameter ID
    pub id: u16,
    /// Revision of the chosen header
    pub revision: SfdpRevision,
    /// Byte address of the table in the SFDP space
    pub address: u32,
    /// Table length in bytes
    pub length: usize,
}

impl From<ParameterHeader> for ParameterTable {
    fn from(header: ParameterHeader) -> Self {
        Self {
            id: header.id,
            revision: header.revision,
            address: header.table_pointer,
            length: header.length_bytes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sfdp_header_parse() {
        // "SFDP" signature, rev 1.6, 1 param header, legacy access
        let data = [0x53, 0x46, 0x44, 0x50, 0x06, 0x01, 0x00, 0xFF];
        let buf = SfdpBuffer::from_slice(&data).unwrap();
        let header = SfdpHeader::read_from(&buf).unwrap();

        assert!(header.is_valid());
        assert_eq!(header.revision, SfdpRevision::JESD216B);
        assert_eq!(header.num_param_headers(), 1);
        assert_eq!(header.header_area_len(), 16);
        assert_eq!(header.access_protocol, 0xFF);
    }

    #[test]
    fn test_param_header_parse() {
        // BFPT: ID=0xFF00, rev 1.6, 16 DWORDs, pointer 0x000080
        // Preceded by one padding byte to exercise the offset
        let data = [0xAA, 0x00, 0x06, 0x01, 0x10, 0x80, 0x00, 0x00, 0xFF];
        let buf = SfdpBuffer::from_slice(&data).unwrap();
        let header = ParameterHeader::read_at(&buf, 1).unwrap();

        assert!(header.is_basic());
        assert!(header.is_jedec());
        assert_eq!(header.revision, SfdpRevision::new(1, 6));
        assert_eq!(header.length_bytes(), 64);
        assert_eq!(header.table_pointer, 0x80);

        let table = ParameterTable::from(header);
        assert_eq!(table.address, 0x80);
        assert_eq!(table.length, 64);
    }
}
