//! Quad enable requirement resolution

use crate::error::{Error, Result};
use crate::spi::opcodes;

/// How the quad enable (QE) bit of a device is set
///
/// Resolved from the quad enable requirement (QER) field, bits 6:4 of
/// BFPT byte 0x3A.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum QuadEnableStrategy {
    /// Device has no QE bit; quad reads work without enabling anything
    NotPresent,
    /// QE is bit 1 of SR2; SR1 and SR2 are written together with 0x01
    Sr2Bit1,
    /// QE is bit 6 of SR1; written with 0x01, one byte
    Sr1Bit6,
    /// QE is bit 7 of SR2; read with 0x3F, written with 0x3E
    Sr2Bit7,
}

impl QuadEnableStrategy {
    /// Resolve a QER code
    ///
    /// Codes 6 and 7 are reserved and fail with [`Error::NoQuadEnableBit`].
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::NotPresent),
            1 | 4 | 5 => Ok(Self::Sr2Bit1),
            2 => Ok(Self::Sr1Bit6),
            3 => Ok(Self::Sr2Bit7),
            _ => Err(Error::NoQuadEnableBit),
        }
    }

    /// Mask of the QE bit within the register read by [`read_opcode`](Self::read_opcode)
    pub fn mask(&self) -> u8 {
        match self {
            Self::NotPresent => 0,
            Self::Sr2Bit1 => opcodes::SR2_QE_BIT1,
            Self::Sr1Bit6 => opcodes::SR1_QE_BIT6,
            Self::Sr2Bit7 => opcodes::SR2_QE_BIT7,
        }
    }

    /// Opcode reading the register holding the QE bit
    pub fn read_opcode(&self) -> Option<u8> {
        match self {
            Self::NotPresent => None,
            Self::Sr2Bit1 => Some(opcodes::RDSR2),
            Self::Sr1Bit6 => Some(opcodes::RDSR),
            Self::Sr2Bit7 => Some(opcodes::RDSR2_QE7),
        }
    }

    /// Opcode writing the register holding the QE bit
    pub fn write_opcode(&self) -> Option<u8> {
        match self {
            Self::NotPresent => None,
            Self::Sr2Bit1 | Self::Sr1Bit6 => Some(opcodes::WRSR),
            Self::Sr2Bit7 => Some(opcodes::WRSR2_QE7),
        }
    }

    /// Number of bytes the status write carries
    pub fn write_len(&self) -> usize {
        match self {
            Self::NotPresent => 0,
            Self::Sr2Bit1 => 2,
            Self::Sr1Bit6 | Self::Sr2Bit7 => 1,
        }
    }
}

impl core::fmt::Display for QuadEnableStrategy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotPresent => write!(f, "none"),
            Self::Sr2Bit1 => write!(f, "SR2 bit 1"),
            Self::Sr1Bit6 => write!(f, "SR1 bit 6"),
            Self::Sr2Bit7 => write!(f, "SR2 bit 7"),
        }
    }
}
