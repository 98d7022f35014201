//! Address width types

/// Number of address bytes a device expects in its address phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum AddressWidth {
    /// 3-byte (24-bit) address - supports up to 16 MiB
    ThreeByte,
    /// 4-byte (32-bit) address - supports up to 4 GiB
    FourByte,
}

impl AddressWidth {
    /// Returns the number of address bytes
    pub const fn bytes(&self) -> u8 {
        match self {
            Self::ThreeByte => 3,
            Self::FourByte => 4,
        }
    }

    /// Returns the maximum addressable size in bytes
    pub const fn max_size(&self) -> u64 {
        match self {
            Self::ThreeByte => 16 * 1024 * 1024,
            Self::FourByte => 1 << 32,
        }
    }

    /// Encode an address MSB first, returning the used part of `buf`
    pub fn encode<'a>(&self, address: u32, buf: &'a mut [u8; 4]) -> &'a [u8] {
        *buf = address.to_be_bytes();
        match self {
            Self::ThreeByte => &buf[1..],
            Self::FourByte => &buf[..],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        let mut buf = [0u8; 4];
        assert_eq!(
            AddressWidth::ThreeByte.encode(0x0012_3456, &mut buf),
            &[0x12, 0x34, 0x56]
        );
        assert_eq!(
            AddressWidth::FourByte.encode(0x0123_4567, &mut buf),
            &[0x01, 0x23, 0x45, 0x67]
        );
    }
}
