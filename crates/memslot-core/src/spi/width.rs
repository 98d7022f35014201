//! Bus widths for the individual phases of a command

use crate::error::{Error, Result};
use crate::transport::TransportFeatures;

/// Number of data lines used by one phase of a command
///
/// A command is made of up to five phases (command, address, mode, dummy,
/// data), each of which may be driven on a different number of lines. A
/// 1-4-4 read, for instance, sends its opcode on a single line and its
/// address and data on four.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum BusWidth {
    /// One line (standard SPI)
    #[default]
    Single,
    /// Two lines
    Dual,
    /// Four lines
    Quad,
    /// Eight lines
    Octal,
}

impl BusWidth {
    /// Returns the number of data lines
    pub const fn lines(&self) -> u8 {
        match self {
            Self::Single => 1,
            Self::Dual => 2,
            Self::Quad => 4,
            Self::Octal => 8,
        }
    }

    /// Returns true if this width uses more than one line
    pub const fn is_multi_io(&self) -> bool {
        !matches!(self, Self::Single)
    }
}

impl core::fmt::Display for BusWidth {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.lines())
    }
}

/// Check if a transport can drive the requested bus width
///
/// Returns `Ok(())` if the width is supported, or `Err(WidthNotSupported)` if not.
pub fn check_width_supported(width: BusWidth, features: TransportFeatures) -> Result<()> {
    let required = match width {
        BusWidth::Single => return Ok(()),
        BusWidth::Dual => TransportFeatures::DUAL,
        BusWidth::Quad => TransportFeatures::QUAD,
        BusWidth::Octal => TransportFeatures::OCTAL,
    };

    if features.contains(required) {
        Ok(())
    } else {
        Err(Error::WidthNotSupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines() {
        assert_eq!(BusWidth::Single.lines(), 1);
        assert_eq!(BusWidth::Dual.lines(), 2);
        assert_eq!(BusWidth::Quad.lines(), 4);
        assert_eq!(BusWidth::Octal.lines(), 8);
        assert!(!BusWidth::Single.is_multi_io());
        assert!(BusWidth::Quad.is_multi_io());
    }

    #[test]
    fn test_check_width_supported() {
        let dual_only = TransportFeatures::DUAL;
        assert!(check_width_supported(BusWidth::Single, TransportFeatures::empty()).is_ok());
        assert!(check_width_supported(BusWidth::Dual, dual_only).is_ok());
        assert_eq!(
            check_width_supported(BusWidth::Quad, dual_only),
            Err(Error::WidthNotSupported)
        );
    }
}
