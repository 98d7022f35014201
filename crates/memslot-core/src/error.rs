//! Error types for memslot-core
//!
//! This module provides a no_std compatible error type that is shared by the
//! SFDP engine, the transport trait and the memory-slot command layer.

use core::fmt;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    // SFDP errors
    /// SFDP signature or revision not supported
    UnsupportedDevice,
    /// Requested parameter table is not listed in the parameter headers
    ParameterNotFound,
    /// No usable command (e.g. every erase type slot is unsupported)
    CommandNotFound,
    /// Device does not describe a usable quad enable bit
    NoQuadEnableBit,
    /// A field was read outside the delivered descriptor bytes
    OutOfRange {
        /// Byte offset of the first byte that was requested
        offset: usize,
        /// Number of valid bytes in the buffer
        len: usize,
    },
    /// A table field holds a value that cannot be represented
    MalformedTable,

    // Command layer errors
    /// Invalid argument for a memory-slot command
    BadParam,
    /// A command phase uses a bus width the transport cannot drive
    WidthNotSupported,
    /// Device stayed busy past the allowed time
    Timeout,

    // Transport errors
    /// Transport did not complete the transfer in time
    TransportTimeout,
    /// General transport failure
    TransportError,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedDevice => write!(f, "SFDP signature or revision not supported"),
            Self::ParameterNotFound => write!(f, "SFDP parameter table not found"),
            Self::CommandNotFound => write!(f, "command not found"),
            Self::NoQuadEnableBit => write!(f, "device has no usable quad enable bit"),
            Self::OutOfRange { offset, len } => {
                write!(
                    f,
                    "SFDP read at offset 0x{:X} beyond {} delivered bytes",
                    offset, len
                )
            }
            Self::MalformedTable => write!(f, "malformed SFDP parameter table"),
            Self::BadParam => write!(f, "invalid parameter"),
            Self::WidthNotSupported => write!(f, "bus width not supported by transport"),
            Self::Timeout => write!(f, "device busy timeout"),
            Self::TransportTimeout => write!(f, "transport timed out"),
            Self::TransportError => write!(f, "transport error"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
