//! SPI types and command descriptors
//!
//! This module provides the per-phase bus widths, address encoding,
//! command descriptors and the standard opcodes used by the memory-slot
//! layer.

mod address;
mod command;
pub mod opcodes;
mod width;

pub use address::AddressWidth;
pub use command::{CommandDescriptor, ModeByte};
pub use opcodes::*;
pub use width::{check_width_supported, BusWidth};
