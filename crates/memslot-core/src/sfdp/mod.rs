//! SFDP (Serial Flash Discoverable Parameters) parsing
//!
//! This module implements the JEDEC JESD216 autodetection engine. SFDP
//! provides a standardized way for flash chips to describe their
//! capabilities.
//!
//! # Overview
//!
//! SFDP data is stored in a reserved area of the flash chip and can be
//! read using the RDSFDP command (0x5A). The structure contains:
//!
//! - An SFDP header with signature and revision info
//! - One or more parameter headers describing available tables
//! - Parameter tables containing capability information
//!
//! Detection runs the stages in order over bytes held in an
//! [`SfdpBuffer`]: [`scan_header`], [`locate_table`],
//! [`BasicFlashTable::decode`], [`select_read_mode`],
//! [`QuadEnableStrategy::from_code`] and the timing decoder.
//!
//! # Usage
//!
//! ```ignore
//! use memslot_core::sfdp::{self, DataSelect};
//! use memslot_core::transport::Transport;
//!
//! fn probe<T: Transport>(transport: &mut T) {
//!     match sfdp::detect(transport, DataSelect::Sel0) {
//!         Ok(profile) => println!("Flash size: {}", profile.memory_size),
//!         Err(e) => println!("SFDP not supported: {}", e),
//!     }
//! }
//! ```

pub(crate) mod bfpt;
mod buffer;
mod detect;
mod header;
mod locator;
mod quad_enable;
mod read_mode;
mod timing;
mod types;

pub use bfpt::{BasicFlashTable, EraseSlot, FastReadParams, FastReadSupport, MemorySize};
pub use buffer::{SfdpBuffer, SFDP_BUFFER_CAPACITY};
pub(crate) use detect::detect_with;
pub use detect::{detect, read_header_area};
pub use header::{scan_header, MIN_SUPPORTED_REVISION};
pub use locator::{locate_table, parameter_headers, ParameterHeaders};
pub use quad_enable::QuadEnableStrategy;
pub use read_mode::{select_read_mode, DataSelect, ReadModeVariant};
pub use timing::{
    chip_erase_time_us, decode_timings, program_time_us, sector_erase_time_us, select_erase_type,
    EraseSelection, Timings,
};
pub use types::*;
