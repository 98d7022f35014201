//! memslot-core - SFDP autodetection and serial flash memory-slot commands
//!
//! This crate discovers the capabilities of a serial NOR flash from its
//! JEDEC SFDP tables and drives the device through a narrow transport
//! trait. It is designed to be `no_std` compatible for use in embedded
//! environments.
//!
//! # Features
//!
//! - `std` - Enable standard library support and serde derives on the
//!   profile types
//!
//! # Example
//!
//! ```ignore
//! use memslot_core::{memslot, sfdp, transport::Transport};
//!
//! fn probe<T: Transport>(transport: &mut T) -> memslot_core::Result<()> {
//!     let profile = sfdp::detect(transport, sfdp::DataSelect::Sel0)?;
//!     println!("Size: {}", profile.memory_size);
//!
//!     let mut buf = [0u8; 256];
//!     memslot::read(transport, &profile, 0, &mut buf)
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(feature = "std")]
extern crate std;

pub mod error;
pub mod memslot;
pub mod profile;
pub mod sfdp;
pub mod spi;
pub mod transport;

pub use error::{Error, Result};
pub use profile::DeviceProfile;
