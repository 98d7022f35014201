//! Transport trait definitions
//!
//! The transport is blocking: every call returns once the bus transfer has
//! completed or failed. Timeouts are the transport's concern and surface as
//! [`Error::TransportTimeout`](crate::error::Error::TransportTimeout).

use crate::error::Result;
use crate::spi::BusWidth;
use bitflags::bitflags;

bitflags! {
    /// Transport feature flags
    ///
    /// Indicates which multi-line widths the controller can drive. Single
    /// width is always available.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TransportFeatures: u32 {
        /// Can drive two data lines
        const DUAL  = 1 << 0;
        /// Can drive four data lines
        const QUAD  = 1 << 1;
        /// Can drive eight data lines
        const OCTAL = 1 << 2;
    }
}

impl Default for TransportFeatures {
    fn default() -> Self {
        TransportFeatures::empty()
    }
}

/// Phase-level access to a serial flash bus
///
/// A transaction is built from successive calls: one [`send_command`],
/// optionally a mode byte sent as a second [`send_command`], then
/// [`send_dummy_cycles`] and finally [`receive_bytes`] or
/// [`transmit_bytes`]. The `last` flag of `send_command` tells the
/// transport that no further phase follows and chip select may be
/// released.
///
/// [`send_command`]: Transport::send_command
/// [`send_dummy_cycles`]: Transport::send_dummy_cycles
/// [`receive_bytes`]: Transport::receive_bytes
/// [`transmit_bytes`]: Transport::transmit_bytes
pub trait Transport {
    /// Get the bus widths supported by this transport
    fn features(&self) -> TransportFeatures;

    /// Send an opcode followed by an optional address
    ///
    /// # Arguments
    /// * `opcode` - Command byte
    /// * `width` - Width of the opcode phase
    /// * `address` - Address bytes, most significant first (may be empty)
    /// * `address_width` - Width of the address phase
    /// * `last` - True if the transaction ends after this phase
    fn send_command(
        &mut self,
        opcode: u8,
        width: BusWidth,
        address: &[u8],
        address_width: BusWidth,
        last: bool,
    ) -> Result<()>;

    /// Clock the given number of dummy cycles
    fn send_dummy_cycles(&mut self, count: u8) -> Result<()>;

    /// Receive `buf.len()` bytes and end the transaction
    fn receive_bytes(&mut self, buf: &mut [u8], width: BusWidth) -> Result<()>;

    /// Transmit `data` and end the transaction
    fn transmit_bytes(&mut self, data: &[u8], width: BusWidth) -> Result<()>;

    /// Delay for the specified number of microseconds
    fn delay_us(&mut self, us: u32);
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn features(&self) -> TransportFeatures {
        (**self).features()
    }

    fn send_command(
        &mut self,
        opcode: u8,
        width: BusWidth,
        address: &[u8],
        address_width: BusWidth,
        last: bool,
    ) -> Result<()> {
        (**self).send_command(opcode, width, address, address_width, last)
    }

    fn send_dummy_cycles(&mut self, count: u8) -> Result<()> {
        (**self).send_dummy_cycles(count)
    }

    fn receive_bytes(&mut self, buf: &mut [u8], width: BusWidth) -> Result<()> {
        (**self).receive_bytes(buf, width)
    }

    fn transmit_bytes(&mut self, data: &[u8], width: BusWidth) -> Result<()> {
        (**self).transmit_bytes(data, width)
    }

    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us)
    }
}
