//! memslot-dummy - In-memory serial flash emulator for testing
//!
//! This crate provides a transport that emulates a serial NOR flash in
//! memory. It answers RDSFDP from an SFDP image and implements the status
//! registers, reads, page program and erase, which is enough to run
//! detection and every memory-slot command without hardware.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
use alloc::vec;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use memslot_core::error::{Error, Result};
use memslot_core::spi::{opcodes, BusWidth};
use memslot_core::transport::{Transport, TransportFeatures};

/// SFDP image of an 8 MiB JESD216B device
///
/// 3-byte addressing, 1-1-2/1-2-2/1-1-4/1-4-4 fast reads, 4K/32K/64K
/// erase types, 256-byte pages and the quad enable bit in SR2 bit 1.
#[rustfmt::skip]
pub const DEFAULT_SFDP: [u8; 80] = [
    0x53, 0x46, 0x44, 0x50, // @0x00: SFDP signature "SFDP"
    0x06, 0x01, 0x00, 0xFF, // @0x04: revision 1.6, 1 header (NPH=0)
    0x00, 0x06, 0x01, 0x10, // @0x08: JEDEC header rev. 1.6, 16 DW long
    0x10, 0x00, 0x00, 0xFF, // @0x0C: PTP = 0x10
    0xE5, 0x20, 0xF1, 0xFF, // @0x10: DWORD 1
    0xFF, 0xFF, 0xFF, 0x03, // @0x14: DWORD 2 - 64 Mbit
    0x44, 0xEB, 0x08, 0x6B, // @0x18: DWORD 3 - 1-4-4 / 1-1-4
    0x08, 0x3B, 0x42, 0xBB, // @0x1C: DWORD 4 - 1-1-2 / 1-2-2
    0xEE, 0xFF, 0xFF, 0xFF, // @0x20: DWORD 5
    0xFF, 0xFF, 0x00, 0x00, // @0x24: DWORD 6
    0xFF, 0xFF, 0x00, 0xFF, // @0x28: DWORD 7
    0x0C, 0x20, 0x0F, 0x52, // @0x2C: DWORD 8 - erase types 1, 2
    0x10, 0xD8, 0x00, 0xFF, // @0x30: DWORD 9 - erase types 3, 4
    0x31, 0x00, 0x00, 0x00, // @0x34: DWORD 10 - erase timing
    0x81, 0x09, 0x00, 0x23, // @0x38: DWORD 11 - page size, program/chip erase timing
    0xFF, 0xFF, 0xFF, 0xFF, // @0x3C: DWORD 12
    0xFF, 0xFF, 0xFF, 0xFF, // @0x40: DWORD 13
    0xFF, 0xFF, 0xFF, 0xFF, // @0x44: DWORD 14
    0x00, 0x00, 0x10, 0x00, // @0x48: DWORD 15 - QER 1
    0x00, 0x00, 0x00, 0x00, // @0x4C: DWORD 16
];

/// Configuration for the dummy flash
#[cfg(feature = "alloc")]
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Flash size in bytes
    pub size: usize,
    /// Page size for programming
    pub page_size: usize,
    /// Erase size for opcodes not in the standard erase set
    pub sector_size: usize,
    /// Initial status register 1
    pub status_reg1: u8,
    /// Initial status register 2
    pub status_reg2: u8,
    /// Contents of the SFDP address space
    pub sfdp: Vec<u8>,
    /// Bus widths the emulated controller accepts
    pub features: TransportFeatures,
    /// Number of status reads reporting busy after each program or erase
    pub busy_polls: u32,
}

#[cfg(feature = "alloc")]
impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            size: 8 * 1024 * 1024,
            page_size: 256,
            sector_size: 4096,
            status_reg1: 0,
            status_reg2: 0,
            sfdp: DEFAULT_SFDP.to_vec(),
            features: TransportFeatures::DUAL | TransportFeatures::QUAD,
            busy_polls: 0,
        }
    }
}

/// Command waiting for its data phase
#[derive(Debug, Clone, Copy)]
struct Pending {
    opcode: u8,
    address: Option<u32>,
    mode: Option<u8>,
    dummy_cycles: u8,
}

/// Dummy flash transport
///
/// Emulates a serial flash in memory for testing purposes.
#[cfg(feature = "alloc")]
pub struct DummyFlash {
    config: DummyConfig,
    data: Vec<u8>,
    status_reg1: u8,
    status_reg2: u8,
    write_enabled: bool,
    busy_remaining: u32,
    pending: Option<Pending>,
    command_log: Vec<u8>,
}

#[cfg(feature = "alloc")]
impl DummyFlash {
    /// Create a new dummy flash with the given configuration
    pub fn new(config: DummyConfig) -> Self {
        let data = vec![0xFF; config.size];
        Self {
            status_reg1: config.status_reg1,
            status_reg2: config.status_reg2,
            config,
            data,
            write_enabled: false,
            busy_remaining: 0,
            pending: None,
            command_log: Vec::new(),
        }
    }

    /// Create a new dummy flash with default configuration
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Create a dummy flash with pre-filled data
    pub fn with_data(config: DummyConfig, initial_data: &[u8]) -> Self {
        let mut flash = Self::new(config);
        let len = core::cmp::min(initial_data.len(), flash.data.len());
        flash.data[..len].copy_from_slice(&initial_data[..len]);
        flash
    }

    /// Get a reference to the flash data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the configuration
    pub fn config(&self) -> &DummyConfig {
        &self.config
    }

    /// Current status register 1 (WEL reflects the write enable latch)
    pub fn status_reg1(&self) -> u8 {
        let mut sr1 = self.status_reg1 & !(opcodes::SR1_WIP | opcodes::SR1_WEL);
        if self.write_enabled {
            sr1 |= opcodes::SR1_WEL;
        }
        if self.busy_remaining > 0 {
            sr1 |= opcodes::SR1_WIP;
        }
        sr1
    }

    /// Current status register 2
    pub fn status_reg2(&self) -> u8 {
        self.status_reg2
    }

    /// Opcodes received so far, in order (mode bytes excluded)
    pub fn command_log(&self) -> &[u8] {
        &self.command_log
    }

    /// Forget the recorded opcodes
    pub fn clear_log(&mut self) {
        self.command_log.clear();
    }

    fn decode_address(address: &[u8]) -> Option<u32> {
        match address.len() {
            3 | 4 => Some(
                address
                    .iter()
                    .fold(0u32, |acc, &b| (acc << 8) | b as u32),
            ),
            _ => None,
        }
    }

    fn range(&self, address: u32, len: usize) -> Result<core::ops::Range<usize>> {
        let start = address as usize;
        let end = start.checked_add(len).ok_or(Error::TransportError)?;
        if end > self.data.len() {
            log::warn!("dummy: access 0x{:08X}+{} beyond device", address, len);
            return Err(Error::TransportError);
        }
        Ok(start..end)
    }

    fn require_write_enable(&mut self) -> Result<()> {
        if !self.write_enabled {
            log::warn!("dummy: write command without write enable");
            return Err(Error::TransportError);
        }
        Ok(())
    }

    fn finish_write(&mut self) {
        self.write_enabled = false;
        self.busy_remaining = self.config.busy_polls;
    }

    fn erase_size(&self, opcode: u8) -> usize {
        match opcode {
            opcodes::SE_20 => 4 * 1024,
            opcodes::BE_52 => 32 * 1024,
            opcodes::BE_D8 => 64 * 1024,
            _ => self.config.sector_size,
        }
    }

    fn handle_write_status(&mut self, opcode: u8, status: &[u8]) -> Result<()> {
        self.require_write_enable()?;
        match (opcode, status) {
            (opcodes::WRSR, [sr1]) => self.status_reg1 = *sr1,
            (opcodes::WRSR, [sr1, sr2]) => {
                self.status_reg1 = *sr1;
                self.status_reg2 = *sr2;
            }
            (opcodes::WRSR2_QE7, [sr2]) => self.status_reg2 = *sr2,
            _ => return Err(Error::TransportError),
        }
        self.finish_write();
        Ok(())
    }

    fn handle_sector_erase(&mut self, opcode: u8, address: u32) -> Result<()> {
        self.require_write_enable()?;
        let erase_size = self.erase_size(opcode);
        if !erase_size.is_power_of_two() {
            log::warn!("dummy: erase size {} is not a power of two", erase_size);
            return Err(Error::TransportError);
        }

        // Align address to erase boundary
        let aligned = address & !(erase_size as u32 - 1);
        let range = self.range(aligned, erase_size)?;
        self.data[range].fill(0xFF);

        self.finish_write();
        Ok(())
    }

    fn handle_chip_erase(&mut self) -> Result<()> {
        self.require_write_enable()?;
        self.data.fill(0xFF);
        self.finish_write();
        Ok(())
    }

    /// Execute a command that ends after its address phase
    fn execute_short(&mut self, opcode: u8, address: &[u8]) -> Result<()> {
        match opcode {
            opcodes::WREN => {
                self.write_enabled = true;
                Ok(())
            }
            opcodes::WRDI => {
                self.write_enabled = false;
                Ok(())
            }
            // Status data travels in the address phase
            opcodes::WRSR | opcodes::WRSR2_QE7 => self.handle_write_status(opcode, address),
            opcodes::CE_60 | opcodes::CE_C7 => self.handle_chip_erase(),
            _ => match Self::decode_address(address) {
                Some(addr) => self.handle_sector_erase(opcode, addr),
                None => {
                    log::warn!("dummy: unsupported opcode 0x{:02X}", opcode);
                    Err(Error::TransportError)
                }
            },
        }
    }

    fn take_pending(&mut self) -> Result<Pending> {
        self.pending.take().ok_or_else(|| {
            log::warn!("dummy: data phase without a command");
            Error::TransportError
        })
    }
}

#[cfg(feature = "alloc")]
impl Transport for DummyFlash {
    fn features(&self) -> TransportFeatures {
        self.config.features
    }

    fn send_command(
        &mut self,
        opcode: u8,
        _width: BusWidth,
        address: &[u8],
        _address_width: BusWidth,
        last: bool,
    ) -> Result<()> {
        // A second command phase inside an open transaction is the mode byte
        if let Some(pending) = self.pending.as_mut() {
            pending.mode = Some(opcode);
            return Ok(());
        }

        self.command_log.push(opcode);

        if last {
            return self.execute_short(opcode, address);
        }

        self.pending = Some(Pending {
            opcode,
            address: Self::decode_address(address),
            mode: None,
            dummy_cycles: 0,
        });
        Ok(())
    }

    fn send_dummy_cycles(&mut self, count: u8) -> Result<()> {
        let pending = self.pending.as_mut().ok_or(Error::TransportError)?;
        pending.dummy_cycles = pending.dummy_cycles.saturating_add(count);
        Ok(())
    }

    fn receive_bytes(&mut self, buf: &mut [u8], _width: BusWidth) -> Result<()> {
        let pending = self.take_pending()?;
        log::trace!(
            "dummy: read 0x{:02X}, mode {:?}, {} dummy cycles",
            pending.opcode,
            pending.mode,
            pending.dummy_cycles
        );

        match (pending.opcode, pending.address) {
            (opcodes::RDSFDP, Some(addr)) => {
                // Unprogrammed SFDP space reads as erased
                for (i, b) in buf.iter_mut().enumerate() {
                    *b = self
                        .config
                        .sfdp
                        .get(addr as usize + i)
                        .copied()
                        .unwrap_or(0xFF);
                }
            }
            (opcodes::RDSR, None) => {
                buf.fill(self.status_reg1());
                self.busy_remaining = self.busy_remaining.saturating_sub(1);
            }
            (opcodes::RDSR2 | opcodes::RDSR2_QE7, None) => buf.fill(self.status_reg2),
            (_, Some(addr)) => {
                let range = self.range(addr, buf.len())?;
                buf.copy_from_slice(&self.data[range]);
            }
            (opcode, None) => {
                log::warn!("dummy: unsupported read opcode 0x{:02X}", opcode);
                return Err(Error::TransportError);
            }
        }
        Ok(())
    }

    fn transmit_bytes(&mut self, data: &[u8], _width: BusWidth) -> Result<()> {
        let pending = self.take_pending()?;
        let addr = match (pending.opcode, pending.address) {
            (opcodes::PP, Some(addr)) => addr,
            (opcode, _) => {
                log::warn!("dummy: unsupported write opcode 0x{:02X}", opcode);
                return Err(Error::TransportError);
            }
        };

        self.require_write_enable()?;
        if data.len() > self.config.page_size {
            return Err(Error::TransportError);
        }
        let range = self.range(addr, data.len())?;

        // Flash programming: can only change 1 -> 0
        for (dst, &byte) in self.data[range].iter_mut().zip(data) {
            *dst &= byte;
        }

        self.finish_write();
        Ok(())
    }

    fn delay_us(&mut self, _us: u32) {
        // No delay needed for in-memory operations
    }
}
