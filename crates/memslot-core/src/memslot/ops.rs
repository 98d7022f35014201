//! Memory-slot operations
//!
//! Addressed commands encode their address MSB first on the number of bytes
//! given by the profile. Status writes carry their data in the address
//! phase of the command.

use crate::error::{Error, Result};
use crate::profile::DeviceProfile;
use crate::sfdp::QuadEnableStrategy;
use crate::spi::{check_width_supported, AddressWidth, CommandDescriptor};
use crate::transport::Transport;

/// Verify every phase of `cmd` can be driven by the transport
fn check_command<T: Transport + ?Sized>(transport: &T, cmd: &CommandDescriptor) -> Result<()> {
    let features = transport.features();
    check_width_supported(cmd.command_width, features)?;
    check_width_supported(cmd.address_width, features)?;
    check_width_supported(cmd.data_width, features)?;
    if let Some(mode) = cmd.mode {
        check_width_supported(mode.width, features)?;
    }
    Ok(())
}

/// Send a command with no address and no data
fn send_simple<T: Transport + ?Sized>(transport: &mut T, cmd: &CommandDescriptor) -> Result<()> {
    check_command(transport, cmd)?;
    transport.send_command(cmd.opcode, cmd.command_width, &[], cmd.address_width, true)
}

/// Send the opcode, address, mode byte and dummy phases of `cmd`
///
/// `last` ends the transaction after the address phase.
fn send_header<T: Transport + ?Sized>(
    transport: &mut T,
    cmd: &CommandDescriptor,
    address: &[u8],
    last: bool,
) -> Result<()> {
    check_command(transport, cmd)?;
    transport.send_command(cmd.opcode, cmd.command_width, address, cmd.address_width, last)?;
    if last {
        return Ok(());
    }
    if let Some(mode) = cmd.mode {
        transport.send_command(mode.value, mode.width, &[], mode.width, false)?;
    }
    if cmd.dummy_cycles > 0 {
        transport.send_dummy_cycles(cmd.dummy_cycles)?;
    }
    Ok(())
}

fn address_width(profile: &DeviceProfile, address: u32, len: usize) -> Result<AddressWidth> {
    let width = profile.address_width()?;
    let end = address as u64 + len as u64;
    if end > width.max_size() {
        log::debug!(
            "Range 0x{:08X}+{} exceeds {}-byte addressing",
            address,
            len,
            width.bytes()
        );
        return Err(Error::BadParam);
    }
    Ok(width)
}

/// Read from the SFDP address space
///
/// Uses RDSFDP (0x5A) with a 3-byte address and 8 dummy cycles, all on a
/// single line.
pub fn read_sfdp<T: Transport + ?Sized>(transport: &mut T, address: u32, buf: &mut [u8]) -> Result<()> {
    let cmd = CommandDescriptor::read_sfdp();
    let mut addr_buf = [0u8; 4];
    let addr = AddressWidth::ThreeByte.encode(address, &mut addr_buf);
    log::trace!("RDSFDP 0x{:06X}, {} bytes", address, buf.len());
    send_header(transport, &cmd, addr, false)?;
    transport.receive_bytes(buf, cmd.data_width)
}

/// Send the Write Enable command
pub fn write_enable<T: Transport + ?Sized>(transport: &mut T, profile: &DeviceProfile) -> Result<()> {
    send_simple(transport, &profile.write_enable)
}

/// Send the Write Disable command
pub fn write_disable<T: Transport + ?Sized>(
    transport: &mut T,
    profile: &DeviceProfile,
) -> Result<()> {
    send_simple(transport, &profile.write_disable)
}

/// Read one status register with the given opcode
pub fn read_status<T: Transport + ?Sized>(
    transport: &mut T,
    profile: &DeviceProfile,
    opcode: u8,
) -> Result<u8> {
    let cmd = CommandDescriptor {
        opcode,
        ..profile.read_status
    };
    let mut buf = [0u8; 1];
    send_header(transport, &cmd, &[], false)?;
    transport.receive_bytes(&mut buf, cmd.data_width)?;
    Ok(buf[0])
}

/// Write one or two status bytes with the given opcode
///
/// Sends Write Enable first. Two bytes write SR1 then SR2.
pub fn write_status<T: Transport + ?Sized>(
    transport: &mut T,
    profile: &DeviceProfile,
    opcode: u8,
    status: &[u8],
) -> Result<()> {
    if status.is_empty() || status.len() > 2 {
        return Err(Error::BadParam);
    }
    write_enable(transport, profile)?;

    let cmd = CommandDescriptor::simple(opcode);
    send_header(transport, &cmd, status, true)
}

/// Check if the device is busy
pub fn is_busy<T: Transport + ?Sized>(transport: &mut T, profile: &DeviceProfile) -> Result<bool> {
    let status = read_status(transport, profile, profile.read_status.opcode)?;
    Ok(status & profile.busy_mask != 0)
}

/// Wait for the device to become ready
///
/// Polls the busy bit every `poll_delay_us` and gives up with
/// [`Error::Timeout`] after `timeout_us`. The status is read at least once.
pub fn wait_ready<T: Transport + ?Sized>(
    transport: &mut T,
    profile: &DeviceProfile,
    timeout_us: u64,
    poll_delay_us: u32,
) -> Result<()> {
    let max_polls = if poll_delay_us > 0 {
        timeout_us / poll_delay_us as u64
    } else {
        timeout_us // Fall back to polling once per microsecond
    };

    for _ in 0..max_polls.max(1) {
        if !is_busy(transport, profile)? {
            return Ok(());
        }
        if poll_delay_us > 0 {
            transport.delay_us(poll_delay_us);
        }
    }

    log::debug!("Device still busy after {} us", timeout_us);
    Err(Error::Timeout)
}

/// Set the quad enable bit
///
/// Fails with [`Error::NoQuadEnableBit`] without touching the bus when the
/// device has no usable QE bit.
pub fn quad_enable<T: Transport + ?Sized>(transport: &mut T, profile: &DeviceProfile) -> Result<()> {
    let strategy = match profile.quad_enable {
        Some(QuadEnableStrategy::NotPresent) | None => return Err(Error::NoQuadEnableBit),
        Some(strategy) => strategy,
    };
    let read_op = strategy.read_opcode().ok_or(Error::NoQuadEnableBit)?;
    let write_op = strategy.write_opcode().ok_or(Error::NoQuadEnableBit)?;
    let mask = strategy.mask();

    log::debug!("Setting quad enable bit ({})", strategy);

    let len = strategy.write_len();
    if len == 0 {
        return Err(Error::NoQuadEnableBit);
    }

    // A two-byte write also covers SR1, which is written back unchanged
    let mut regs = [0u8; 2];
    if len == 2 {
        regs[0] = read_status(transport, profile, profile.read_status.opcode)?;
    }
    regs[len - 1] = read_status(transport, profile, read_op)? | mask;
    write_status(transport, profile, write_op, &regs[..len])
}

/// Read data with the detected read command
pub fn read<T: Transport + ?Sized>(
    transport: &mut T,
    profile: &DeviceProfile,
    address: u32,
    buf: &mut [u8],
) -> Result<()> {
    if buf.is_empty() {
        return Ok(());
    }
    let width = address_width(profile, address, buf.len())?;
    let mut addr_buf = [0u8; 4];
    let addr = width.encode(address, &mut addr_buf);

    let cmd = &profile.read;
    send_header(transport, cmd, addr, false)?;
    transport.receive_bytes(buf, cmd.data_width)
}

/// Program up to one page
///
/// Sends Write Enable first. `data` must not exceed the page size; the
/// caller waits for completion.
pub fn program<T: Transport + ?Sized>(
    transport: &mut T,
    profile: &DeviceProfile,
    address: u32,
    data: &[u8],
) -> Result<()> {
    if data.is_empty() || data.len() > profile.page_size as usize {
        return Err(Error::BadParam);
    }
    let width = address_width(profile, address, data.len())?;
    let mut addr_buf = [0u8; 4];
    let addr = width.encode(address, &mut addr_buf);

    write_enable(transport, profile)?;
    let cmd = &profile.program;
    send_header(transport, cmd, addr, false)?;
    transport.transmit_bytes(data, cmd.data_width)
}

/// Erase the sector containing `address`
pub fn sector_erase<T: Transport + ?Sized>(
    transport: &mut T,
    profile: &DeviceProfile,
    address: u32,
) -> Result<()> {
    let width = address_width(profile, address, 1)?;
    let mut addr_buf = [0u8; 4];
    let addr = width.encode(address, &mut addr_buf);

    write_enable(transport, profile)?;
    send_header(transport, &profile.sector_erase, addr, true)
}

/// Erase the whole device
pub fn chip_erase<T: Transport + ?Sized>(transport: &mut T, profile: &DeviceProfile) -> Result<()> {
    write_enable(transport, profile)?;
    send_simple(transport, &profile.chip_erase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::tests::sfdp_image;
    use crate::sfdp::{DataSelect, ReadModeVariant};
    use crate::spi::BusWidth;
    use crate::transport::TransportFeatures;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Phase {
        Command {
            opcode: u8,
            address: heapless::Vec<u8, 4>,
            last: bool,
        },
        Dummy(u8),
        Receive(usize, BusWidth),
        Transmit(heapless::Vec<u8, 16>),
    }

    /// Records every phase and answers reads from a queue of status bytes
    struct MockTransport {
        features: TransportFeatures,
        phases: heapless::Vec<Phase, 32>,
        responses: heapless::Deque<u8, 8>,
        delays: u32,
    }

    impl MockTransport {
        fn new(features: TransportFeatures, responses: &[u8]) -> Self {
            let mut queue = heapless::Deque::new();
            for r in responses {
                queue.push_back(*r).unwrap();
            }
            Self {
                features,
                phases: heapless::Vec::new(),
                responses: queue,
                delays: 0,
            }
        }

        fn opcodes(&self) -> heapless::Vec<u8, 32> {
            self.phases
                .iter()
                .filter_map(|p| match p {
                    Phase::Command { opcode, .. } => Some(*opcode),
                    _ => None,
                })
                .collect()
        }
    }

    impl Transport for MockTransport {
        fn features(&self) -> TransportFeatures {
            self.features
        }

        fn send_command(
            &mut self,
            opcode: u8,
            _width: BusWidth,
            address: &[u8],
            _address_width: BusWidth,
            last: bool,
        ) -> Result<()> {
            self.phases
                .push(Phase::Command {
                    opcode,
                    address: heapless::Vec::from_slice(address).unwrap(),
                    last,
                })
                .unwrap();
            Ok(())
        }

        fn send_dummy_cycles(&mut self, count: u8) -> Result<()> {
            self.phases.push(Phase::Dummy(count)).unwrap();
            Ok(())
        }

        fn receive_bytes(&mut self, buf: &mut [u8], width: BusWidth) -> Result<()> {
            for b in buf.iter_mut() {
                *b = self.responses.pop_front().unwrap_or(0);
            }
            self.phases.push(Phase::Receive(buf.len(), width)).unwrap();
            Ok(())
        }

        fn transmit_bytes(&mut self, data: &[u8], _width: BusWidth) -> Result<()> {
            self.phases
                .push(Phase::Transmit(heapless::Vec::from_slice(data).unwrap()))
                .unwrap();
            Ok(())
        }

        fn delay_us(&mut self, _us: u32) {
            self.delays += 1;
        }
    }

    fn profile() -> DeviceProfile {
        DeviceProfile::from_sfdp_image(&sfdp_image(), DataSelect::Sel0).unwrap()
    }

    fn command(opcode: u8, address: &[u8], last: bool) -> Phase {
        Phase::Command {
            opcode,
            address: heapless::Vec::from_slice(address).unwrap(),
            last,
        }
    }

    #[test]
    fn test_read_sfdp_phases() {
        let mut t = MockTransport::new(TransportFeatures::empty(), &[]);
        let mut buf = [0u8; 8];
        read_sfdp(&mut t, 0x10, &mut buf).unwrap();
        assert_eq!(
            t.phases.as_slice(),
            &[
                command(0x5A, &[0x00, 0x00, 0x10], false),
                Phase::Dummy(8),
                Phase::Receive(8, BusWidth::Single),
            ]
        );
    }

    #[test]
    fn test_quad_read_phases() {
        let p = profile();
        assert_eq!(p.read_mode, ReadModeVariant::Quad144);

        let mut t = MockTransport::new(TransportFeatures::QUAD, &[]);
        let mut buf = [0u8; 4];
        read(&mut t, &p, 0x01_2345, &mut buf).unwrap();
        assert_eq!(
            t.phases.as_slice(),
            &[
                command(0xEB, &[0x01, 0x23, 0x45], false),
                command(0xFF, &[], false),
                Phase::Dummy(4),
                Phase::Receive(4, BusWidth::Quad),
            ]
        );
    }

    #[test]
    fn test_read_width_not_supported() {
        let p = profile();
        let mut t = MockTransport::new(TransportFeatures::DUAL, &[]);
        let mut buf = [0u8; 4];
        assert_eq!(read(&mut t, &p, 0, &mut buf), Err(Error::WidthNotSupported));
        assert!(t.phases.is_empty());
    }

    #[test]
    fn test_read_unknown_address_size() {
        let mut p = profile();
        p.address_bytes = None;
        let mut t = MockTransport::new(TransportFeatures::QUAD, &[]);
        let mut buf = [0u8; 4];
        assert_eq!(read(&mut t, &p, 0, &mut buf), Err(Error::BadParam));
    }

    #[test]
    fn test_program() {
        let p = profile();
        let mut t = MockTransport::new(TransportFeatures::empty(), &[]);
        program(&mut t, &p, 0x100, &[0xAA, 0x55]).unwrap();
        assert_eq!(
            t.phases.as_slice(),
            &[
                command(0x06, &[], true),
                command(0x02, &[0x00, 0x01, 0x00], false),
                Phase::Transmit(heapless::Vec::from_slice(&[0xAA, 0x55]).unwrap()),
            ]
        );

        let page = [0u8; 257];
        assert_eq!(program(&mut t, &p, 0, &page), Err(Error::BadParam));
    }

    #[test]
    fn test_erase() {
        let p = profile();
        let mut t = MockTransport::new(TransportFeatures::empty(), &[]);
        sector_erase(&mut t, &p, 0x1000).unwrap();
        chip_erase(&mut t, &p).unwrap();
        assert_eq!(
            t.phases.as_slice(),
            &[
                command(0x06, &[], true),
                command(0x20, &[0x00, 0x10, 0x00], true),
                command(0x06, &[], true),
                command(0x60, &[], true),
            ]
        );
    }

    #[test]
    fn test_write_disable() {
        let p = profile();
        let mut t = MockTransport::new(TransportFeatures::empty(), &[]);
        write_disable(&mut t, &p).unwrap();
        assert_eq!(t.phases.as_slice(), &[command(0x04, &[], true)]);
    }

    #[test]
    fn test_quad_enable_sr2_bit1() {
        let p = profile();
        assert_eq!(p.quad_enable, Some(QuadEnableStrategy::Sr2Bit1));

        // SR1 = 0x1C, SR2 = 0x00
        let mut t = MockTransport::new(TransportFeatures::empty(), &[0x1C, 0x00]);
        quad_enable(&mut t, &p).unwrap();
        assert_eq!(t.opcodes().as_slice(), &[0x05, 0x35, 0x06, 0x01]);
        assert_eq!(t.phases.last(), Some(&command(0x01, &[0x1C, 0x02], true)));
    }

    #[test]
    fn test_quad_enable_single_register() {
        let mut p = profile();
        p.quad_enable = Some(QuadEnableStrategy::Sr2Bit7);
        let mut t = MockTransport::new(TransportFeatures::empty(), &[0x01]);
        quad_enable(&mut t, &p).unwrap();
        assert_eq!(t.opcodes().as_slice(), &[0x3F, 0x06, 0x3E]);
        assert_eq!(t.phases.last(), Some(&command(0x3E, &[0x81], true)));
    }

    #[test]
    fn test_quad_enable_sr1_bit6() {
        let mut p = profile();
        p.quad_enable = Some(QuadEnableStrategy::Sr1Bit6);
        let mut t = MockTransport::new(TransportFeatures::empty(), &[0x0C]);
        quad_enable(&mut t, &p).unwrap();
        assert_eq!(t.opcodes().as_slice(), &[0x05, 0x06, 0x01]);
        assert_eq!(t.phases.last(), Some(&command(0x01, &[0x4C], true)));
    }

    #[test]
    fn test_quad_enable_unavailable() {
        let mut p = profile();
        for qe in [None, Some(QuadEnableStrategy::NotPresent)] {
            p.quad_enable = qe;
            let mut t = MockTransport::new(TransportFeatures::empty(), &[]);
            assert_eq!(quad_enable(&mut t, &p), Err(Error::NoQuadEnableBit));
            assert!(t.phases.is_empty());
        }
    }

    #[test]
    fn test_write_status_length() {
        let p = profile();
        let mut t = MockTransport::new(TransportFeatures::empty(), &[]);
        assert_eq!(write_status(&mut t, &p, 0x01, &[]), Err(Error::BadParam));
        assert_eq!(write_status(&mut t, &p, 0x01, &[0; 3]), Err(Error::BadParam));
        assert!(t.phases.is_empty());
    }

    #[test]
    fn test_wait_ready() {
        let p = profile();
        // Busy twice, then ready
        let mut t = MockTransport::new(TransportFeatures::empty(), &[0x03, 0x01, 0x00]);
        wait_ready(&mut t, &p, 1000, 10).unwrap();
        assert_eq!(t.delays, 2);

        let mut t = MockTransport::new(TransportFeatures::empty(), &[0x01; 8]);
        assert_eq!(wait_ready(&mut t, &p, 30, 10), Err(Error::Timeout));
        assert_eq!(t.delays, 3);
    }
}
