//! Parameter table locator

use super::buffer::SfdpBuffer;
use super::types::{ParameterHeader, ParameterTable, SfdpHeader, SFDP_HEADER_SIZE};
use crate::error::{Error, Result};

/// Iterator over the parameter headers following the SFDP header
///
/// Yields one `Result` per header announced by `nph`; a header that does
/// not fit in the buffer yields [`Error::OutOfRange`] and ends the
/// iteration.
pub struct ParameterHeaders<'a> {
    buffer: &'a SfdpBuffer,
    index: usize,
    count: usize,
}

impl Iterator for ParameterHeaders<'_> {
    type Item = Result<ParameterHeader>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }
        let offset = SFDP_HEADER_SIZE * (1 + self.index);
        self.index += 1;

        match ParameterHeader::read_at(self.buffer, offset) {
            Ok(param) => Some(Ok(param)),
            Err(e) => {
                self.index = self.count;
                Some(Err(e))
            }
        }
    }
}

/// Iterate over all parameter headers announced by `header`
pub fn parameter_headers<'a>(buffer: &'a SfdpBuffer, header: &SfdpHeader) -> ParameterHeaders<'a> {
    ParameterHeaders {
        buffer,
        index: 0,
        count: header.num_param_headers(),
    }
}

/// Find the parameter table with the given ID
///
/// Only headers with major revision 1 are considered. Among those the one
/// with the highest minor revision wins; on a tie the first one listed is
/// kept.
pub fn locate_table(buffer: &SfdpBuffer, header: &SfdpHeader, id: u16) -> Result<ParameterTable> {
    let mut best: Option<ParameterHeader> = None;

    for (index, param) in parameter_headers(buffer, header).enumerate() {
        let param = param?;

        if param.id != id || param.revision.major != 1 {
            log::trace!(
                "Skipping parameter header {}: ID 0x{:04X}, revision {}",
                index,
                param.id,
                param.revision
            );
            continue;
        }

        match best {
            Some(held) if param.revision.minor <= held.revision.minor => {
                log::trace!(
                    "Parameter header {} (revision {}) does not supersede revision {}",
                    index,
                    param.revision,
                    held.revision
                );
            }
            _ => best = Some(param),
        }
    }

    let found = best.ok_or(Error::ParameterNotFound)?;
    let table = ParameterTable::from(found);

    log::debug!(
        "Parameter table 0x{:04X} rev {} at 0x{:06X}, {} bytes",
        table.id,
        table.revision,
        table.address,
        table.length
    );

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sfdp::types::PARAM_ID_BASIC;

    /// SFDP header followed by the given parameter headers
    fn image(params: &[[u8; 8]]) -> (SfdpBuffer, SfdpHeader) {
        let mut bytes = [0u8; 64];
        bytes[..8].copy_from_slice(&[
            b'S',
            b'F',
            b'D',
            b'P',
            0x06,
            0x01,
            (params.len() - 1) as u8,
            0xFF,
        ]);
        for (i, p) in params.iter().enumerate() {
            bytes[8 + i * 8..16 + i * 8].copy_from_slice(p);
        }
        let len = 8 + params.len() * 8;
        let buf = SfdpBuffer::from_slice(&bytes[..len]).unwrap();
        let header = SfdpHeader::read_from(&buf).unwrap();
        (buf, header)
    }

    #[test]
    fn test_highest_minor_wins() {
        let (buf, header) = image(&[
            [0x00, 0x02, 0x01, 0x09, 0x30, 0x00, 0x00, 0xFF],
            [0x00, 0x05, 0x01, 0x10, 0x80, 0x00, 0x00, 0xFF],
        ]);
        let table = locate_table(&buf, &header, PARAM_ID_BASIC).unwrap();
        assert_eq!(table.address, 0x80);
        assert_eq!(table.length, 64);
        assert_eq!(table.revision.minor, 5);
    }

    #[test]
    fn test_tie_keeps_first() {
        let (buf, header) = image(&[
            [0x00, 0x06, 0x01, 0x10, 0x30, 0x00, 0x00, 0xFF],
            [0x00, 0x06, 0x01, 0x10, 0x80, 0x00, 0x00, 0xFF],
        ]);
        let table = locate_table(&buf, &header, PARAM_ID_BASIC).unwrap();
        assert_eq!(table.address, 0x30);
    }

    #[test]
    fn test_ignores_other_ids_and_majors() {
        let (buf, header) = image(&[
            // Vendor table with matching LSB but different MSB
            [0x00, 0x06, 0x01, 0x04, 0x40, 0x00, 0x00, 0xC2],
            // BFPT with major revision 2
            [0x00, 0x00, 0x02, 0x10, 0x50, 0x00, 0x00, 0xFF],
            [0x00, 0x06, 0x01, 0x10, 0x60, 0x01, 0x00, 0xFF],
        ]);
        let table = locate_table(&buf, &header, PARAM_ID_BASIC).unwrap();
        assert_eq!(table.address, 0x160);
    }

    #[test]
    fn test_not_found() {
        let (buf, header) = image(&[[0x81, 0x00, 0x01, 0x04, 0x40, 0x00, 0x00, 0xFF]]);
        assert_eq!(
            locate_table(&buf, &header, PARAM_ID_BASIC),
            Err(Error::ParameterNotFound)
        );
    }

    #[test]
    fn test_header_beyond_buffer() {
        let (buf, mut header) = image(&[[0x00, 0x06, 0x01, 0x10, 0x30, 0x00, 0x00, 0xFF]]);
        // Claim three headers while only one was delivered
        header.nph = 2;
        assert_eq!(
            locate_table(&buf, &header, PARAM_ID_BASIC),
            Err(Error::OutOfRange { offset: 16, len: 16 })
        );

        let results: heapless::Vec<_, 4> = parameter_headers(&buf, &header).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }
}
