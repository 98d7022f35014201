//! SFDP header scanner

use super::buffer::SfdpBuffer;
use super::types::{SfdpHeader, SfdpRevision, SFDP_HEADER_SIZE};
use crate::error::{Error, Result};

/// Oldest revision whose Basic Flash Parameter Table carries the
/// quad-enable requirement and timing DWORDs
pub const MIN_SUPPORTED_REVISION: SfdpRevision = SfdpRevision::JESD216B;

/// Validate the SFDP header at the start of `buffer`
///
/// Requires the "SFDP" signature, major revision 1 and at least minor
/// revision 6 (JESD216B). Returns [`Error::UnsupportedDevice`] otherwise.
pub fn scan_header(buffer: &SfdpBuffer) -> Result<SfdpHeader> {
    let raw = buffer.bytes_at(0, SFDP_HEADER_SIZE)?;
    log::debug!("SFDP header bytes: {:02X?}", raw);

    let header = SfdpHeader::read_from(buffer)?;

    if !header.is_valid() {
        log::debug!("SFDP signature invalid (expected 'SFDP')");
        return Err(Error::UnsupportedDevice);
    }

    if header.revision.major != MIN_SUPPORTED_REVISION.major {
        log::debug!("SFDP major version {} not supported", header.revision.major);
        return Err(Error::UnsupportedDevice);
    }

    if header.revision.minor < MIN_SUPPORTED_REVISION.minor {
        log::debug!(
            "SFDP revision {} older than {}",
            header.revision,
            MIN_SUPPORTED_REVISION
        );
        return Err(Error::UnsupportedDevice);
    }

    log::debug!(
        "SFDP header valid: revision {}, {} parameter header(s)",
        header.revision,
        header.num_param_headers()
    );

    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(bytes: [u8; 8]) -> Result<SfdpHeader> {
        scan_header(&SfdpBuffer::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_accepts_supported_revisions() {
        let h = header([b'S', b'F', b'D', b'P', 0x06, 0x01, 0x02, 0xFF]).unwrap();
        assert_eq!(h.revision, SfdpRevision::new(1, 6));
        assert_eq!(h.num_param_headers(), 3);

        assert!(header([b'S', b'F', b'D', b'P', 0x0A, 0x01, 0x00, 0xFF]).is_ok());
    }

    #[test]
    fn test_rejects_bad_signature() {
        assert_eq!(
            header([b'S', b'F', b'D', b'Q', 0x06, 0x01, 0x00, 0xFF]),
            Err(Error::UnsupportedDevice)
        );
        assert_eq!(header([0xFF; 8]), Err(Error::UnsupportedDevice));
    }

    #[test]
    fn test_rejects_old_or_unknown_revision() {
        // JESD216A
        assert_eq!(
            header([b'S', b'F', b'D', b'P', 0x05, 0x01, 0x00, 0xFF]),
            Err(Error::UnsupportedDevice)
        );
        // Major 2
        assert_eq!(
            header([b'S', b'F', b'D', b'P', 0x06, 0x02, 0x00, 0xFF]),
            Err(Error::UnsupportedDevice)
        );
    }

    #[test]
    fn test_short_buffer() {
        let buf = SfdpBuffer::from_slice(b"SFDP").unwrap();
        assert_eq!(
            scan_header(&buf),
            Err(Error::OutOfRange { offset: 0, len: 4 })
        );
    }
}
