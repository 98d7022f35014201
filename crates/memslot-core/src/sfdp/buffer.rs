//! Bounds-checked SFDP descriptor buffer

use crate::error::{Error, Result};
use heapless::Vec;

/// Largest descriptor area ever needed: the 8-byte SFDP header followed by
/// 256 parameter headers of 8 bytes each
pub const SFDP_BUFFER_CAPACITY: usize = 8 + 256 * 8;

/// Bytes retrieved from the SFDP address space
///
/// Every accessor checks the requested range against the number of bytes
/// actually delivered by the device and fails with [`Error::OutOfRange`]
/// instead of reading past them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SfdpBuffer {
    data: Vec<u8, SFDP_BUFFER_CAPACITY>,
}

impl SfdpBuffer {
    /// Create an empty buffer
    pub const fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Create a buffer holding a copy of `bytes`
    ///
    /// Fails with [`Error::BadParam`] if `bytes` exceeds the capacity.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let data = Vec::from_slice(bytes).map_err(|_| Error::BadParam)?;
        Ok(Self { data })
    }

    /// Create a zero-filled buffer of `len` bytes, ready to be filled by a
    /// device read through [`as_mut_slice`](Self::as_mut_slice)
    pub fn zeroed(len: usize) -> Result<Self> {
        let mut data = Vec::new();
        data.resize(len, 0).map_err(|_| Error::BadParam)?;
        Ok(Self { data })
    }

    /// Number of valid bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if no bytes were delivered
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The valid bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// The valid bytes, mutable
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Borrow `len` bytes starting at `offset`
    pub fn bytes_at(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let end = offset.checked_add(len).ok_or_else(|| self.out_of_range(offset))?;
        self.data.get(offset..end).ok_or_else(|| self.out_of_range(offset))
    }

    /// Read one byte
    pub fn read_u8_at(&self, offset: usize) -> Result<u8> {
        self.data
            .get(offset)
            .copied()
            .ok_or_else(|| self.out_of_range(offset))
    }

    /// Read a 24-bit little-endian value
    pub fn read_u24_le_at(&self, offset: usize) -> Result<u32> {
        let b = self.bytes_at(offset, 3)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], 0]))
    }

    /// Read a 32-bit little-endian value (one SFDP DWORD)
    pub fn read_u32_le_at(&self, offset: usize) -> Result<u32> {
        let b = self.bytes_at(offset, 4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn out_of_range(&self, offset: usize) -> Error {
        Error::OutOfRange {
            offset,
            len: self.data.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let buf = SfdpBuffer::from_slice(&[0x53, 0x46, 0x44, 0x50, 0x06, 0x01, 0x00]).unwrap();
        assert_eq!(buf.len(), 7);
        assert_eq!(buf.read_u8_at(4).unwrap(), 0x06);
        assert_eq!(buf.read_u24_le_at(4).unwrap(), 0x00_0106);
        assert_eq!(buf.read_u32_le_at(0).unwrap(), 0x5044_4653);
    }

    #[test]
    fn test_out_of_range() {
        let buf = SfdpBuffer::from_slice(&[0u8; 7]).unwrap();
        assert_eq!(
            buf.read_u8_at(7),
            Err(Error::OutOfRange { offset: 7, len: 7 })
        );
        // A DWORD straddling the end is rejected as a whole
        assert_eq!(
            buf.read_u32_le_at(4),
            Err(Error::OutOfRange { offset: 4, len: 7 })
        );
        assert!(buf.bytes_at(usize::MAX, 2).is_err());
        assert!(SfdpBuffer::new().read_u8_at(0).is_err());
    }

    #[test]
    fn test_capacity() {
        assert!(SfdpBuffer::zeroed(SFDP_BUFFER_CAPACITY).is_ok());
        assert_eq!(
            SfdpBuffer::zeroed(SFDP_BUFFER_CAPACITY + 1),
            Err(Error::BadParam)
        );
    }
}
