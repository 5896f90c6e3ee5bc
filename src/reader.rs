//!
//! Byte-level reader for the IPP binary wire format
//!
use std::io::{self, Read};

use bytes::Bytes;

use crate::parser::IppParseError;

/// Thin wrapper around any [`Read`] that knows how to pull the big-endian
/// primitives the IPP wire format is built from.
pub struct IppReader<R> {
    inner: R,
}

impl<R: Read> IppReader<R> {
    /// Wrap a byte source
    pub fn new(inner: R) -> IppReader<R> {
        IppReader { inner }
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<(), IppParseError> {
        self.inner.read_exact(buf).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => IppParseError::Truncated,
            _ => IppParseError::Io(e.to_string()),
        })
    }

    pub fn read_u8(&mut self) -> Result<u8, IppParseError> {
        let mut buf = [0u8; 1];
        self.fill(&mut buf)?;
        Ok(buf[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, IppParseError> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16, IppParseError> {
        let mut buf = [0u8; 2];
        self.fill(&mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    pub fn read_i16(&mut self) -> Result<i16, IppParseError> {
        Ok(self.read_u16()? as i16)
    }

    pub fn read_u32(&mut self) -> Result<u32, IppParseError> {
        let mut buf = [0u8; 4];
        self.fill(&mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    pub fn read_i32(&mut self) -> Result<i32, IppParseError> {
        Ok(self.read_u32()? as i32)
    }

    /// Read exactly `len` bytes
    pub fn read_bytes(&mut self, len: usize) -> Result<Bytes, IppParseError> {
        let mut buf = vec![0u8; len];
        self.fill(&mut buf)?;
        Ok(Bytes::from(buf))
    }

    /// Read exactly `len` bytes and interpret them as a (lossily-decoded) string
    pub fn read_string(&mut self, len: usize) -> Result<String, IppParseError> {
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_big_endian_primitives() {
        let data = vec![0x00, 0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0x03];
        let mut reader = IppReader::new(Cursor::new(data));
        assert_eq!(reader.read_u16().unwrap(), 1);
        assert_eq!(reader.read_u16().unwrap(), 2);
        assert_eq!(reader.read_u32().unwrap(), 3);
    }

    #[test]
    fn truncated_read_is_classified() {
        let mut reader = IppReader::new(Cursor::new(vec![0x00]));
        assert!(matches!(reader.read_u16(), Err(IppParseError::Truncated)));
    }

    #[test]
    fn reads_strings_lossily() {
        let mut reader = IppReader::new(Cursor::new(b"hello".to_vec()));
        assert_eq!(reader.read_string(5).unwrap(), "hello");
    }
}
