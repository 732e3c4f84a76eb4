// SPDX-License-Identifier: MIT

use crate::{VsIO, VsIOError, VsIOResult};

/// In-memory implementation of `VsIO`.
///
/// Useful for tests, benches and RAM-backed images.
#[derive(Debug)]
pub struct MemVsIO<'a> {
    buffer: &'a mut [u8],
}

impl<'a> MemVsIO<'a> {
    #[inline]
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer }
    }

    /// Size of the backing buffer in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[inline]
    fn check_bounds(&self, offset: u64, len: usize) -> VsIOResult<usize> {
        let end = offset
            .checked_add(len as u64)
            .ok_or(VsIOError::OutOfBounds)?;
        if end > self.buffer.len() as u64 {
            return Err(VsIOError::OutOfBounds);
        }
        Ok(offset as usize)
    }
}

impl<'a> VsIO for MemVsIO<'a> {
    #[inline(always)]
    fn write_at(&mut self, offset: u64, data: &[u8]) -> VsIOResult {
        let start = self.check_bounds(offset, data.len())?;
        self.buffer[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }

    #[inline(always)]
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> VsIOResult {
        let start = self.check_bounds(offset, buf.len())?;
        buf.copy_from_slice(&self.buffer[start..start + buf.len()]);
        Ok(())
    }

    #[inline]
    fn flush(&mut self) -> VsIOResult {
        Ok(())
    }
}

#[cfg(all(test, feature = "std"))]
mod test {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn test_rw() {
        let mut buf = [0u8; 256];
        let mut io = MemVsIO::new(&mut buf);
        io.write_at(10, &[1, 2, 3, 4]).unwrap();

        let mut output = [0u8; 4];
        io.read_at(10, &mut output).unwrap();
        assert_eq!(output, [1, 2, 3, 4]);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut buf = [0u8; 64];
        let mut io = MemVsIO::new(&mut buf);

        assert_eq!(io.write_at(60, &[0u8; 8]), Err(VsIOError::OutOfBounds));
        let mut out = [0u8; 8];
        assert_eq!(io.read_at(u64::MAX, &mut out), Err(VsIOError::OutOfBounds));
    }

    #[test]
    fn test_block_rw() {
        let mut buf = vec![0u8; 4 * 512];
        let mut io = MemVsIO::new(&mut buf);

        io.write_block(2, 512, &[0x5A; 512]).unwrap();
        let mut out = [0u8; 512];
        io.read_block(2, 512, &mut out).unwrap();
        assert_eq!(out, [0x5A; 512]);

        io.read_block(1, 512, &mut out).unwrap();
        assert_eq!(out, [0u8; 512]);

        assert!(matches!(
            io.read_block(0, 512, &mut out[..100]),
            Err(VsIOError::Invalid(_))
        ));
        assert_eq!(
            io.read_block(4, 512, &mut out),
            Err(VsIOError::OutOfBounds)
        );
    }

    #[test]
    fn test_u32_helpers() {
        let mut buf = [0u8; 16];
        let mut io = MemVsIO::new(&mut buf);

        io.write_u32_at(4, 0xD34D).unwrap();
        assert_eq!(io.read_u32_at(4).unwrap(), 0xD34D);
        drop(io);
        assert_eq!(&buf[4..8], &[0x4D, 0xD3, 0, 0]);
    }

    #[test]
    fn test_zero_fill() {
        let mut buf = [0xFF; 64];
        let mut io = MemVsIO::new(&mut buf);

        io.zero_fill(10, 8).unwrap();

        let mut output = [0xAA; 8];
        io.read_at(10, &mut output).unwrap();
        assert_eq!(output, [0u8; 8]);
    }
}
