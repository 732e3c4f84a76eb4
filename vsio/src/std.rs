// SPDX-License-Identifier: MIT

use std::io::{Error, ErrorKind, Read, Seek, SeekFrom, Write};

use crate::{VsIO, VsIOError, VsIOResult};

/// `VsIO` over any seekable std stream (image file, cursor, ...).
#[derive(Debug)]
pub struct StdVsIO<'a, T: Read + Write + Seek> {
    io: &'a mut T,
}

impl<'a, T: Read + Write + Seek> StdVsIO<'a, T> {
    #[inline]
    pub fn new(io: &'a mut T) -> Self {
        Self { io }
    }

    #[inline]
    pub fn into_inner(self) -> &'a mut T {
        self.io
    }
}

impl<'a, T: Read + Write + Seek> VsIO for StdVsIO<'a, T> {
    fn write_at(&mut self, offset: u64, data: &[u8]) -> VsIOResult {
        self.io.seek(SeekFrom::Start(offset))?;
        self.io.write_all(data)?;
        Ok(())
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> VsIOResult {
        self.io.seek(SeekFrom::Start(offset))?;
        self.io.read_exact(buf)?;
        Ok(())
    }

    fn flush(&mut self) -> VsIOResult {
        self.io.flush()?;
        Ok(())
    }
}

impl From<Error> for VsIOError {
    #[cold]
    #[inline(never)]
    fn from(e: Error) -> Self {
        match e.kind() {
            // A short image reads past its end
            ErrorKind::UnexpectedEof => VsIOError::OutOfBounds,
            ErrorKind::Unsupported => VsIOError::Unsupported,
            ErrorKind::InvalidInput => VsIOError::Invalid("invalid seek or I/O argument"),
            ErrorKind::PermissionDenied => VsIOError::Other("permission denied"),
            ErrorKind::NotFound => VsIOError::Other("not found"),
            ErrorKind::WriteZero => VsIOError::Other("write returned zero bytes"),
            ErrorKind::Interrupted => VsIOError::Other("interrupted"),
            _ => VsIOError::Other("I/O error"),
        }
    }
}
