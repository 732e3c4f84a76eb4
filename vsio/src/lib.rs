// SPDX-License-Identifier: MIT
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Core modules
pub mod errors;
pub mod stats;

// Backend modules
#[cfg(feature = "mem")]
mod mem;

#[cfg(feature = "std")]
mod std;

// Prelude re-exports (central entrypoint)
pub mod prelude {
    pub use super::VsIO;
    pub use super::VsIOBlockExt;
    pub use super::VsIOExt;
    pub use super::VsIOStructExt;
    pub use super::errors::*;
    pub use super::stats::*;

    #[cfg(feature = "mem")]
    pub use super::mem::MemVsIO;

    #[cfg(feature = "std")]
    pub use super::std::StdVsIO;
}

// Internal use
use errors::*;

// Constants

/// Maximum size of internal scratch buffer (used for chunked ops and `read_struct`).
/// 4 KiB = one VSFS block, also the typical page size.
pub const BLOCK_BUF_SIZE: usize = 4096;

// Traits

/// Block IO abstraction trait.
///
/// Allows read/write/flush at arbitrary offsets.
/// Implementations may target RAM, image files, block devices, etc.
pub trait VsIO {
    /// Writes `data` at `offset` (absolute).
    fn write_at(&mut self, offset: u64, data: &[u8]) -> VsIOResult;

    /// Reads `buf.len()` bytes into `buf` from `offset` (absolute).
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> VsIOResult;
    /// Flushes any buffered data (may be a no-op).
    fn flush(&mut self) -> VsIOResult;
}

/// Extension helpers for VsIO.
///
/// - chunked reads/writes
/// - zero fill
/// - little-endian u32 helpers
pub trait VsIOExt: VsIO {
    /// Reads `buf.len()` bytes from `offset` in chunks of `chunk_size` or less.
    #[inline(always)]
    fn read_in_chunks(&mut self, offset: u64, buf: &mut [u8], chunk_size: usize) -> VsIOResult {
        let mut remaining = buf.len();
        let mut off = offset;
        let mut pos = 0;

        while remaining > 0 {
            let to_read = remaining.min(chunk_size);
            self.read_at(off, &mut buf[pos..pos + to_read])?;
            off += to_read as u64;
            pos += to_read;
            remaining -= to_read;
        }

        Ok(())
    }

    /// Writes `buf.len()` bytes at `offset` in chunks of `chunk_size` or less.
    #[inline(always)]
    fn write_in_chunks(&mut self, offset: u64, buf: &[u8], chunk_size: usize) -> VsIOResult {
        let mut remaining = buf.len();
        let mut off = offset;
        let mut pos = 0;

        while remaining > 0 {
            let to_write = remaining.min(chunk_size);
            self.write_at(off, &buf[pos..pos + to_write])?;
            off += to_write as u64;
            pos += to_write;
            remaining -= to_write;
        }

        Ok(())
    }

    /// Fills a region with zeroes.
    ///
    /// Used when formatting: inode table and data region clears.
    #[inline(always)]
    fn zero_fill(&mut self, offset: u64, len: usize) -> VsIOResult {
        const ZERO_BUF: [u8; BLOCK_BUF_SIZE] = [0u8; BLOCK_BUF_SIZE];
        let mut remaining = len;
        let mut off = offset;
        while remaining > 0 {
            let chunk = remaining.min(ZERO_BUF.len());
            self.write_at(off, &ZERO_BUF[..chunk])?;
            off += chunk as u64;
            remaining -= chunk;
        }
        Ok(())
    }

    #[inline(always)]
    fn read_u32_at(&mut self, offset: u64) -> VsIOResult<u32> {
        let mut buf = [0u8; 4];
        self.read_at(offset, &mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    #[inline(always)]
    fn write_u32_at(&mut self, offset: u64, value: u32) -> VsIOResult {
        self.write_at(offset, &value.to_le_bytes())
    }
}

impl<T: VsIO + ?Sized> VsIOExt for T {}

/// Block-number addressing on top of byte offsets.
///
/// A device is seen as a sequence of `block_size` blocks; `buf.len()` must be
/// exactly one block.
pub trait VsIOBlockExt: VsIO {
    /// Reads block `block` into `buf`.
    ///
    /// # Errors
    /// Returns `VsIOError::Invalid` if `buf.len() != block_size`.
    #[inline]
    fn read_block(&mut self, block: u32, block_size: usize, buf: &mut [u8]) -> VsIOResult {
        if buf.len() != block_size {
            return Err(VsIOError::Invalid("read_block: buffer length mismatch"));
        }
        self.read_at(block as u64 * block_size as u64, buf)
    }

    /// Writes `buf` as block `block`.
    ///
    /// # Errors
    /// Returns `VsIOError::Invalid` if `buf.len() != block_size`.
    #[inline]
    fn write_block(&mut self, block: u32, block_size: usize, buf: &[u8]) -> VsIOResult {
        if buf.len() != block_size {
            return Err(VsIOError::Invalid("write_block: buffer length mismatch"));
        }
        self.write_at(block as u64 * block_size as u64, buf)
    }
}

impl<T: VsIO + ?Sized> VsIOBlockExt for T {}

/// Extension trait for reading and writing structs using zerocopy.
///
/// Provides helpers to read a struct from a given offset and write a struct at a given offset.
/// Requires the struct to implement zerocopy traits for safe conversion.
pub trait VsIOStructExt: VsIO {
    /// Reads a struct of type `T` from the given offset.
    fn read_struct<T: zerocopy::FromBytes + zerocopy::KnownLayout + zerocopy::Immutable>(
        &mut self,
        offset: u64,
    ) -> VsIOResult<T> {
        let size = core::mem::size_of::<T>();
        if size > BLOCK_BUF_SIZE {
            return Err(VsIOError::Invalid("read_struct: type too large"));
        }
        let mut buf = [0u8; BLOCK_BUF_SIZE];
        self.read_at(offset, &mut buf[..size])?;
        T::read_from_bytes(&buf[..size]).map_err(|_| VsIOError::Other("read_struct failed"))
    }

    /// Writes a struct of type `T` at the given offset.
    fn write_struct<T: zerocopy::IntoBytes + zerocopy::Immutable>(
        &mut self,
        offset: u64,
        val: &T,
    ) -> VsIOResult {
        let bytes = val.as_bytes();
        self.write_at(offset, bytes)
    }
}

impl<T: VsIO + ?Sized> VsIOStructExt for T {}
