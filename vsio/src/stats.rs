// SPDX-License-Identifier: MIT

use crate::{VsIO, VsIOResult};

/// Simple counters, no_std friendly.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct IoStats {
    pub reads: u64,
    pub read_bytes: u64,
    pub writes: u64,
    pub write_bytes: u64,
    pub flushes: u64,

    // Block alignment of each request
    pub aligned_reads: u64,
    pub unaligned_reads: u64,
    pub aligned_writes: u64,
    pub unaligned_writes: u64,

    pub max_read: u64,
    pub max_write: u64,
}

impl IoStats {
    #[inline]
    pub fn reset(&mut self) {
        *self = IoStats::default();
    }
}

/// Transparent instrumentation wrapper.
pub struct IOCounter<'a, IO: VsIO + ?Sized> {
    inner: &'a mut IO,
    pub stats: IoStats,
    /// Alignment unit used to classify requests (usually the block size).
    pub align: u64,
}

impl<'a, IO: VsIO + ?Sized> IOCounter<'a, IO> {
    #[inline]
    pub fn new(inner: &'a mut IO) -> Self {
        Self {
            inner,
            stats: IoStats::default(),
            align: 1,
        }
    }

    #[inline]
    pub fn with_align(inner: &'a mut IO, align: u64) -> Self {
        let align = if align == 0 { 1 } else { align };
        Self {
            inner,
            stats: IoStats::default(),
            align,
        }
    }

    #[inline]
    pub fn snapshot(&self) -> IoStats {
        self.stats
    }

    #[inline]
    pub fn into_inner(self) -> &'a mut IO {
        self.inner
    }
}

impl<'a, IO: VsIO + ?Sized> VsIO for IOCounter<'a, IO> {
    #[inline]
    fn write_at(&mut self, offset: u64, data: &[u8]) -> VsIOResult {
        let len = data.len() as u64;
        if offset % self.align == 0 && len % self.align == 0 {
            self.stats.aligned_writes += 1;
        } else {
            self.stats.unaligned_writes += 1;
        }

        self.stats.writes += 1;
        self.stats.write_bytes += len;
        self.stats.max_write = self.stats.max_write.max(len);

        self.inner.write_at(offset, data)
    }

    #[inline]
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> VsIOResult {
        let len = buf.len() as u64;
        if offset % self.align == 0 && len % self.align == 0 {
            self.stats.aligned_reads += 1;
        } else {
            self.stats.unaligned_reads += 1;
        }

        self.stats.reads += 1;
        self.stats.read_bytes += len;
        self.stats.max_read = self.stats.max_read.max(len);

        self.inner.read_at(offset, buf)
    }

    #[inline]
    fn flush(&mut self) -> VsIOResult {
        self.stats.flushes += 1;
        self.inner.flush()
    }
}

/// Hooks called before each request reaches the wrapped device.
pub trait IOTracer {
    fn on_read(&mut self, _off: u64, _len: usize) {}
    fn on_write(&mut self, _off: u64, _len: usize) {}
    fn on_flush(&mut self) {}
}

pub struct TracingIO<'a, IO: VsIO + ?Sized, Tr: IOTracer> {
    inner: &'a mut IO,
    tracer: Tr,
}

impl<'a, IO: VsIO + ?Sized, Tr: IOTracer> TracingIO<'a, IO, Tr> {
    #[inline]
    pub fn new(inner: &'a mut IO, tracer: Tr) -> Self {
        Self { inner, tracer }
    }

    #[inline]
    pub fn tracer(&self) -> &Tr {
        &self.tracer
    }

    #[inline]
    pub fn into_tracer(self) -> Tr {
        self.tracer
    }
}

impl<'a, IO: VsIO + ?Sized, Tr: IOTracer> VsIO for TracingIO<'a, IO, Tr> {
    fn write_at(&mut self, off: u64, data: &[u8]) -> VsIOResult {
        self.tracer.on_write(off, data.len());
        self.inner.write_at(off, data)
    }
    fn read_at(&mut self, off: u64, buf: &mut [u8]) -> VsIOResult {
        self.tracer.on_read(off, buf.len());
        self.inner.read_at(off, buf)
    }
    fn flush(&mut self) -> VsIOResult {
        self.tracer.on_flush();
        self.inner.flush()
    }
}
