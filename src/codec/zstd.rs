//! Zstandard (ZSTD) compression codec.
//!
//! The generic 0-9 level is bucketed onto zstd's native scale, and the
//! thread hint enables zstdmt worker threads.

use std::io::{self, BufReader, Read, Write};

use zstd::stream::{Decoder as ZstdDecoder, Encoder as ZstdEncoderInner};

use super::{CodecMethod, Decoder, Encoder};

/// ZSTD decoder.
pub struct ZstdStreamDecoder<R> {
    inner: ZstdDecoder<'static, BufReader<R>>,
}

impl<R> std::fmt::Debug for ZstdStreamDecoder<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZstdStreamDecoder").finish_non_exhaustive()
    }
}

impl<R: Read + Send> ZstdStreamDecoder<R> {
    /// Creates a new ZSTD decoder.
    pub fn new(input: R) -> io::Result<Self> {
        let decoder = ZstdDecoder::new(input)?;
        Ok(Self { inner: decoder })
    }
}

impl<R: Read + Send> Read for ZstdStreamDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Read + Send> Decoder for ZstdStreamDecoder<R> {
    fn method(&self) -> Option<CodecMethod> {
        Some(CodecMethod::Zstd)
    }
}

/// ZSTD encoder options.
#[derive(Debug, Clone)]
pub struct ZstdEncoderOptions {
    /// Native compression level (1-22, default 3).
    pub level: i32,
    /// Worker threads; 0 means the available parallelism.
    pub threads: u32,
}

impl Default for ZstdEncoderOptions {
    fn default() -> Self {
        Self {
            level: 3,
            threads: 0,
        }
    }
}

impl ZstdEncoderOptions {
    /// Creates options from a generic 0-9 level.
    ///
    /// Levels are bucketed: 0-2 fastest, 3-5 default, 6-7 better, 8-9 best.
    pub fn with_level(level: u32) -> Self {
        let level = match level {
            0..=2 => 1,
            3..=5 => 3,
            6..=7 => 9,
            _ => 19,
        };
        Self {
            level,
            ..Default::default()
        }
    }

    /// Sets the worker thread hint.
    pub fn threads(mut self, threads: u32) -> Self {
        self.threads = threads;
        self
    }

    fn worker_count(&self) -> u32 {
        if self.threads > 0 {
            return self.threads;
        }
        std::thread::available_parallelism()
            .map(|n| n.get() as u32)
            .unwrap_or(1)
    }
}

/// ZSTD encoder.
pub struct ZstdStreamEncoder<'a, W: Write> {
    inner: ZstdEncoderInner<'a, W>,
}

impl<W: Write> std::fmt::Debug for ZstdStreamEncoder<'_, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZstdStreamEncoder").finish_non_exhaustive()
    }
}

impl<'a, W: Write + Send> ZstdStreamEncoder<'a, W> {
    /// Creates a new ZSTD encoder.
    pub fn new(output: W, options: &ZstdEncoderOptions) -> io::Result<Self> {
        let mut encoder = ZstdEncoderInner::new(output, options.level)?;
        let workers = options.worker_count();
        if workers > 1 {
            encoder.multithread(workers)?;
        }
        Ok(Self { inner: encoder })
    }

    /// Finishes encoding and returns the underlying writer.
    pub fn try_finish(self) -> io::Result<W> {
        self.inner.finish()
    }
}

impl<W: Write + Send> Write for ZstdStreamEncoder<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<'a, W: Write + Send + 'a> Encoder for ZstdStreamEncoder<'a, W> {
    fn method(&self) -> Option<CodecMethod> {
        Some(CodecMethod::Zstd)
    }

    fn finish(self: Box<Self>) -> io::Result<()> {
        self.inner.finish()?;
        Ok(())
    }
}
