//! Brotli compression codec.
//!
//! Brotli is a compression algorithm developed by Google, optimized for web
//! content. The generic level is used directly as the Brotli quality, so
//! levels 10 and 11 are never selected.

use std::io::{self, Read, Write};

use brotli::CompressorWriter;
use brotli::Decompressor;

use super::{CodecMethod, Decoder, Encoder};

/// Default buffer size for the Brotli reader and writer.
const BUFFER_SIZE: usize = 4096;

/// Brotli decoder.
pub struct BrotliDecoder<R: Read> {
    inner: Decompressor<R>,
}

impl<R: Read> std::fmt::Debug for BrotliDecoder<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrotliDecoder").finish_non_exhaustive()
    }
}

impl<R: Read + Send> BrotliDecoder<R> {
    /// Creates a new Brotli decoder.
    pub fn new(input: R) -> Self {
        Self {
            inner: Decompressor::new(input, BUFFER_SIZE),
        }
    }
}

impl<R: Read + Send> Read for BrotliDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Read + Send> Decoder for BrotliDecoder<R> {
    fn method(&self) -> Option<CodecMethod> {
        Some(CodecMethod::Brotli)
    }
}

/// Brotli encoder options.
#[derive(Debug, Clone)]
pub struct BrotliEncoderOptions {
    /// Compression quality (0-11, default 4).
    pub quality: u32,
    /// LG window size (10-24, default 22).
    pub lg_window_size: u32,
}

impl Default for BrotliEncoderOptions {
    fn default() -> Self {
        Self {
            quality: 4,
            lg_window_size: 22,
        }
    }
}

impl BrotliEncoderOptions {
    /// Creates options with the given quality.
    pub fn with_level(level: u32) -> Self {
        Self {
            quality: level.min(11),
            ..Default::default()
        }
    }
}

/// Brotli encoder.
pub struct BrotliEncoder<W: Write> {
    inner: CompressorWriter<W>,
}

impl<W: Write> std::fmt::Debug for BrotliEncoder<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrotliEncoder").finish_non_exhaustive()
    }
}

impl<W: Write + Send> BrotliEncoder<W> {
    /// Creates a new Brotli encoder.
    pub fn new(output: W, options: &BrotliEncoderOptions) -> Self {
        Self {
            inner: CompressorWriter::new(
                output,
                BUFFER_SIZE,
                options.quality,
                options.lg_window_size,
            ),
        }
    }

    /// Finishes encoding and returns the underlying writer.
    pub fn try_finish(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner.into_inner())
    }
}

impl<W: Write + Send> Write for BrotliEncoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Write + Send> Encoder for BrotliEncoder<W> {
    fn method(&self) -> Option<CodecMethod> {
        Some(CodecMethod::Brotli)
    }

    fn finish(self: Box<Self>) -> io::Result<()> {
        self.try_finish()?;
        Ok(())
    }
}
