//! Gzip and zlib codecs, both framing raw Deflate.

use std::io::{self, Read, Write};

use flate2::Compression;
use flate2::read::{MultiGzDecoder, ZlibDecoder as FlateZlibDecoder};
use flate2::write::{GzEncoder, ZlibEncoder as FlateZlibEncoder};

use super::{CodecMethod, Decoder, Encoder};

/// Deflate encoder options shared by gzip and zlib.
#[derive(Debug, Clone)]
pub struct DeflateEncoderOptions {
    /// Compression level (0-9, default 6).
    pub level: u32,
}

impl Default for DeflateEncoderOptions {
    fn default() -> Self {
        Self { level: 6 }
    }
}

impl DeflateEncoderOptions {
    /// Creates options with the given compression level.
    pub fn with_level(level: u32) -> Self {
        Self {
            level: level.min(9),
        }
    }
}

/// Gzip decoder.
///
/// Concatenated gzip members are decoded as one stream.
pub struct GzipDecoder<R> {
    inner: MultiGzDecoder<R>,
}

impl<R> std::fmt::Debug for GzipDecoder<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GzipDecoder").finish_non_exhaustive()
    }
}

impl<R: Read + Send> GzipDecoder<R> {
    /// Creates a new gzip decoder.
    pub fn new(input: R) -> Self {
        Self {
            inner: MultiGzDecoder::new(input),
        }
    }
}

impl<R: Read + Send> Read for GzipDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Read + Send> Decoder for GzipDecoder<R> {
    fn method(&self) -> Option<CodecMethod> {
        Some(CodecMethod::Gzip)
    }
}

/// Gzip encoder.
pub struct GzipEncoder<W: Write> {
    inner: GzEncoder<W>,
}

impl<W: Write> std::fmt::Debug for GzipEncoder<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GzipEncoder").finish_non_exhaustive()
    }
}

impl<W: Write + Send> GzipEncoder<W> {
    /// Creates a new gzip encoder.
    ///
    /// # Arguments
    ///
    /// * `output` - The destination for compressed data
    /// * `options` - Encoder options
    pub fn new(output: W, options: &DeflateEncoderOptions) -> Self {
        Self {
            inner: GzEncoder::new(output, Compression::new(options.level)),
        }
    }

    /// Finishes encoding and flushes all data.
    pub fn try_finish(self) -> io::Result<W> {
        self.inner.finish()
    }
}

impl<W: Write + Send> Write for GzipEncoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Write + Send> Encoder for GzipEncoder<W> {
    fn method(&self) -> Option<CodecMethod> {
        Some(CodecMethod::Gzip)
    }

    fn finish(self: Box<Self>) -> io::Result<()> {
        self.inner.finish()?;
        Ok(())
    }
}

/// Zlib decoder.
pub struct ZlibDecoder<R> {
    inner: FlateZlibDecoder<R>,
}

impl<R> std::fmt::Debug for ZlibDecoder<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZlibDecoder").finish_non_exhaustive()
    }
}

impl<R: Read + Send> ZlibDecoder<R> {
    /// Creates a new zlib decoder.
    pub fn new(input: R) -> Self {
        Self {
            inner: FlateZlibDecoder::new(input),
        }
    }
}

impl<R: Read + Send> Read for ZlibDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Read + Send> Decoder for ZlibDecoder<R> {
    fn method(&self) -> Option<CodecMethod> {
        Some(CodecMethod::Zlib)
    }
}

/// Zlib encoder.
pub struct ZlibEncoder<W: Write> {
    inner: FlateZlibEncoder<W>,
}

impl<W: Write> std::fmt::Debug for ZlibEncoder<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZlibEncoder").finish_non_exhaustive()
    }
}

impl<W: Write + Send> ZlibEncoder<W> {
    /// Creates a new zlib encoder.
    pub fn new(output: W, options: &DeflateEncoderOptions) -> Self {
        Self {
            inner: FlateZlibEncoder::new(output, Compression::new(options.level)),
        }
    }

    /// Finishes encoding and flushes all data.
    pub fn try_finish(self) -> io::Result<W> {
        self.inner.finish()
    }
}

impl<W: Write + Send> Write for ZlibEncoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Write + Send> Encoder for ZlibEncoder<W> {
    fn method(&self) -> Option<CodecMethod> {
        Some(CodecMethod::Zlib)
    }

    fn finish(self: Box<Self>) -> io::Result<()> {
        self.inner.finish()?;
        Ok(())
    }
}
