//! XZ and legacy LZMA-alone codecs.
//!
//! Both containers are handled by liblzma through `xz2`. The generic level
//! maps directly onto the liblzma preset (0-9).

use std::io::{self, Read, Write};

use xz2::read::XzDecoder as LzmaReader;
use xz2::stream::{LzmaOptions, Stream};
use xz2::write::XzEncoder as LzmaWriter;

use super::{CodecMethod, Decoder, Encoder};

/// XZ / LZMA encoder options.
#[derive(Debug, Clone)]
pub struct XzEncoderOptions {
    /// liblzma preset (0-9, default 6).
    pub preset: u32,
}

impl Default for XzEncoderOptions {
    fn default() -> Self {
        Self { preset: 6 }
    }
}

impl XzEncoderOptions {
    /// Creates options with the given compression level.
    pub fn with_level(level: u32) -> Self {
        Self {
            preset: level.min(9),
        }
    }
}

/// XZ decoder.
///
/// Concatenated `.xz` streams are decoded as one.
pub struct XzDecoder<R: Read> {
    inner: LzmaReader<R>,
}

impl<R: Read> std::fmt::Debug for XzDecoder<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XzDecoder").finish_non_exhaustive()
    }
}

impl<R: Read + Send> XzDecoder<R> {
    /// Creates a new XZ decoder.
    pub fn new(input: R) -> Self {
        Self {
            inner: LzmaReader::new_multi_decoder(input),
        }
    }
}

impl<R: Read + Send> Read for XzDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Read + Send> Decoder for XzDecoder<R> {
    fn method(&self) -> Option<CodecMethod> {
        Some(CodecMethod::Xz)
    }
}

/// XZ encoder.
pub struct XzEncoder<W: Write> {
    inner: LzmaWriter<W>,
}

impl<W: Write> std::fmt::Debug for XzEncoder<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XzEncoder").finish_non_exhaustive()
    }
}

impl<W: Write + Send> XzEncoder<W> {
    /// Creates a new XZ encoder.
    pub fn new(output: W, options: &XzEncoderOptions) -> Self {
        Self {
            inner: LzmaWriter::new(output, options.preset),
        }
    }

    /// Finishes encoding and returns the underlying writer.
    pub fn try_finish(self) -> io::Result<W> {
        self.inner.finish()
    }
}

impl<W: Write + Send> Write for XzEncoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Write + Send> Encoder for XzEncoder<W> {
    fn method(&self) -> Option<CodecMethod> {
        Some(CodecMethod::Xz)
    }

    fn finish(self: Box<Self>) -> io::Result<()> {
        self.inner.finish()?;
        Ok(())
    }
}

/// Decoder for the legacy `.lzma` container.
pub struct LzmaAloneDecoder<R: Read> {
    inner: LzmaReader<R>,
}

impl<R: Read> std::fmt::Debug for LzmaAloneDecoder<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LzmaAloneDecoder").finish_non_exhaustive()
    }
}

impl<R: Read + Send> LzmaAloneDecoder<R> {
    /// Creates a new LZMA-alone decoder with no memory limit.
    pub fn new(input: R) -> io::Result<Self> {
        let stream = Stream::new_lzma_decoder(u64::MAX).map_err(io::Error::other)?;
        Ok(Self {
            inner: LzmaReader::new_stream(input, stream),
        })
    }
}

impl<R: Read + Send> Read for LzmaAloneDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Read + Send> Decoder for LzmaAloneDecoder<R> {
    fn method(&self) -> Option<CodecMethod> {
        Some(CodecMethod::Lzma)
    }
}

/// Encoder for the legacy `.lzma` container.
pub struct LzmaAloneEncoder<W: Write> {
    inner: LzmaWriter<W>,
}

impl<W: Write> std::fmt::Debug for LzmaAloneEncoder<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LzmaAloneEncoder").finish_non_exhaustive()
    }
}

impl<W: Write + Send> LzmaAloneEncoder<W> {
    /// Creates a new LZMA-alone encoder.
    pub fn new(output: W, options: &XzEncoderOptions) -> io::Result<Self> {
        let lzma_options = LzmaOptions::new_preset(options.preset).map_err(io::Error::other)?;
        let stream = Stream::new_lzma_encoder(&lzma_options).map_err(io::Error::other)?;
        Ok(Self {
            inner: LzmaWriter::new_stream(output, stream),
        })
    }

    /// Finishes encoding and returns the underlying writer.
    pub fn try_finish(self) -> io::Result<W> {
        self.inner.finish()
    }
}

impl<W: Write + Send> Write for LzmaAloneEncoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Write + Send> Encoder for LzmaAloneEncoder<W> {
    fn method(&self) -> Option<CodecMethod> {
        Some(CodecMethod::Lzma)
    }

    fn finish(self: Box<Self>) -> io::Result<()> {
        self.inner.finish()?;
        Ok(())
    }
}
