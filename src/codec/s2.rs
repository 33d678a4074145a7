//! S2 codec over the Snappy framing format.
//!
//! S2 readers accept Snappy-framed streams, so archives are written in the
//! Snappy framing format, which both S2 and Snappy tools can read back. There
//! are no compression levels.
//!
//! Reading covers only the Snappy-compatible subset. Streams from S2
//! writers that use S2 block extensions (the default of Go's `s2.NewWriter`)
//! fail with a codec error; write them with `s2.WriterSnappyCompat()` to
//! make them readable here.

use std::io::{self, Read, Write};

use snap::read::FrameDecoder;
use snap::write::FrameEncoder;

use super::{CodecMethod, Decoder, Encoder};

/// S2 / Snappy frame decoder.
pub struct S2Decoder<R: Read> {
    inner: FrameDecoder<R>,
}

impl<R: Read> std::fmt::Debug for S2Decoder<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S2Decoder").finish_non_exhaustive()
    }
}

impl<R: Read + Send> S2Decoder<R> {
    /// Creates a new S2 decoder.
    pub fn new(input: R) -> Self {
        Self {
            inner: FrameDecoder::new(input),
        }
    }
}

impl<R: Read + Send> Read for S2Decoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Read + Send> Decoder for S2Decoder<R> {
    fn method(&self) -> Option<CodecMethod> {
        Some(CodecMethod::S2)
    }
}

/// S2 / Snappy frame encoder.
pub struct S2Encoder<W: Write> {
    inner: FrameEncoder<W>,
}

impl<W: Write> std::fmt::Debug for S2Encoder<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S2Encoder").finish_non_exhaustive()
    }
}

impl<W: Write + Send> S2Encoder<W> {
    /// Creates a new S2 encoder.
    pub fn new(output: W) -> Self {
        Self {
            inner: FrameEncoder::new(output),
        }
    }

    /// Flushes the last frame and returns the underlying writer.
    pub fn try_finish(self) -> io::Result<W> {
        self.inner
            .into_inner()
            .map_err(|e| io::Error::new(e.error().kind(), e.error().to_string()))
    }
}

impl<W: Write + Send> Write for S2Encoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Write + Send> Encoder for S2Encoder<W> {
    fn method(&self) -> Option<CodecMethod> {
        Some(CodecMethod::S2)
    }

    fn finish(self: Box<Self>) -> io::Result<()> {
        self.try_finish()?;
        Ok(())
    }
}
