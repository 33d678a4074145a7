//! Pass-through codec for uncompressed archives.

use std::io::{self, Read, Write};

use super::{CodecMethod, Decoder, Encoder};

/// A decoder that passes data through unchanged (no compression).
#[derive(Debug)]
pub struct CopyDecoder<R> {
    inner: R,
}

impl<R: Read + Send> CopyDecoder<R> {
    /// Creates a new copy decoder.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: Read + Send> Read for CopyDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Read + Send> Decoder for CopyDecoder<R> {
    fn method(&self) -> Option<CodecMethod> {
        None
    }
}

/// An encoder that writes data through unchanged.
#[derive(Debug)]
pub struct CopyEncoder<W> {
    inner: W,
}

impl<W: Write + Send> CopyEncoder<W> {
    /// Creates a new copy encoder.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: Write + Send> Write for CopyEncoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Write + Send> Encoder for CopyEncoder<W> {
    fn method(&self) -> Option<CodecMethod> {
        None
    }

    fn finish(mut self: Box<Self>) -> io::Result<()> {
        self.inner.flush()
    }
}
