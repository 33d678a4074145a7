//! Stream compression codecs wrapping a whole tar archive.
//!
//! A tar archive is optionally wrapped end-to-end by exactly one codec. This
//! module hides the differences between algorithms behind the [`Encoder`] and
//! [`Decoder`] traits, so the rest of the crate never branches on the
//! algorithm:
//!
//! - [`open_writer`] wraps a raw sink in the encoder selected by
//!   [`CompressionOptions`].
//! - [`open_reader`] wraps a raw source in the matching decoder.
//!
//! With no algorithm selected, both are pass-through.

#[cfg(feature = "deflate")]
pub mod deflate;

#[cfg(feature = "bzip2")]
pub mod bzip2;

#[cfg(feature = "xz")]
pub mod xz;

#[cfg(feature = "lz4")]
pub mod lz4;

#[cfg(feature = "zstd")]
pub mod zstd;

#[cfg(feature = "s2")]
pub mod s2;

#[cfg(feature = "brotli")]
pub mod brotli;

mod copy;

use std::fmt;
use std::io::{self, Read, Write};
use std::str::FromStr;

use crate::{Error, Result};

/// Default compression level used when none is given.
pub const DEFAULT_LEVEL: u32 = 4;

/// A decoder that reads compressed data and produces uncompressed output.
pub trait Decoder: Read + Send {
    /// Returns the algorithm this decoder undoes, or `None` for pass-through.
    fn method(&self) -> Option<CodecMethod>;
}

/// An encoder that takes uncompressed data and produces compressed output.
pub trait Encoder: Write + Send {
    /// Returns the algorithm this encoder applies, or `None` for pass-through.
    fn method(&self) -> Option<CodecMethod>;

    /// Finishes encoding and writes the codec trailer.
    ///
    /// The compressed stream is incomplete until this returns successfully.
    fn finish(self: Box<Self>) -> io::Result<()>;
}

pub use copy::{CopyDecoder, CopyEncoder};

#[cfg(feature = "deflate")]
pub use self::deflate::{
    DeflateEncoderOptions, GzipDecoder, GzipEncoder, ZlibDecoder, ZlibEncoder,
};

#[cfg(feature = "bzip2")]
pub use self::bzip2::{Bzip2Decoder, Bzip2Encoder, Bzip2EncoderOptions};

#[cfg(feature = "xz")]
pub use self::xz::{LzmaAloneDecoder, LzmaAloneEncoder, XzDecoder, XzEncoder, XzEncoderOptions};

#[cfg(feature = "lz4")]
pub use self::lz4::{Lz4Decoder, Lz4Encoder};

#[cfg(feature = "zstd")]
pub use self::zstd::{ZstdEncoderOptions, ZstdStreamDecoder, ZstdStreamEncoder};

#[cfg(feature = "s2")]
pub use self::s2::{S2Decoder, S2Encoder};

#[cfg(feature = "brotli")]
pub use self::brotli::{BrotliDecoder, BrotliEncoder, BrotliEncoderOptions};

/// Compression algorithms that can wrap an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CodecMethod {
    /// Gzip (RFC 1952).
    Gzip,
    /// Zlib (RFC 1950).
    Zlib,
    /// BZip2.
    Bzip2,
    /// XZ container with LZMA2.
    Xz,
    /// Legacy `.lzma` (LZMA-alone) container.
    Lzma,
    /// LZ4 frame format.
    Lz4,
    /// Zstandard.
    Zstd,
    /// S2 / Snappy framing format. Only the Snappy-compatible subset of S2
    /// can be read.
    S2,
    /// Brotli.
    Brotli,
}

impl CodecMethod {
    /// Every algorithm, in identifier order.
    pub const ALL: [CodecMethod; 9] = [
        Self::Gzip,
        Self::Zlib,
        Self::Bzip2,
        Self::Xz,
        Self::Lzma,
        Self::Lz4,
        Self::Zstd,
        Self::S2,
        Self::Brotli,
    ];

    /// Returns the lowercase identifier of this algorithm.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Zlib => "zlib",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Lzma => "lzma",
            Self::Lz4 => "lz4",
            Self::Zstd => "zstd",
            Self::S2 => "s2",
            Self::Brotli => "brotli",
        }
    }

    /// Returns whether this codec is available in the current build.
    ///
    /// # Examples
    ///
    /// ```
    /// use retar::codec::CodecMethod;
    ///
    /// if CodecMethod::Zstd.is_available() {
    ///     println!("zstd compression is available");
    /// }
    /// ```
    pub fn is_available(&self) -> bool {
        match self {
            Self::Gzip | Self::Zlib => cfg!(feature = "deflate"),
            Self::Bzip2 => cfg!(feature = "bzip2"),
            Self::Xz | Self::Lzma => cfg!(feature = "xz"),
            Self::Lz4 => cfg!(feature = "lz4"),
            Self::Zstd => cfg!(feature = "zstd"),
            Self::S2 => cfg!(feature = "s2"),
            Self::Brotli => cfg!(feature = "brotli"),
        }
    }

    /// Returns the feature flag name required for this codec.
    ///
    /// ```
    /// use retar::codec::CodecMethod;
    ///
    /// assert_eq!(CodecMethod::Gzip.required_feature(), "deflate");
    /// assert_eq!(CodecMethod::Lzma.required_feature(), "xz");
    /// ```
    pub fn required_feature(&self) -> &'static str {
        match self {
            Self::Gzip | Self::Zlib => "deflate",
            Self::Bzip2 => "bzip2",
            Self::Xz | Self::Lzma => "xz",
            Self::Lz4 => "lz4",
            Self::Zstd => "zstd",
            Self::S2 => "s2",
            Self::Brotli => "brotli",
        }
    }

    fn ensure_available(&self) -> Result<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(Error::UnsupportedFeature {
                feature: self.required_feature(),
            })
        }
    }
}

impl fmt::Display for CodecMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CodecMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.name() == lower)
            .ok_or_else(|| Error::UnknownCodec(s.to_string()))
    }
}

/// Options controlling how an archive stream is compressed.
///
/// # Example
///
/// ```rust
/// use retar::CompressionOptions;
/// use retar::codec::CodecMethod;
///
/// let options = CompressionOptions::new()
///     .method(CodecMethod::Zstd)
///     .level(7)?
///     .threads(4);
/// assert_eq!(options.method, Some(CodecMethod::Zstd));
/// # Ok::<(), retar::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionOptions {
    /// Algorithm wrapping the archive, `None` for a plain tar.
    pub method: Option<CodecMethod>,
    /// Generic level 0-9, reinterpreted per algorithm.
    pub level: u32,
    /// Worker thread hint; 0 means use the available parallelism.
    pub threads: u32,
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            method: None,
            level: DEFAULT_LEVEL,
            threads: 0,
        }
    }
}

impl CompressionOptions {
    /// Creates options for an uncompressed archive at the default level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the compression algorithm.
    pub fn method(mut self, method: CodecMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Selects the compression algorithm, or none.
    pub fn method_opt(mut self, method: Option<CodecMethod>) -> Self {
        self.method = method;
        self
    }

    /// Sets the compression level (0-9).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCompressionLevel`] if `level > 9`.
    pub fn level(mut self, level: u32) -> Result<Self> {
        if level > 9 {
            return Err(Error::InvalidCompressionLevel { level });
        }
        self.level = level;
        Ok(self)
    }

    /// Sets the compression level, clamping values above 9.
    pub fn level_clamped(mut self, level: u32) -> Self {
        self.level = level.min(9);
        self
    }

    /// Sets the worker thread hint.
    pub fn threads(mut self, threads: u32) -> Self {
        self.threads = threads;
        self
    }
}

/// Wraps `raw` in the encoder selected by `options`.
///
/// The caller must call [`Encoder::finish`] once all data has been written.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFeature`] if the algorithm was compiled out and
/// [`Error::Codec`] if the encoder cannot be initialized.
#[allow(unreachable_patterns)]
pub fn open_writer<'a, W: Write + Send + 'a>(
    raw: W,
    options: &CompressionOptions,
) -> Result<Box<dyn Encoder + 'a>> {
    let Some(method) = options.method else {
        return Ok(Box::new(CopyEncoder::new(raw)));
    };
    method.ensure_available()?;
    log::debug!("compressing archive with {} at level {}", method, options.level);

    match method {
        #[cfg(feature = "deflate")]
        CodecMethod::Gzip => Ok(Box::new(deflate::GzipEncoder::new(
            raw,
            &DeflateEncoderOptions::with_level(options.level),
        ))),

        #[cfg(feature = "deflate")]
        CodecMethod::Zlib => Ok(Box::new(deflate::ZlibEncoder::new(
            raw,
            &DeflateEncoderOptions::with_level(options.level),
        ))),

        #[cfg(feature = "bzip2")]
        CodecMethod::Bzip2 => Ok(Box::new(bzip2::Bzip2Encoder::new(
            raw,
            &Bzip2EncoderOptions::with_level(options.level),
        ))),

        #[cfg(feature = "xz")]
        CodecMethod::Xz => Ok(Box::new(xz::XzEncoder::new(
            raw,
            &XzEncoderOptions::with_level(options.level),
        ))),

        #[cfg(feature = "xz")]
        CodecMethod::Lzma => {
            let encoder =
                xz::LzmaAloneEncoder::new(raw, &XzEncoderOptions::with_level(options.level))
                    .map_err(|e| Error::codec("lzma", e))?;
            Ok(Box::new(encoder))
        }

        #[cfg(feature = "lz4")]
        CodecMethod::Lz4 => Ok(Box::new(lz4::Lz4Encoder::new(raw))),

        #[cfg(feature = "zstd")]
        CodecMethod::Zstd => {
            let opts = ZstdEncoderOptions::with_level(options.level).threads(options.threads);
            let encoder =
                zstd::ZstdStreamEncoder::new(raw, &opts).map_err(|e| Error::codec("zstd", e))?;
            Ok(Box::new(encoder))
        }

        #[cfg(feature = "s2")]
        CodecMethod::S2 => Ok(Box::new(s2::S2Encoder::new(raw))),

        #[cfg(feature = "brotli")]
        CodecMethod::Brotli => Ok(Box::new(brotli::BrotliEncoder::new(
            raw,
            &BrotliEncoderOptions::with_level(options.level),
        ))),

        _ => Err(Error::UnsupportedFeature {
            feature: method.required_feature(),
        }),
    }
}

/// Wraps `raw` in the decoder for `method`; `None` reads `raw` unchanged.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFeature`] if the algorithm was compiled out and
/// [`Error::Codec`] if the decoder cannot be initialized.
#[allow(unreachable_patterns)]
pub fn open_reader<'a, R: Read + Send + 'a>(
    raw: R,
    method: Option<CodecMethod>,
) -> Result<Box<dyn Decoder + 'a>> {
    let Some(method) = method else {
        return Ok(Box::new(CopyDecoder::new(raw)));
    };
    method.ensure_available()?;

    match method {
        #[cfg(feature = "deflate")]
        CodecMethod::Gzip => Ok(Box::new(deflate::GzipDecoder::new(raw))),

        #[cfg(feature = "deflate")]
        CodecMethod::Zlib => Ok(Box::new(deflate::ZlibDecoder::new(raw))),

        #[cfg(feature = "bzip2")]
        CodecMethod::Bzip2 => Ok(Box::new(bzip2::Bzip2Decoder::new(raw))),

        #[cfg(feature = "xz")]
        CodecMethod::Xz => Ok(Box::new(xz::XzDecoder::new(raw))),

        #[cfg(feature = "xz")]
        CodecMethod::Lzma => {
            let decoder = xz::LzmaAloneDecoder::new(raw).map_err(|e| Error::codec("lzma", e))?;
            Ok(Box::new(decoder))
        }

        #[cfg(feature = "lz4")]
        CodecMethod::Lz4 => Ok(Box::new(lz4::Lz4Decoder::new(raw))),

        #[cfg(feature = "zstd")]
        CodecMethod::Zstd => {
            let decoder =
                zstd::ZstdStreamDecoder::new(raw).map_err(|e| Error::codec("zstd", e))?;
            Ok(Box::new(decoder))
        }

        #[cfg(feature = "s2")]
        CodecMethod::S2 => Ok(Box::new(s2::S2Decoder::new(raw))),

        #[cfg(feature = "brotli")]
        CodecMethod::Brotli => Ok(Box::new(brotli::BrotliDecoder::new(raw))),

        _ => Err(Error::UnsupportedFeature {
            feature: method.required_feature(),
        }),
    }
}
