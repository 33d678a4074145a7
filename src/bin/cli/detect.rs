//! Compression algorithm inference from archive file names.

use std::path::Path;

use retar::CodecMethod;

/// Guesses the codec from the last extension of `path`.
///
/// Anything unrecognized, including a plain `.tar`, means no compression.
pub fn method_from_path(path: &Path) -> Option<CodecMethod> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let method = match ext.as_str() {
        "gz" | "tgz" => CodecMethod::Gzip,
        "zz" | "zlib" => CodecMethod::Zlib,
        "br" => CodecMethod::Brotli,
        "bz2" => CodecMethod::Bzip2,
        "xz" => CodecMethod::Xz,
        "lzma" => CodecMethod::Lzma,
        "lz4" => CodecMethod::Lz4,
        "zst" | "zstd" => CodecMethod::Zstd,
        "s2" => CodecMethod::S2,
        _ => return None,
    };
    Some(method)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        let cases = [
            ("a.tar.gz", Some(CodecMethod::Gzip)),
            ("a.tgz", Some(CodecMethod::Gzip)),
            ("a.tar.zz", Some(CodecMethod::Zlib)),
            ("a.tar.br", Some(CodecMethod::Brotli)),
            ("a.tar.bz2", Some(CodecMethod::Bzip2)),
            ("a.tar.xz", Some(CodecMethod::Xz)),
            ("a.tar.lzma", Some(CodecMethod::Lzma)),
            ("a.tar.lz4", Some(CodecMethod::Lz4)),
            ("a.tar.ZST", Some(CodecMethod::Zstd)),
            ("a.tar.s2", Some(CodecMethod::S2)),
            ("a.tar", None),
            ("-", None),
            ("archive", None),
        ];
        for (name, expected) in cases {
            assert_eq!(method_from_path(Path::new(name)), expected, "{name}");
        }
    }
}
