//! Compression transparency for every codec compiled in.
//!
//! An archive written through a codec must decode to exactly the members
//! that went in, for empty, tiny and multi-megabyte payloads, and editing it
//! must keep it in the same codec.

mod common;

use std::fs;

use retar::edit::EditOptions;
use retar::format::{encode_to_vec, read_entries};
use retar::{CodecMethod, CompressionOptions, Entry, Error};

use common::random_bytes;

fn available() -> impl Iterator<Item = CodecMethod> {
    CodecMethod::ALL.into_iter().filter(CodecMethod::is_available)
}

fn payloads() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("empty.bin", Vec::new()),
        ("one.bin", vec![0x42]),
        ("random.bin", random_bytes(3 * 1024 * 1024, 7)),
        ("text.txt", b"all work and no play\n".repeat(50_000)),
    ]
}

#[test]
fn test_every_codec_round_trips_payloads() {
    for method in available() {
        let options = CompressionOptions::new().method(method).threads(2);
        for (name, payload) in payloads() {
            let entries = vec![Entry::file(name, payload.clone())];
            let bytes = encode_to_vec(&entries, &options)
                .unwrap_or_else(|e| panic!("{method}: encoding {name} failed: {e}"));
            let decoded = read_entries(bytes.as_slice(), Some(method))
                .unwrap_or_else(|e| panic!("{method}: decoding {name} failed: {e}"));

            assert_eq!(decoded.len(), 1, "{method}/{name}");
            assert_eq!(decoded[0].content, payload, "{method}/{name}");
        }
    }
}

#[test]
fn test_every_codec_round_trips_empty_archive() {
    for method in available() {
        let options = CompressionOptions::new().method(method);
        let bytes = encode_to_vec(&[], &options).unwrap();
        let decoded = read_entries(bytes.as_slice(), Some(method)).unwrap();
        assert!(decoded.is_empty(), "{method}");
    }
}

#[test]
fn test_levels_change_output_not_content() {
    for method in available() {
        let payload = b"level test ".repeat(10_000);
        for level in [0, 4, 9] {
            let options = CompressionOptions::new().method(method).level(level).unwrap();
            let bytes = encode_to_vec(&[Entry::file("a", payload.clone())], &options).unwrap();
            let decoded = read_entries(bytes.as_slice(), Some(method)).unwrap();
            assert_eq!(decoded[0].content, payload, "{method} level {level}");
        }
    }
}

#[test]
fn test_edit_in_every_codec() {
    let dir = tempfile::tempdir().unwrap();
    for method in available() {
        let archive = dir.path().join(format!("a.tar.{}", method.name()));
        let compression = CompressionOptions::new().method(method);
        fs::write(
            &archive,
            common::build_archive(&compression, &[("keep", b"1"), ("drop", b"2")]),
        )
        .unwrap();

        let options = EditOptions::new().compression(compression.clone());
        retar::delete(&archive, ["drop"], &options).unwrap();
        retar::append(&archive, [Entry::file("new", b"3".to_vec())], &options).unwrap();

        let names: Vec<_> = retar::read_archive(&archive, Some(method))
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, ["keep", "new"], "{method}");
    }
}

#[test]
fn test_level_above_nine_is_rejected() {
    let err = CompressionOptions::new().level(10).unwrap_err();
    assert!(matches!(err, Error::InvalidCompressionLevel { level: 10 }));
    assert_eq!(CompressionOptions::new().level_clamped(42).level, 9);
}

#[test]
fn test_codec_names_parse() {
    for method in CodecMethod::ALL {
        assert_eq!(method.name().parse::<CodecMethod>().unwrap(), method);
    }
    assert!(matches!(
        "rar".parse::<CodecMethod>(),
        Err(Error::UnknownCodec(_))
    ));
}
