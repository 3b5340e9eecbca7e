//! Lempel-Ziv integration tests.

use compressfly_core::Codec;
use compressfly_lz::{LempelZivCodec, LzDecoder, LzEncoder, Token, compress, decompress};

/// Pseudo-random lowercase text. Literal bytes never include `^`, `@` or
/// `&`, so no token boundary can spell a marker.
fn lowercase_noise(len: usize, mut seed: u32) -> Vec<u8> {
    (0..len)
        .map(|_| {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            b'a' + ((seed >> 16) % 26) as u8
        })
        .collect()
}

fn max_index(tokens: &[Token]) -> u32 {
    tokens
        .iter()
        .map(|token| match *token {
            Token::Literal(_) => 0,
            Token::Phrase { index, .. } | Token::Final { index } => index,
        })
        .max()
        .unwrap_or(0)
}

#[test]
fn test_lz_roundtrip_simple() {
    let original = b"TOBEORNOTTOBEORTOBEORNOT";
    let compressed = compress(original).expect("compression failed");
    let decompressed = decompress(&compressed).expect("decompression failed");
    assert_eq!(decompressed, original);
}

#[test]
fn test_lz_repetitive_text_shrinks() {
    let original = b"This is a test of compression! ".repeat(200);
    let compressed = compress(&original).expect("compression failed");
    assert!(compressed.len() < original.len() / 2);
    assert_eq!(decompress(&compressed).unwrap(), original);
}

#[test]
fn test_lz_ends_with_pending_phrase() {
    for original in [&b"AAAA"[..], b"abcabcabc", b"x"] {
        let compressed = compress(original).unwrap();
        assert_eq!(decompress(&compressed).unwrap(), original);
    }
}

#[test]
fn test_lz_index_boundaries() {
    let original = lowercase_noise(500_000, 7);
    let tokens = LzEncoder::new().tokenize(&original).unwrap();
    let highest = max_index(&tokens);
    assert!(highest >= 65_536, "highest index was {highest}");

    let compressed = compress(&original).unwrap();
    assert_eq!(decompress(&compressed).unwrap(), original);
}

#[test]
fn test_lz_index_boundary_prefixes() {
    // Dictionaries for these prefixes end on either side of 256 entries.
    let original = lowercase_noise(4_000, 99);
    for len in [600, 700, 800, 900, 1_000, 4_000] {
        let slice = &original[..len];
        let compressed = compress(slice).unwrap();
        assert_eq!(decompress(&compressed).unwrap(), slice, "prefix {len}");
    }
}

#[test]
fn test_lz_frozen_dictionary_roundtrip() {
    let original = lowercase_noise(20_000, 3);
    let encoder = LzEncoder::with_max_index(300).unwrap();
    let decoder = LzDecoder::with_max_index(300).unwrap();

    let tokens = encoder.tokenize(&original).unwrap();
    assert!((256..=300).contains(&max_index(&tokens)));

    let compressed = encoder.encode(&original).unwrap();
    assert_eq!(decoder.decode(&compressed).unwrap(), original);
}

#[test]
fn test_lz_codec_trait() {
    let codec = LempelZivCodec::new();
    let original = b"the rain in spain falls mainly on the plain";
    let compressed = codec.compress(original).unwrap();
    assert_eq!(codec.decompress(&compressed).unwrap(), original);
    assert_eq!(codec.forbidden_markers().len(), 2);
}

#[test]
fn test_lz_corrupt_input() {
    assert!(decompress(&[5, b'a']).is_err());
    assert!(decompress(&[0]).is_err());
}
