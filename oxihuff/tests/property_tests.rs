use oxihuff::{
    CanonicalCode, CodeTree, CompressedArtifact, Decompressor, FrequencyTable, HuffmanDecoder,
    compress, decode, decompress, encode,
};
use proptest::prelude::*;
use std::io::Cursor;

/// Bytes drawn from a small alphabet, so codes of different lengths appear.
fn skewed_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        prop_oneof![
            8 => Just(b'e'),
            4 => Just(b't'),
            2 => 0u8..8,
            1 => any::<u8>(),
        ],
        0..2000,
    )
}

proptest! {
    #[test]
    fn test_roundtrip(input in prop::collection::vec(any::<u8>(), 0..4096)) {
        let artifact = encode(&input);
        prop_assert_eq!(decode(&artifact).unwrap(), input.clone());
        prop_assert_eq!(decompress(&artifact.to_bytes()).unwrap(), input);
    }

    #[test]
    fn test_roundtrip_skewed(input in skewed_bytes()) {
        prop_assert_eq!(decompress(&compress(&input)).unwrap(), input);
    }

    #[test]
    fn test_codes_are_prefix_free(input in skewed_bytes()) {
        let table = FrequencyTable::from_bytes(&input);
        if let Some(tree) = CodeTree::build(&table) {
            let code = CanonicalCode::from_tree(&tree);
            prop_assert!(code.code_table().is_prefix_free());
            prop_assert_eq!(code.len(), table.distinct_symbols());
        }
    }

    #[test]
    fn test_payload_bounds(input in skewed_bytes()) {
        let artifact = encode(&input);
        let table = FrequencyTable::from_bytes(&input);
        let n = input.len() as u64;

        prop_assert_eq!(artifact.payload().len() as u64, artifact.bit_count().div_ceil(8));
        if table.distinct_symbols() > 1 {
            // Huffman codes stay within one bit per symbol of the entropy
            prop_assert!((artifact.bit_count() as f64) < table.entropy_bits() + n as f64 + 1e-6);
            prop_assert!(artifact.bit_count() <= 8 * n);
        } else {
            prop_assert_eq!(artifact.bit_count(), n);
        }
    }

    #[test]
    fn test_code_table_size(input in prop::collection::vec(any::<u8>(), 0..4096)) {
        let artifact = encode(&input);
        prop_assert!(artifact.code_lengths().len() * 2 <= 512);
        prop_assert_eq!(
            artifact.serialized_len(),
            23 + artifact.code_lengths().len() * 2 + artifact.payload().len()
        );
    }

    #[test]
    fn test_deterministic(input in skewed_bytes()) {
        prop_assert_eq!(compress(&input), compress(&input));
    }

    #[test]
    fn test_corruption_never_panics(
        input in prop::collection::vec(any::<u8>(), 1..512),
        position in any::<usize>(),
        flip in 1u8..=255,
    ) {
        let mut bytes = compress(&input);
        let at = position % bytes.len();
        bytes[at] ^= flip;
        // Any outcome but a panic is acceptable
        if let Ok(artifact) = CompressedArtifact::from_bytes(&bytes) {
            let _ = decode(&artifact);
        }
        if let Ok(artifact) = CompressedArtifact::read_from(&mut Cursor::new(&bytes)) {
            let _ = decode(&artifact);
        }
        let _ = HuffmanDecoder::new().decompress_all(&bytes);
    }

    #[test]
    fn test_corrupt_bit_count_never_panics(
        input in prop::collection::vec(any::<u8>(), 1..256),
        bit_count in any::<u64>(),
    ) {
        let artifact = encode(&input);
        let mut bytes = artifact.to_bytes();
        let at = 15 + artifact.code_lengths().len() * 2;
        bytes[at..at + 8].copy_from_slice(&bit_count.to_be_bytes());

        let _ = decompress(&bytes);
        if let Ok(artifact) = CompressedArtifact::read_from(&mut Cursor::new(&bytes)) {
            let _ = decode(&artifact);
        }
        let _ = HuffmanDecoder::new().decompress_all(&bytes);
    }
}
