//! Compression statistics without producing a payload.

use crate::code::CanonicalCode;
use crate::container::{BIT_COUNT_LEN, FIXED_HEADER_LEN};
use crate::frequency::FrequencyTable;
use crate::tree::CodeTree;
use std::fmt;

/// Size figures for compressing one input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionStats {
    /// Input length in bytes.
    pub original_len: u64,
    /// Number of distinct byte values.
    pub distinct_symbols: usize,
    /// Longest code length.
    pub max_code_length: u8,
    /// Packed payload size in bits.
    pub payload_bits: u64,
    /// Shannon lower bound for the payload in bits.
    pub entropy_bits: f64,
    /// Size of the complete serialized container in bytes.
    pub container_len: u64,
}

impl CompressionStats {
    /// Input size in bits at 8 bits per byte.
    pub fn original_bits(&self) -> u64 {
        self.original_len * 8
    }

    /// Payload bits per input byte, 0 for empty input.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.original_len == 0 {
            return 0.0;
        }
        self.payload_bits as f64 / self.original_len as f64
    }

    /// Payload size relative to the input size, 0 for empty input.
    pub fn payload_ratio(&self) -> f64 {
        if self.original_len == 0 {
            return 0.0;
        }
        self.payload_bits as f64 / self.original_bits() as f64
    }
}

impl fmt::Display for CompressionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Original size: {} bits", self.original_bits())?;
        writeln!(f, "Compressed size: {} bits", self.payload_bits)?;
        write!(
            f,
            "Container size: {} bytes ({} symbols, {:.3} bits/symbol, entropy {:.1} bits)",
            self.container_len,
            self.distinct_symbols,
            self.bits_per_symbol(),
            self.entropy_bits
        )
    }
}

/// Measure what [`encode`](crate::encode) would produce for `data`, without
/// packing any bits.
pub fn analyze(data: &[u8]) -> CompressionStats {
    let frequencies = FrequencyTable::from_bytes(data);
    let code = CodeTree::build(&frequencies).map(|tree| CanonicalCode::from_tree(&tree));

    let (payload_bits, distinct, max_len) = match &code {
        Some(code) => (
            code.code_table().encoded_bits(&frequencies),
            code.len(),
            code.max_length(),
        ),
        None => (0, 0, 0),
    };

    CompressionStats {
        original_len: data.len() as u64,
        distinct_symbols: distinct,
        max_code_length: max_len,
        payload_bits,
        entropy_bits: frequencies.entropy_bits(),
        container_len: (FIXED_HEADER_LEN + distinct * 2 + BIT_COUNT_LEN) as u64
            + payload_bits.div_ceil(8),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode;

    #[test]
    fn test_analyze_aaabbc() {
        let stats = analyze(b"aaabbc");
        assert_eq!(stats.original_bits(), 48);
        assert_eq!(stats.payload_bits, 9);
        assert_eq!(stats.distinct_symbols, 3);
        assert_eq!(stats.max_code_length, 2);
        assert!((stats.bits_per_symbol() - 1.5).abs() < 1e-9);

        let text = stats.to_string();
        assert!(text.starts_with("Original size: 48 bits\nCompressed size: 9 bits"));
    }

    #[test]
    fn test_analyze_matches_encoder() {
        let data = b"It was the best of times, it was the worst of times";
        let stats = analyze(data);
        let artifact = encode(data);
        assert_eq!(stats.payload_bits, artifact.bit_count());
        assert_eq!(stats.container_len, artifact.serialized_len() as u64);
        assert!(stats.payload_bits as f64 >= stats.entropy_bits);
        assert!(stats.payload_ratio() < 1.0);
    }

    #[test]
    fn test_analyze_empty() {
        let stats = analyze(b"");
        assert_eq!(stats.payload_bits, 0);
        assert_eq!(stats.bits_per_symbol(), 0.0);
        assert_eq!(stats.payload_ratio(), 0.0);
        assert_eq!(stats.container_len, 23);
    }
}
