//! Huffman encoder.
//!
//! Encoding is a single pass over the input once the code is known:
//!
//! 1. Count symbol frequencies
//! 2. Build the Huffman tree and read off each symbol's code length
//! 3. Re-derive canonical codes from the lengths
//! 4. Pack each input byte's code into the bit stream
//! 5. Wrap lengths, original length and packed bits into a container

use crate::code::CanonicalCode;
use crate::config::CodecConfig;
use crate::container::CompressedArtifact;
use crate::frequency::FrequencyTable;
use crate::tree::CodeTree;
use log::{debug, trace};
use oxihuff_core::BitWriter;
use oxihuff_core::error::Result;
use oxihuff_core::traits::{CompressStatus, Compressor, FlushMode};

/// Encode `data` with the default configuration.
///
/// Never fails; empty input yields an artifact with no code table and no
/// payload.
pub fn encode(data: &[u8]) -> CompressedArtifact {
    encode_with_config(data, &CodecConfig::DEFAULT)
}

/// Encode `data`.
pub fn encode_with_config(data: &[u8], config: &CodecConfig) -> CompressedArtifact {
    let frequencies = FrequencyTable::from_bytes_with_config(data, config);
    let Some(tree) = CodeTree::build(&frequencies) else {
        debug!("encoded empty input");
        return CompressedArtifact::empty();
    };

    let code = CanonicalCode::from_tree(&tree);
    trace!("canonical code lengths: {:?}", code.lengths());

    let table = code.code_table();
    let total_bits = table.encoded_bits(&frequencies);
    let capacity = usize::try_from(total_bits.div_ceil(8)).unwrap_or(0);
    let mut writer = BitWriter::with_capacity(capacity);
    for &byte in data {
        let bits = table.get(byte).expect("BUG: every input byte has a code");
        writer.write_bit_string(bits);
    }
    let (payload, bit_count) = writer.finish();
    debug_assert_eq!(bit_count, total_bits);

    debug!(
        "encoded {} bytes with {} symbols into {} bits",
        data.len(),
        code.len(),
        bit_count
    );
    CompressedArtifact::new(data.len() as u64, &code, bit_count, payload)
}

/// Encode `data` straight to a serialized container.
pub fn compress(data: &[u8]) -> Vec<u8> {
    encode(data).to_bytes()
}

/// Buffering encoder for the [`Compressor`] trait.
///
/// Static Huffman coding needs the complete input for its frequency table,
/// so nothing is produced until `FlushMode::Finish`. The serialized
/// container is then handed out as output space allows.
#[derive(Debug, Default)]
pub struct HuffmanEncoder {
    config: CodecConfig,
    input: Vec<u8>,
    output: Vec<u8>,
    output_pos: usize,
    encoded: bool,
}

impl HuffmanEncoder {
    /// Create an encoder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an encoder with `config`.
    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Compress `data` to a serialized container.
    pub fn compress_to_vec(&self, data: &[u8]) -> Vec<u8> {
        encode_with_config(data, &self.config).to_bytes()
    }

    fn drain(&mut self, output: &mut [u8]) -> (usize, CompressStatus) {
        let rest = &self.output[self.output_pos..];
        let n = rest.len().min(output.len());
        output[..n].copy_from_slice(&rest[..n]);
        self.output_pos += n;

        let status = if self.output_pos == self.output.len() {
            CompressStatus::Done
        } else {
            CompressStatus::NeedsOutput
        };
        (n, status)
    }
}

impl Compressor for HuffmanEncoder {
    fn compress(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        flush: FlushMode,
    ) -> Result<(usize, usize, CompressStatus)> {
        if self.encoded {
            let (produced, status) = self.drain(output);
            return Ok((0, produced, status));
        }

        self.input.extend_from_slice(input);
        if flush == FlushMode::None {
            return Ok((input.len(), 0, CompressStatus::NeedsInput));
        }

        self.output = encode_with_config(&self.input, &self.config).to_bytes();
        self.input = Vec::new();
        self.encoded = true;

        let (produced, status) = self.drain(output);
        Ok((input.len(), produced, status))
    }

    fn reset(&mut self) {
        *self = Self::with_config(self.config);
    }

    fn is_finished(&self) -> bool {
        self.encoded && self.output_pos == self.output.len()
    }
}
