//! Huffman decoder.
//!
//! The decoder never sees the encoder's tree. It rebuilds a decoding tree
//! from the canonical code lengths stored in the container and walks it one
//! payload bit at a time.

use crate::code::CanonicalCode;
use crate::config::CodecConfig;
use crate::container::CompressedArtifact;
use log::{debug, trace};
use oxihuff_core::error::{OxiHuffError, Result};
use oxihuff_core::traits::{DecompressStatus, Decompressor};
use oxihuff_core::{BitReader, BitString};

/// Node of the decoding tree. Children are indices into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeNode {
    Branch([Option<u32>; 2]),
    Leaf(u8),
}

/// Prefix tree rebuilt from a canonical code.
#[derive(Debug, Clone)]
pub struct DecodeTree {
    nodes: Vec<DecodeNode>,
}

impl DecodeTree {
    /// Build the tree for `code`.
    ///
    /// Fails with `CorruptContainer` if one code is a prefix of another.
    pub fn new(code: &CanonicalCode) -> Result<Self> {
        let mut tree = Self {
            nodes: vec![DecodeNode::Branch([None, None])],
        };
        for (entry, bits) in code.iter() {
            tree.insert(entry.symbol, bits)?;
        }
        Ok(tree)
    }

    fn insert(&mut self, symbol: u8, code: &BitString) -> Result<()> {
        let conflict = || {
            OxiHuffError::corrupt(format!(
                "code {} for symbol {:#04x} collides with another code",
                code, symbol
            ))
        };

        let mut node = 0usize;
        let last = code.len().saturating_sub(1);
        for (depth, bit) in code.iter().enumerate() {
            let DecodeNode::Branch(children) = self.nodes[node] else {
                return Err(conflict());
            };
            let slot = usize::from(bit);

            if depth == last {
                if children[slot].is_some() {
                    return Err(conflict());
                }
                self.nodes.push(DecodeNode::Leaf(symbol));
                self.set_child(node, slot);
            } else {
                node = match children[slot] {
                    Some(child) => child as usize,
                    None => {
                        self.nodes.push(DecodeNode::Branch([None, None]));
                        self.set_child(node, slot)
                    }
                };
            }
        }
        Ok(())
    }

    /// Point `parent`'s `slot` at the last pushed node and return its index.
    fn set_child(&mut self, parent: usize, slot: usize) -> usize {
        let child = self.nodes.len() - 1;
        if let DecodeNode::Branch(children) = &mut self.nodes[parent] {
            children[slot] = Some(child as u32);
        }
        child
    }

    /// Decode one symbol.
    ///
    /// Running out of bits yields `EndOfStream`; a bit that leads nowhere
    /// yields `CorruptContainer`.
    #[inline]
    pub fn decode_symbol(&self, reader: &mut BitReader<'_>) -> Result<u8> {
        let mut node = 0usize;
        loop {
            let DecodeNode::Branch(children) = self.nodes[node] else {
                break;
            };
            let start = reader.bit_position();
            let bit = reader.read_bit()?;
            node = match children[usize::from(bit)] {
                Some(child) => child as usize,
                None => {
                    return Err(OxiHuffError::corrupt(format!(
                        "bit pattern at bit {} matches no code",
                        start
                    )));
                }
            };
        }

        match self.nodes[node] {
            DecodeNode::Leaf(symbol) => Ok(symbol),
            DecodeNode::Branch(_) => Err(OxiHuffError::corrupt("empty code tree")),
        }
    }
}

/// Decode `artifact` with the default configuration.
pub fn decode(artifact: &CompressedArtifact) -> Result<Vec<u8>> {
    decode_with_config(artifact, &CodecConfig::DEFAULT)
}

/// Decode `artifact`.
pub fn decode_with_config(artifact: &CompressedArtifact, config: &CodecConfig) -> Result<Vec<u8>> {
    let expected = artifact.original_len();
    if expected > config.max_decoded_len {
        return Err(OxiHuffError::output_limit(expected, config.max_decoded_len));
    }

    match (artifact.code_lengths().is_empty(), expected == 0) {
        (true, true) => {
            debug!("decoded empty container");
            return Ok(Vec::new());
        }
        (true, false) => {
            return Err(OxiHuffError::corrupt(format!(
                "no code table for {} symbols",
                expected
            )));
        }
        (false, true) => {
            return Err(OxiHuffError::corrupt("code table present for an empty input"));
        }
        (false, false) => {}
    }

    let code = CanonicalCode::from_lengths(artifact.code_lengths())?;
    trace!("canonical code lengths: {:?}", code.lengths());
    let tree = DecodeTree::new(&code)?;

    let mut reader = BitReader::new(artifact.payload(), artifact.bit_count());
    // Every symbol takes at least one bit
    let capacity = expected.min(reader.remaining_bits());
    let mut output = Vec::with_capacity(usize::try_from(capacity).unwrap_or(0));

    while (output.len() as u64) < expected {
        match tree.decode_symbol(&mut reader) {
            Ok(symbol) => output.push(symbol),
            Err(OxiHuffError::EndOfStream { .. }) => {
                return Err(OxiHuffError::truncated(expected, output.len() as u64));
            }
            Err(e) => return Err(e),
        }
    }

    if !reader.is_at_end() {
        return Err(OxiHuffError::corrupt(format!(
            "{} meaningful bits left after decoding {} symbols",
            reader.remaining_bits(),
            expected
        )));
    }

    debug!(
        "decoded {} bytes from {} bits with {} symbols",
        output.len(),
        artifact.bit_count(),
        code.len()
    );
    Ok(output)
}

/// Decode a serialized container.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    decode(&CompressedArtifact::from_bytes(data)?)
}

/// Buffering decoder for the [`Decompressor`] trait.
///
/// Input is collected until a complete container is present; the decoded
/// bytes are then handed out as output space allows. Bytes after the
/// container are left unconsumed.
#[derive(Debug, Default)]
pub struct HuffmanDecoder {
    config: CodecConfig,
    input: Vec<u8>,
    output: Vec<u8>,
    output_pos: usize,
    decoded: bool,
}

impl HuffmanDecoder {
    /// Create a decoder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with `config`.
    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Decode `data`, which must hold exactly one container.
    pub fn decode_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        decode_with_config(&CompressedArtifact::from_bytes(data)?, &self.config)
    }

    fn drain(&mut self, output: &mut [u8]) -> (usize, DecompressStatus) {
        let rest = &self.output[self.output_pos..];
        let n = rest.len().min(output.len());
        output[..n].copy_from_slice(&rest[..n]);
        self.output_pos += n;

        let status = if self.output_pos == self.output.len() {
            DecompressStatus::Done
        } else {
            DecompressStatus::NeedsOutput
        };
        (n, status)
    }
}

impl Decompressor for HuffmanDecoder {
    fn decompress(
        &mut self,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<(usize, usize, DecompressStatus)> {
        if self.decoded {
            let (produced, status) = self.drain(output);
            return Ok((0, produced, status));
        }

        let buffered = self.input.len();
        self.input.extend_from_slice(input);

        let Some(frame_len) = CompressedArtifact::frame_len(&self.input)? else {
            return Ok((input.len(), 0, DecompressStatus::NeedsInput));
        };
        if self.input.len() < frame_len {
            return Ok((input.len(), 0, DecompressStatus::NeedsInput));
        }

        let consumed = frame_len - buffered;
        let artifact = CompressedArtifact::from_bytes(&self.input[..frame_len])?;
        self.output = decode_with_config(&artifact, &self.config)?;
        self.input = Vec::new();
        self.decoded = true;

        let (produced, status) = self.drain(output);
        Ok((consumed, produced, status))
    }

    fn reset(&mut self) {
        *self = Self::with_config(self.config);
    }

    fn is_finished(&self) -> bool {
        self.decoded && self.output_pos == self.output.len()
    }
}
