//! # OxiHuff: Pure Rust Static Huffman Codec
//!
//! This crate compresses byte sequences with a static Huffman code built from
//! the input's own symbol frequencies, and restores them exactly.
//!
//! ## Features
//!
//! - **Pure Rust**: No C dependencies, 100% safe Rust
//! - **Canonical codes**: Only `(symbol, length)` pairs are stored, at most
//!   512 bytes of code table
//! - **Deterministic**: Identical input always yields identical bytes
//! - **Self-describing container**: Magic, version and lengths are validated
//!   before any payload bit is read
//! - **Parallel counting**: Optional `parallel` feature for large inputs
//!
//! ## Container Format
//!
//! All integers are big-endian.
//!
//! ```text
//! +------+---------+--------------+-------+-------------------+-----------+---------+
//! | OXHF | version | original len | N     | N x (sym, length) | bit count | payload |
//! | 4    | 1       | u64          | u16   | 2N                | u64       | ...     |
//! +------+---------+--------------+-------+-------------------+-----------+---------+
//! ```
//!
//! The payload packs codes MSB-first; only the first `bit count` bits are
//! meaningful and the rest of the last byte is zero.
//!
//! ## Example
//!
//! ```rust
//! use oxihuff::{compress, decompress, encode, decode};
//!
//! let artifact = encode(b"aaabbc");
//! assert_eq!(artifact.bit_count(), 9);
//! assert_eq!(decode(&artifact).unwrap(), b"aaabbc");
//!
//! let bytes = compress(b"mississippi");
//! assert_eq!(decompress(&bytes).unwrap(), b"mississippi");
//! ```
//!
//! ## Size Report
//!
//! ```rust
//! let stats = oxihuff::analyze(b"aaabbc");
//! assert_eq!(stats.original_bits(), 48);
//! assert_eq!(stats.payload_bits, 9);
//! println!("{stats}");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod code;
pub mod config;
pub mod container;
pub mod decode;
pub mod encode;
pub mod frequency;
pub mod stats;
pub mod tree;

pub use code::{CanonicalCode, CodeLength, CodeTable, MAX_CODE_LENGTH};
pub use config::CodecConfig;
pub use container::CompressedArtifact;
pub use decode::{DecodeTree, HuffmanDecoder, decode, decode_with_config, decompress};
pub use encode::{HuffmanEncoder, compress, encode, encode_with_config};
pub use frequency::{ALPHABET_SIZE, FrequencyTable};
pub use stats::{CompressionStats, analyze};
pub use tree::{CodeTree, CodeTreeNode};

pub use oxihuff_core::error::{OxiHuffError, Result};
pub use oxihuff_core::traits::{Compressor, Decompressor, FlushMode};
