//! # OxiHuff Core
//!
//! Core components for the OxiHuff Huffman codec.
//!
//! This crate provides the building blocks the codec crate sits on:
//!
//! - [`bitstream`]: MSB-first bit I/O and growable bit strings for prefix codes
//! - [`traits`]: Buffer-to-buffer compression traits
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L2: Codec                                               │
//! │     Frequency analysis, Huffman tree, canonical codes,  │
//! │     container format (oxihuff)                          │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: BitStream (this crate)                              │
//! │     BitReader/BitWriter, BitString, errors              │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxihuff_core::bitstream::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0xABC, 12);
//! let (bytes, bits) = writer.finish();
//!
//! let mut reader = BitReader::new(&bytes, bits);
//! assert_eq!(reader.read_bits(12).unwrap(), 0xABC);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

pub mod bitstream;
pub mod error;
pub mod traits;

// Re-exports for convenience
pub use bitstream::{BitReader, BitString, BitWriter};
pub use error::{OxiHuffError, Result};
pub use traits::{CompressStatus, Compressor, DecompressStatus, Decompressor, FlushMode};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bitstream::{BitReader, BitString, BitWriter};
    pub use crate::error::{OxiHuffError, Result};
    pub use crate::traits::{Compressor, Decompressor, FlushMode};
}
