//! Bit-level I/O for variable-length prefix codes.
//!
//! This module provides [`BitWriter`] and [`BitReader`] for packing and
//! unpacking codes at the bit level, plus [`BitString`], a growable sequence
//! of bits used to hold a single code of arbitrary length.
//!
//! # Bit Ordering
//!
//! OxiHuff uses MSB-first (Most Significant Bit first) ordering within bytes:
//! the first bit written lands in bit 7 of the first byte. The final byte is
//! padded with zero bits, so the writer reports the number of meaningful bits
//! separately and the reader refuses to read past it.
//!
//! # Example
//!
//! ```
//! use oxihuff_core::bitstream::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3);
//! writer.write_bits(0b1100, 4);
//! let (bytes, bit_len) = writer.finish();
//! assert_eq!(bytes, vec![0b1011_1000]);
//! assert_eq!(bit_len, 7);
//!
//! let mut reader = BitReader::new(&bytes, bit_len);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bits(4).unwrap(), 0b1100);
//! assert!(reader.read_bit().is_err()); // padding is not readable
//! ```

use crate::error::{OxiHuffError, Result};
use std::fmt;

/// A growable, MSB-first packed sequence of bits.
///
/// Bits past `len` in the last byte are always zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BitString {
    bytes: Vec<u8>,
    len: usize,
}

impl BitString {
    /// Create an empty bit string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bit string of `len` zero bits.
    pub fn zeros(len: usize) -> Self {
        Self {
            bytes: vec![0; len.div_ceil(8)],
            len,
        }
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the bit string holds no bits.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Packed bytes, MSB-first, zero padded.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Get the bit at `index`.
    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        Some(self.bytes[index / 8] & (0x80 >> (index % 8)) != 0)
    }

    fn set(&mut self, index: usize, bit: bool) {
        let mask = 0x80 >> (index % 8);
        if bit {
            self.bytes[index / 8] |= mask;
        } else {
            self.bytes[index / 8] &= !mask;
        }
    }

    /// Append a bit.
    pub fn push(&mut self, bit: bool) {
        if self.len % 8 == 0 {
            self.bytes.push(0);
        }
        self.len += 1;
        self.set(self.len - 1, bit);
    }

    /// Remove and return the last bit.
    pub fn pop(&mut self) -> Option<bool> {
        let bit = self.get(self.len.checked_sub(1)?)?;
        self.set(self.len - 1, false);
        self.len -= 1;
        if self.len % 8 == 0 {
            self.bytes.pop();
        }
        Some(bit)
    }

    /// Append `count` zero bits.
    pub fn extend_zeros(&mut self, count: usize) {
        self.len += count;
        self.bytes.resize(self.len.div_ceil(8), 0);
    }

    /// Add one to the bit string read as an unsigned binary number.
    ///
    /// Returns `false` when the value was all ones and wrapped to all zeros.
    pub fn increment(&mut self) -> bool {
        for index in (0..self.len).rev() {
            if self.get(index) == Some(false) {
                self.set(index, true);
                return true;
            }
            self.set(index, false);
        }
        false
    }

    /// Whether `prefix` is a prefix of this bit string.
    pub fn starts_with(&self, prefix: &BitString) -> bool {
        prefix.len <= self.len && (0..prefix.len).all(|i| self.get(i) == prefix.get(i))
    }

    /// Iterate over the bits in order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| self.bytes[i / 8] & (0x80 >> (i % 8)) != 0)
    }
}

impl FromIterator<bool> for BitString {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut bits = BitString::new();
        for bit in iter {
            bits.push(bit);
        }
        bits
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// MSB-first bit reader over a byte slice.
///
/// The reader only yields the meaningful bits of the buffer; the count is
/// clamped to the bits physically present so a short buffer reads as a
/// shorter stream rather than out of bounds.
#[derive(Debug)]
pub struct BitReader<'a> {
    /// Input data.
    data: &'a [u8],
    /// Number of readable bits.
    bit_len: u64,
    /// Current bit position.
    position: u64,
}

impl<'a> BitReader<'a> {
    /// Create a reader yielding at most `bit_len` bits of `data`.
    pub fn new(data: &'a [u8], bit_len: u64) -> Self {
        let available = (data.len() as u64).saturating_mul(8);
        Self {
            data,
            bit_len: bit_len.min(available),
            position: 0,
        }
    }

    /// Get the current bit position.
    pub fn bit_position(&self) -> u64 {
        self.position
    }

    /// Number of meaningful bits not yet read.
    pub fn remaining_bits(&self) -> u64 {
        self.bit_len - self.position
    }

    /// Whether all meaningful bits have been read.
    pub fn is_at_end(&self) -> bool {
        self.position >= self.bit_len
    }

    /// Read a single bit.
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.position >= self.bit_len {
            return Err(OxiHuffError::end_of_stream(self.position));
        }
        let byte = self.data[(self.position / 8) as usize];
        let bit = byte & (0x80 >> (self.position % 8)) != 0;
        self.position += 1;
        Ok(bit)
    }

    /// Read up to 32 bits, first bit read in the most significant position.
    ///
    /// Nothing is consumed when fewer than `count` bits remain.
    pub fn read_bits(&mut self, count: u8) -> Result<u32> {
        debug_assert!(count <= 32, "Cannot read more than 32 bits at once");

        if u64::from(count) > self.remaining_bits() {
            return Err(OxiHuffError::end_of_stream(self.position));
        }

        let mut value = 0u32;
        for _ in 0..count {
            value = (value << 1) | u32::from(self.read_bit()?);
        }
        Ok(value)
    }
}

/// MSB-first bit writer into a growable byte buffer.
#[derive(Debug, Default)]
pub struct BitWriter {
    /// Output buffer.
    output: Vec<u8>,
    /// Bit buffer (MSB-first, low `bits_in_buffer` bits are pending).
    buffer: u64,
    /// Number of pending bits in buffer.
    bits_in_buffer: u8,
    /// Total bits written.
    total_bits_written: u64,
}

impl BitWriter {
    /// Create a new bit writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bit writer whose output buffer can hold `bytes` without
    /// reallocating.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            output: Vec::with_capacity(bytes),
            ..Self::default()
        }
    }

    /// Get the total number of bits written so far.
    pub fn bits_written(&self) -> u64 {
        self.total_bits_written
    }

    /// Write up to 32 bits, most significant first.
    #[inline]
    pub fn write_bits(&mut self, value: u32, count: u8) {
        debug_assert!(count <= 32, "Cannot write more than 32 bits at once");

        if count == 0 {
            return;
        }

        let mask = (1u64 << count) - 1;
        self.buffer = (self.buffer << count) | (u64::from(value) & mask);
        self.bits_in_buffer += count;
        self.total_bits_written += u64::from(count);

        while self.bits_in_buffer >= 8 {
            let byte = (self.buffer >> (self.bits_in_buffer - 8)) as u8;
            self.output.push(byte);
            self.bits_in_buffer -= 8;
        }
    }

    /// Write a single bit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        self.write_bits(u32::from(bit), 1);
    }

    /// Write every bit of `bits` in order.
    pub fn write_bit_string(&mut self, bits: &BitString) {
        let full_bytes = bits.len() / 8;
        let bytes = bits.as_bytes();
        for &byte in &bytes[..full_bytes] {
            self.write_bits(u32::from(byte), 8);
        }

        let tail = (bits.len() % 8) as u8;
        if tail > 0 {
            self.write_bits(u32::from(bytes[full_bytes] >> (8 - tail)), tail);
        }
    }

    /// Pad the last byte with zero bits and return the buffer together with
    /// the number of meaningful bits.
    pub fn finish(mut self) -> (Vec<u8>, u64) {
        if self.bits_in_buffer > 0 {
            let byte = (self.buffer << (8 - self.bits_in_buffer)) as u8;
            self.output.push(byte);
        }
        (self.output, self.total_bits_written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitreader_basic() {
        // 0b10110101 = 0xB5
        let data = [0xB5];
        let mut reader = BitReader::new(&data, 8);

        assert!(reader.read_bit().unwrap()); // MSB first
        assert!(!reader.read_bit().unwrap());
        assert!(reader.read_bit().unwrap());
        assert!(reader.read_bit().unwrap());
        assert!(!reader.read_bit().unwrap());
        assert!(reader.read_bit().unwrap());
        assert!(!reader.read_bit().unwrap());
        assert!(reader.read_bit().unwrap());
        assert!(reader.is_at_end());
    }

    #[test]
    fn test_bitreader_multi_byte() {
        let data = [0xFF, 0x00];
        let mut reader = BitReader::new(&data, 16);

        assert_eq!(reader.read_bits(4).unwrap(), 0xF);
        assert_eq!(reader.read_bits(8).unwrap(), 0xF0); // Crosses byte boundary
        assert_eq!(reader.read_bits(4).unwrap(), 0x0);
    }

    #[test]
    fn test_bitreader_stops_at_meaningful_bits() {
        let data = [0b1010_0000];
        let mut reader = BitReader::new(&data, 3);

        assert_eq!(reader.read_bits(3).unwrap(), 0b101);
        let err = reader.read_bit().unwrap_err();
        assert!(matches!(err, OxiHuffError::EndOfStream { bit_position: 3 }));
    }

    #[test]
    fn test_bitreader_clamps_to_data() {
        let data = [0xAA];
        let mut reader = BitReader::new(&data, 100);
        assert_eq!(reader.remaining_bits(), 8);
        assert!(reader.read_bits(9).is_err());
        // Failed read consumes nothing
        assert_eq!(reader.bit_position(), 0);
        assert_eq!(reader.read_bits(8).unwrap(), 0xAA);
    }

    #[test]
    fn test_bitwriter_basic() {
        let mut writer = BitWriter::new();
        for bit in [true, false, true, true, false, true, false, true] {
            writer.write_bit(bit);
        }
        let (bytes, bits) = writer.finish();
        assert_eq!(bytes, vec![0xB5]);
        assert_eq!(bits, 8);
    }

    #[test]
    fn test_bitwriter_padding() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b11, 2);
        writer.write_bits(0b0, 1);
        writer.write_bits(0b1111_0000_1, 9);
        assert_eq!(writer.bits_written(), 12);

        let (bytes, bits) = writer.finish();
        // 110 11110000 1 -> 1101_1110 0001_0000
        assert_eq!(bytes, vec![0b1101_1110, 0b0001_0000]);
        assert_eq!(bits, 12);
    }

    #[test]
    fn test_roundtrip() {
        let mut writer = BitWriter::with_capacity(4);
        writer.write_bits(0b101, 3);
        writer.write_bits(0b1111, 4);
        writer.write_bits(0b10, 2);
        writer.write_bits(0xDEAD_BEEF, 32);
        let (bytes, bits) = writer.finish();

        let mut reader = BitReader::new(&bytes, bits);
        assert_eq!(reader.read_bits(3).unwrap(), 0b101);
        assert_eq!(reader.read_bits(4).unwrap(), 0b1111);
        assert_eq!(reader.read_bits(2).unwrap(), 0b10);
        assert_eq!(reader.read_bits(32).unwrap(), 0xDEAD_BEEF);
        assert!(reader.is_at_end());
    }

    #[test]
    fn test_write_bit_string() {
        let code: BitString = "1011001110".chars().map(|c| c == '1').collect();
        let mut writer = BitWriter::new();
        writer.write_bit(false);
        writer.write_bit_string(&code);
        let (bytes, bits) = writer.finish();

        assert_eq!(bits, 11);
        assert_eq!(bytes, vec![0b0101_1001, 0b1100_0000]);
    }

    #[test]
    fn test_bit_string_push_pop() {
        let mut bits = BitString::new();
        for i in 0..10 {
            bits.push(i % 3 == 0);
        }
        assert_eq!(bits.to_string(), "1001001001");
        assert_eq!(bits.as_bytes().len(), 2);

        assert_eq!(bits.pop(), Some(true));
        assert_eq!(bits.pop(), Some(false));
        assert_eq!(bits.len(), 8);
        assert_eq!(bits.as_bytes(), &[0b1001_0010]);

        let mut empty = BitString::new();
        assert_eq!(empty.pop(), None);
    }

    #[test]
    fn test_bit_string_increment() {
        let mut bits = BitString::zeros(3);
        let mut seen = Vec::new();
        loop {
            seen.push(bits.to_string());
            if !bits.increment() {
                break;
            }
        }
        assert_eq!(
            seen,
            vec!["000", "001", "010", "011", "100", "101", "110", "111"]
        );
        assert_eq!(bits.to_string(), "000");
    }

    #[test]
    fn test_bit_string_extend_and_prefix() {
        let mut bits: BitString = [true, false].into_iter().collect();
        let prefix = bits.clone();
        bits.extend_zeros(9);
        assert_eq!(bits.len(), 11);
        assert_eq!(bits.to_string(), "10000000000");
        assert!(bits.starts_with(&prefix));
        assert!(!prefix.starts_with(&bits));

        let other: BitString = [true, true].into_iter().collect();
        assert!(!bits.starts_with(&other));
    }

    #[test]
    fn test_long_bit_string() {
        let bits: BitString = (0..255).map(|i| i % 2 == 1).collect();
        let mut writer = BitWriter::new();
        writer.write_bit_string(&bits);
        let (bytes, len) = writer.finish();
        assert_eq!(len, 255);

        let mut reader = BitReader::new(&bytes, len);
        for i in 0..255 {
            assert_eq!(reader.read_bit().unwrap(), i % 2 == 1);
        }
    }
}
