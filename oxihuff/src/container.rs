//! Self-describing container for compressed data.
//!
//! # Layout
//!
//! All integers are big-endian.
//!
//! ```text
//! ┌───────────────┬─────────┬──────────────────┬──────────────┐
//! │ magic "OXHF"  │ version │ original length  │ symbol count │
//! │ 4 bytes       │ 1 byte  │ 8 bytes          │ 2 bytes (N)  │
//! ├───────────────┴─────────┴──────────────────┴──────────────┤
//! │ N × [symbol: 1 byte][code length: 1 byte]                 │
//! ├──────────────────────┬────────────────────────────────────┤
//! │ meaningful bit count │ payload, ceil(bits / 8) bytes      │
//! │ 8 bytes              │ MSB-first packed codes             │
//! └──────────────────────┴────────────────────────────────────┘
//! ```
//!
//! The code table is written in canonical `(length, symbol)` order and never
//! exceeds 512 bytes.

use crate::code::{CanonicalCode, CodeLength};
use crate::frequency::ALPHABET_SIZE;
use oxihuff_core::error::{OxiHuffError, Result};
use std::io::{self, Read, Write};

/// Container magic bytes.
pub const MAGIC: [u8; 4] = *b"OXHF";

/// Current container version.
pub const VERSION: u8 = 1;

/// Magic, version, original length and symbol count.
pub const FIXED_HEADER_LEN: usize = 4 + 1 + 8 + 2;

/// Size of the meaningful bit count field.
pub const BIT_COUNT_LEN: usize = 8;

/// Compressed output of one encode call.
///
/// Holds everything a decoder needs: the canonical code lengths, the
/// original length, and the packed bits with their meaningful bit count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedArtifact {
    original_len: u64,
    lengths: Vec<CodeLength>,
    bit_count: u64,
    payload: Vec<u8>,
}

impl CompressedArtifact {
    /// Assemble an artifact from its parts.
    ///
    /// Nothing is validated here; inconsistencies surface when the artifact
    /// is decoded.
    pub fn from_parts(
        original_len: u64,
        lengths: Vec<CodeLength>,
        bit_count: u64,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            original_len,
            lengths,
            bit_count,
            payload,
        }
    }

    /// Artifact for an empty input.
    pub fn empty() -> Self {
        Self::from_parts(0, Vec::new(), 0, Vec::new())
    }

    pub(crate) fn new(
        original_len: u64,
        code: &CanonicalCode,
        bit_count: u64,
        payload: Vec<u8>,
    ) -> Self {
        Self::from_parts(original_len, code.lengths().to_vec(), bit_count, payload)
    }

    /// Length of the uncompressed input.
    pub fn original_len(&self) -> u64 {
        self.original_len
    }

    /// Code lengths, canonical order for encoder output.
    pub fn code_lengths(&self) -> &[CodeLength] {
        &self.lengths
    }

    /// Number of payload bits that carry codes.
    pub fn bit_count(&self) -> u64 {
        self.bit_count
    }

    /// Packed payload.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Size of the serialized container in bytes.
    pub fn serialized_len(&self) -> usize {
        FIXED_HEADER_LEN + self.lengths.len() * 2 + BIT_COUNT_LEN + self.payload.len()
    }

    /// Serialize to a byte vector.
    ///
    /// Only artifacts with at most 256 code table entries form a valid
    /// container. A larger table assembled with [`from_parts`](Self::from_parts)
    /// has its symbol count saturated, so parsing the bytes back fails with
    /// `CorruptContainer` instead of reading a wrapped count.
    pub fn to_bytes(&self) -> Vec<u8> {
        let symbol_count = u16::try_from(self.lengths.len()).unwrap_or(u16::MAX);
        let mut out = Vec::with_capacity(self.serialized_len());
        out.extend_from_slice(&MAGIC);
        out.push(VERSION);
        out.extend_from_slice(&self.original_len.to_be_bytes());
        out.extend_from_slice(&symbol_count.to_be_bytes());
        for entry in &self.lengths {
            out.push(entry.symbol);
            out.push(entry.length);
        }
        out.extend_from_slice(&self.bit_count.to_be_bytes());
        out.extend_from_slice(&self.payload);
        out
    }

    /// Write the serialized container to `writer`.
    ///
    /// Fails with `CorruptContainer`, writing nothing, when the code table
    /// has more than 256 entries.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        if self.lengths.len() > ALPHABET_SIZE {
            return Err(OxiHuffError::corrupt(format!(
                "symbol count {} exceeds {}",
                self.lengths.len(),
                ALPHABET_SIZE
            )));
        }
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }

    /// Parse a container that spans exactly `data`.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let header = Header::parse(data)?;
        let mut cursor = ByteCursor::new(data);
        cursor.skip(header.payload_offset)?;
        let payload = cursor.take(header.payload_len, "payload")?.to_vec();

        if !cursor.is_empty() {
            return Err(OxiHuffError::corrupt(format!(
                "{} trailing bytes after payload",
                cursor.remaining()
            )));
        }

        Ok(Self {
            original_len: header.original_len,
            lengths: header.lengths,
            bit_count: header.bit_count,
            payload,
        })
    }

    /// Read one container from `reader`, consuming nothing past its end.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buf = vec![0u8; FIXED_HEADER_LEN];
        read_exact_or_corrupt(reader, &mut buf, "header")?;

        let symbol_count = check_fixed_header(&buf)?;
        let table_start = buf.len();
        buf.resize(table_start + symbol_count * 2 + BIT_COUNT_LEN, 0);
        read_exact_or_corrupt(reader, &mut buf[table_start..], "code table")?;

        let header = Header::parse_prefix(&buf)?;
        // The declared length is untrusted; grow only as bytes arrive
        let mut payload = Vec::new();
        reader
            .by_ref()
            .take(header.payload_len as u64)
            .read_to_end(&mut payload)?;
        if payload.len() != header.payload_len {
            return Err(OxiHuffError::corrupt(format!(
                "container ended inside the payload: {} of {} bytes",
                payload.len(),
                header.payload_len
            )));
        }

        Ok(Self {
            original_len: header.original_len,
            lengths: header.lengths,
            bit_count: header.bit_count,
            payload,
        })
    }

    /// Total length of the container at the start of `data`, once enough of
    /// the header is present to tell. `Ok(None)` means more bytes are needed.
    pub fn frame_len(data: &[u8]) -> Result<Option<usize>> {
        if data.len() < FIXED_HEADER_LEN {
            // Reject foreign data as early as possible
            let n = data.len().min(MAGIC.len());
            if data[..n] != MAGIC[..n] {
                return Err(bad_magic(&data[..n]));
            }
            return Ok(None);
        }

        let symbol_count = check_fixed_header(data)?;
        let prefix_len = FIXED_HEADER_LEN + symbol_count * 2 + BIT_COUNT_LEN;
        if data.len() < prefix_len {
            return Ok(None);
        }

        let header = Header::parse_prefix(&data[..prefix_len])?;
        header
            .payload_offset
            .checked_add(header.payload_len)
            .map(Some)
            .ok_or_else(|| OxiHuffError::corrupt("container length overflows"))
    }
}

/// Decoded header fields.
struct Header {
    original_len: u64,
    lengths: Vec<CodeLength>,
    bit_count: u64,
    payload_offset: usize,
    payload_len: usize,
}

impl Header {
    /// Parse the header at the start of `data`; the payload may follow.
    fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < FIXED_HEADER_LEN {
            return Err(OxiHuffError::corrupt(format!(
                "container is {} bytes, header needs {}",
                data.len(),
                FIXED_HEADER_LEN
            )));
        }
        let symbol_count = check_fixed_header(data)?;
        let prefix_len = FIXED_HEADER_LEN + symbol_count * 2 + BIT_COUNT_LEN;
        if data.len() < prefix_len {
            return Err(OxiHuffError::corrupt(format!(
                "code table for {} symbols is cut short",
                symbol_count
            )));
        }
        Self::parse_prefix(&data[..prefix_len])
    }

    /// Parse a buffer holding exactly the header (fixed part, table and bit
    /// count) and validate it.
    fn parse_prefix(data: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(data);
        cursor.skip(MAGIC.len() + 1)?;
        let original_len = cursor.read_u64("original length")?;
        let symbol_count = cursor.read_u16("symbol count")? as usize;

        let table = cursor.take(symbol_count * 2, "code table")?;
        let lengths: Vec<CodeLength> = table
            .chunks_exact(2)
            .map(|pair| CodeLength::new(pair[0], pair[1]))
            .collect();
        let bit_count = cursor.read_u64("bit count")?;

        validate_lengths(original_len, &lengths, bit_count)?;

        let payload_len = usize::try_from(bit_count.div_ceil(8))
            .map_err(|_| OxiHuffError::corrupt(format!("bit count {} is too large", bit_count)))?;

        Ok(Self {
            original_len,
            lengths,
            bit_count,
            payload_offset: data.len(),
            payload_len,
        })
    }
}

/// Check magic, version and symbol count; return the symbol count.
fn check_fixed_header(data: &[u8]) -> Result<usize> {
    if data[..MAGIC.len()] != MAGIC {
        return Err(bad_magic(&data[..MAGIC.len()]));
    }

    let version = data[MAGIC.len()];
    if version != VERSION {
        return Err(OxiHuffError::unsupported_version(version));
    }

    let symbol_count = u16::from_be_bytes([data[13], data[14]]) as usize;
    if symbol_count > ALPHABET_SIZE {
        return Err(OxiHuffError::corrupt(format!(
            "symbol count {} exceeds {}",
            symbol_count, ALPHABET_SIZE
        )));
    }
    Ok(symbol_count)
}

/// Structural checks that need the whole header.
fn validate_lengths(original_len: u64, lengths: &[CodeLength], bit_count: u64) -> Result<()> {
    match (lengths.is_empty(), original_len == 0) {
        (true, true) if bit_count != 0 => Err(OxiHuffError::corrupt(format!(
            "empty container declares {} payload bits",
            bit_count
        ))),
        (true, false) => Err(OxiHuffError::corrupt(format!(
            "no code table for {} symbols",
            original_len
        ))),
        (false, true) => Err(OxiHuffError::corrupt(
            "code table present for an empty input",
        )),
        _ => CanonicalCode::from_lengths(lengths).map(|_| ()),
    }
}

fn bad_magic(found: &[u8]) -> OxiHuffError {
    OxiHuffError::corrupt(format!(
        "invalid magic: expected {:02x?}, found {:02x?}",
        MAGIC, found
    ))
}

fn read_exact_or_corrupt<R: Read>(reader: &mut R, buf: &mut [u8], what: &str) -> Result<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => {
            OxiHuffError::corrupt(format!("container ended inside the {}", what))
        }
        _ => e.into(),
    })
}

/// Bounds-checked big-endian reads over a byte slice.
struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, len: usize, what: &str) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(OxiHuffError::corrupt(format!(
                "{} needs {} bytes, {} left",
                what,
                len,
                self.remaining()
            )));
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn skip(&mut self, len: usize) -> Result<()> {
        self.take(len, "header").map(|_| ())
    }

    fn read_u16(&mut self, what: &str) -> Result<u16> {
        let b = self.take(2, what)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn read_u64(&mut self, what: &str) -> Result<u64> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.take(8, what)?);
        Ok(u64::from_be_bytes(buf))
    }
}
