//! Code tables and canonical Huffman codes.
//!
//! A canonical code is fully determined by each symbol's code length. Sort
//! the symbols by `(length, symbol)`; the first gets the all-zero code of its
//! length, and every following code is the previous one plus one, shifted
//! left by however much the length grew:
//!
//! ```text
//! lengths  a=1 b=2 c=2        lengths  e=2 f=2 g=2 h=3 i=3
//! codes    a=0 b=10 c=11      codes    e=00 f=01 g=10 h=110 i=111
//! ```
//!
//! Only the `(symbol, length)` list is stored in a container. Codes are kept
//! in [`BitString`]s because a pathological input can push a code to 255
//! bits.

use crate::frequency::{ALPHABET_SIZE, FrequencyTable};
use crate::tree::CodeTree;
use oxihuff_core::BitString;
use oxihuff_core::error::{OxiHuffError, Result};

/// Longest possible code: 256 symbols in a fully skewed tree.
pub const MAX_CODE_LENGTH: usize = ALPHABET_SIZE - 1;

/// Mapping from symbol to its code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<BitString>>,
}

impl Default for CodeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            codes: vec![None; ALPHABET_SIZE],
        }
    }

    /// Set the code for `symbol`.
    pub fn insert(&mut self, symbol: u8, code: BitString) {
        self.codes[symbol as usize] = Some(code);
    }

    /// Code for `symbol`, if it has one.
    pub fn get(&self, symbol: u8) -> Option<&BitString> {
        self.codes[symbol as usize].as_ref()
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.iter().flatten().count()
    }

    /// Whether no symbol has a code.
    pub fn is_empty(&self) -> bool {
        self.codes.iter().all(Option::is_none)
    }

    /// Symbols and their codes, in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &BitString)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.as_ref().map(|c| (symbol as u8, c)))
    }

    /// Whether no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<&BitString> = self.iter().map(|(_, c)| c).collect();
        codes.iter().enumerate().all(|(i, a)| {
            codes
                .iter()
                .enumerate()
                .all(|(j, b)| i == j || !b.starts_with(a))
        })
    }

    /// Number of bits needed to encode an input with these frequencies.
    ///
    /// Symbols without a code contribute nothing.
    pub fn encoded_bits(&self, table: &FrequencyTable) -> u64 {
        self.iter()
            .map(|(symbol, code)| table.get(symbol) * code.len() as u64)
            .sum()
    }
}

/// A symbol and its code length, as stored in a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodeLength {
    /// Byte value.
    pub symbol: u8,
    /// Code length in bits (1..=255).
    pub length: u8,
}

impl CodeLength {
    /// Create a new entry.
    pub fn new(symbol: u8, length: u8) -> Self {
        Self { symbol, length }
    }
}

/// A validated canonical code: lengths sorted by `(length, symbol)` plus the
/// codes derived from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCode {
    lengths: Vec<CodeLength>,
    codes: Vec<BitString>,
}

impl CanonicalCode {
    /// The canonical code with the same lengths as `tree`.
    pub fn from_tree(tree: &CodeTree) -> Self {
        let lengths: Vec<CodeLength> = tree
            .code_lengths()
            .into_iter()
            .map(|(symbol, length)| CodeLength::new(symbol, length))
            .collect();
        Self::from_lengths(&lengths)
            .expect("BUG: Huffman tree depths always satisfy the Kraft inequality")
    }

    /// Build and validate a canonical code from untrusted `(symbol, length)`
    /// pairs, in any order.
    ///
    /// Fails with `CorruptContainer` for more than 256 entries, a zero
    /// length, a duplicate symbol, or lengths that over-subscribe the code
    /// space.
    pub fn from_lengths(lengths: &[CodeLength]) -> Result<Self> {
        if lengths.len() > ALPHABET_SIZE {
            return Err(OxiHuffError::corrupt(format!(
                "symbol count {} exceeds {}",
                lengths.len(),
                ALPHABET_SIZE
            )));
        }

        let mut seen = [false; ALPHABET_SIZE];
        for entry in lengths {
            if entry.length == 0 {
                return Err(OxiHuffError::corrupt(format!(
                    "symbol {:#04x} has a zero code length",
                    entry.symbol
                )));
            }
            if std::mem::replace(&mut seen[entry.symbol as usize], true) {
                return Err(OxiHuffError::corrupt(format!(
                    "symbol {:#04x} appears twice in the code table",
                    entry.symbol
                )));
            }
        }

        let mut lengths = lengths.to_vec();
        lengths.sort_by_key(|e| (e.length, e.symbol));

        let codes = assign_codes(&lengths)
            .ok_or_else(|| OxiHuffError::corrupt("code lengths over-subscribe the code space"))?;

        Ok(Self { lengths, codes })
    }

    /// Entries in canonical order.
    pub fn lengths(&self) -> &[CodeLength] {
        &self.lengths
    }

    /// Entries paired with their codes, in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (CodeLength, &BitString)> + '_ {
        self.lengths.iter().copied().zip(self.codes.iter())
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    /// Whether the code has no symbols.
    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// Longest code length, 0 for an empty code.
    pub fn max_length(&self) -> u8 {
        self.lengths.last().map_or(0, |e| e.length)
    }

    /// Symbol-indexed table of the canonical codes.
    pub fn code_table(&self) -> CodeTable {
        let mut table = CodeTable::new();
        for (entry, code) in self.iter() {
            table.insert(entry.symbol, code.clone());
        }
        table
    }
}

/// Assign canonical codes to entries sorted by `(length, symbol)`.
///
/// Returns `None` when the running code overflows its length.
fn assign_codes(sorted: &[CodeLength]) -> Option<Vec<BitString>> {
    let mut codes = Vec::with_capacity(sorted.len());
    let Some(first) = sorted.first() else {
        return Some(codes);
    };

    let mut code = BitString::zeros(first.length as usize);
    codes.push(code.clone());

    for pair in sorted.windows(2) {
        if !code.increment() {
            return None;
        }
        code.extend_zeros((pair[1].length - pair[0].length) as usize);
        codes.push(code.clone());
    }

    Some(codes)
}
