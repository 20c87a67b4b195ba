//! Symbol frequency analysis.

use crate::config::CodecConfig;

/// Number of distinct symbols (byte values).
pub const ALPHABET_SIZE: usize = 256;

/// Occurrence count of every byte value in one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE],
}

impl FrequencyTable {
    /// Count the symbols of `data`.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self::from_bytes_with_config(data, &CodecConfig::DEFAULT)
    }

    /// Count the symbols of `data`, in parallel for inputs at or above
    /// `config.parallel_threshold` when the `parallel` feature is enabled.
    pub fn from_bytes_with_config(data: &[u8], config: &CodecConfig) -> Self {
        #[cfg(feature = "parallel")]
        let counts = if data.len() >= config.parallel_threshold {
            count_parallel(data)
        } else {
            count_sequential(data)
        };
        #[cfg(not(feature = "parallel"))]
        let counts = {
            let _ = config;
            count_sequential(data)
        };

        Self { counts }
    }

    /// Build a table from explicit `(symbol, count)` pairs.
    ///
    /// Counts for a repeated symbol are added together.
    pub fn from_counts(pairs: &[(u8, u64)]) -> Self {
        let mut counts = [0u64; ALPHABET_SIZE];
        for &(symbol, count) in pairs {
            counts[symbol as usize] = counts[symbol as usize].saturating_add(count);
        }
        Self { counts }
    }

    /// Count for `symbol`.
    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Total number of symbols counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().fold(0u64, |acc, &c| acc.saturating_add(c))
    }

    /// Number of symbols with a non-zero count.
    pub fn distinct_symbols(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Whether no symbol was counted.
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Symbols with a non-zero count, in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(symbol, &c)| (symbol as u8, c))
    }

    /// Shannon entropy of the whole input, in bits.
    ///
    /// No prefix code can encode the input in fewer bits.
    pub fn entropy_bits(&self) -> f64 {
        let total = self.total() as f64;
        if total == 0.0 {
            return 0.0;
        }
        self.iter()
            .map(|(_, c)| {
                let c = c as f64;
                c * (total / c).log2()
            })
            .sum()
    }
}

fn count_sequential(data: &[u8]) -> [u64; ALPHABET_SIZE] {
    let mut counts = [0u64; ALPHABET_SIZE];
    for &byte in data {
        counts[byte as usize] += 1;
    }
    counts
}

/// Count chunks independently and merge the partial tables.
#[cfg(feature = "parallel")]
fn count_parallel(data: &[u8]) -> [u64; ALPHABET_SIZE] {
    use rayon::prelude::*;

    let chunk_size = (data.len() / rayon::current_num_threads().max(1)).max(64 * 1024);
    data.par_chunks(chunk_size)
        .map(count_sequential)
        .reduce(
            || [0u64; ALPHABET_SIZE],
            |mut acc, partial| {
                for (a, p) in acc.iter_mut().zip(partial.iter()) {
                    *a += p;
                }
                acc
            },
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let table = FrequencyTable::from_bytes(b"");
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
        assert_eq!(table.distinct_symbols(), 0);
        assert_eq!(table.iter().count(), 0);
        assert_eq!(table.entropy_bits(), 0.0);
    }

    #[test]
    fn test_counts() {
        let table = FrequencyTable::from_bytes(b"aaabbc");
        assert_eq!(table.get(b'a'), 3);
        assert_eq!(table.get(b'b'), 2);
        assert_eq!(table.get(b'c'), 1);
        assert_eq!(table.get(b'd'), 0);
        assert_eq!(table.total(), 6);
        assert_eq!(table.distinct_symbols(), 3);

        let pairs: Vec<_> = table.iter().collect();
        assert_eq!(pairs, vec![(b'a', 3), (b'b', 2), (b'c', 1)]);
    }

    #[test]
    fn test_from_counts() {
        let table = FrequencyTable::from_counts(&[(7, 2), (1, 5), (7, 3)]);
        assert_eq!(table.get(7), 5);
        assert_eq!(table.get(1), 5);
        assert_eq!(table.iter().map(|(s, _)| s).collect::<Vec<_>>(), vec![1, 7]);
    }

    #[test]
    fn test_entropy() {
        // Two equally likely symbols: one bit each
        let table = FrequencyTable::from_bytes(b"abababab");
        assert!((table.entropy_bits() - 8.0).abs() < 1e-9);

        // A single symbol carries no information
        let table = FrequencyTable::from_bytes(&[9u8; 100]);
        assert_eq!(table.entropy_bits(), 0.0);
    }

    #[test]
    fn test_threshold_does_not_change_result() {
        let data: Vec<u8> = (0..200_000u32).map(|i| (i * 31 % 251) as u8).collect();
        let config = CodecConfig::new().with_parallel_threshold(0);
        assert_eq!(
            FrequencyTable::from_bytes_with_config(&data, &config),
            FrequencyTable::from_bytes(&data)
        );
    }
}
