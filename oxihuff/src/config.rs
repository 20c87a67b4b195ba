//! Codec configuration.

/// Tuning and safety limits shared by the encoder and decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Largest original length the decoder accepts from a container.
    /// Checked before any output is allocated.
    pub max_decoded_len: u64,
    /// Minimum input size for parallel frequency counting.
    /// Only consulted with the `parallel` feature.
    pub parallel_threshold: usize,
}

impl CodecConfig {
    /// Default configuration.
    ///
    /// - 4 GiB decode limit
    /// - Parallel counting from 1 MiB of input
    pub const DEFAULT: Self = Self {
        max_decoded_len: 4 << 30,
        parallel_threshold: 1 << 20,
    };

    /// No decode limit. Only for containers from a trusted source.
    pub const UNLIMITED: Self = Self {
        max_decoded_len: u64::MAX,
        parallel_threshold: 1 << 20,
    };

    /// Create the default configuration.
    pub fn new() -> Self {
        Self::DEFAULT
    }

    /// Set the decode limit.
    pub fn with_max_decoded_len(mut self, limit: u64) -> Self {
        self.max_decoded_len = limit;
        self
    }

    /// Set the parallel counting threshold.
    pub fn with_parallel_threshold(mut self, bytes: usize) -> Self {
        self.parallel_threshold = bytes;
        self
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
