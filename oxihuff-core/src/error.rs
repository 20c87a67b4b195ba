//! Error types for OxiHuff operations.
//!
//! Every failure a decode call can report is terminal: a container is either
//! well-formed or it is not, so there is nothing to retry. The variants carry
//! enough detail for callers to tell a damaged header apart from a payload
//! that simply ends too early.

use std::io;
use thiserror::Error;

/// The main error type for OxiHuff operations.
#[derive(Debug, Error)]
pub enum OxiHuffError {
    /// I/O error from the caller's reader or writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed container: bad magic, inconsistent counts, invalid
    /// code-length table, or a bit pattern that matches no code.
    #[error("Corrupt container: {message}")]
    CorruptContainer {
        /// Description of the inconsistency.
        message: String,
    },

    /// The payload ended before the declared number of symbols was decoded.
    #[error("Truncated input: decoded {decoded} of {expected} symbols")]
    TruncatedInput {
        /// Declared original length.
        expected: u64,
        /// Symbols produced before the bit stream ran out.
        decoded: u64,
    },

    /// The container magic is known but its version is not.
    #[error("Unsupported container version: {version}")]
    UnsupportedVersion {
        /// Version byte found in the header.
        version: u8,
    },

    /// A bit read was attempted past the meaningful bits of a stream.
    #[error("End of bit stream at bit position {bit_position}")]
    EndOfStream {
        /// Bit position of the failed read.
        bit_position: u64,
    },

    /// The declared decoded length exceeds the configured limit.
    #[error("Declared output length {declared} exceeds limit {limit}")]
    OutputLimitExceeded {
        /// Length declared by the container.
        declared: u64,
        /// Maximum accepted length.
        limit: u64,
    },
}

/// Result type alias for OxiHuff operations.
pub type Result<T> = std::result::Result<T, OxiHuffError>;

impl OxiHuffError {
    /// Create a corrupt container error.
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::CorruptContainer {
            message: message.into(),
        }
    }

    /// Create a truncated input error.
    pub fn truncated(expected: u64, decoded: u64) -> Self {
        Self::TruncatedInput { expected, decoded }
    }

    /// Create an unsupported version error.
    pub fn unsupported_version(version: u8) -> Self {
        Self::UnsupportedVersion { version }
    }

    /// Create an end-of-stream error.
    pub fn end_of_stream(bit_position: u64) -> Self {
        Self::EndOfStream { bit_position }
    }

    /// Create an output limit error.
    pub fn output_limit(declared: u64, limit: u64) -> Self {
        Self::OutputLimitExceeded { declared, limit }
    }

    /// Whether this error reports a damaged container rather than a short one.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::CorruptContainer { .. })
    }
}
