//! Error types for the nibble-huff codec.
//!
//! All operations return structured errors rather than panicking.
//! Every error is fatal to the operation that raised it; the caller decides
//! how to report it.

use thiserror::Error;

/// Top-level error type for all codec operations.
///
/// Each variant corresponds to a specific failure domain:
/// - Bit I/O: packing or unpacking bits
/// - Model: frequency model misuse (absent or out-of-range symbols)
/// - Corrupt: the compressed input cannot be decoded
/// - I/O: the underlying reader or writer failed
#[derive(Debug, Error)]
pub enum Error {
    /// Bit I/O operation failed (e.g., writing more than 64 bits at once)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Frequency model or tree construction error
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// The compressed stream is malformed
    #[error("invalid input file: {0}")]
    Corrupt(#[from] CorruptStreamError),

    /// Stream I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bit-level I/O errors.
#[derive(Debug, Error)]
pub enum BitIoError {
    /// Invalid bit count (more than 64 bits in one call)
    #[error("invalid bit count: {0}")]
    InvalidBitCount(usize),

    /// Elias-gamma codes cannot represent zero
    #[error("gamma code requires a value of at least 1")]
    GammaZero,

    /// Padding count recovered from a header is out of range
    #[error("invalid padding count {0}: must be below 8")]
    InvalidPadding(u8),
}

/// Frequency model errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// Value does not fit in a nibble
    #[error("symbol {0} is outside the nibble alphabet")]
    SymbolOutOfRange(u8),

    /// Symbol was not marked present when the model was seeded
    #[error("symbol {0:#x} was not present when the model was seeded")]
    AbsentSymbol(u8),

    /// No symbol has a nonzero weight (cannot build a tree)
    #[error("empty frequency table: cannot build a tree")]
    EmptyAlphabet,
}

/// Conditions that make a compressed stream undecodable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CorruptStreamError {
    /// Stream ended before the presence header was complete
    #[error("stream ends inside the header")]
    TruncatedHeader,

    /// Stream ended inside a codeword
    #[error("stream ends inside a codeword after {symbols} symbols")]
    TruncatedCodeword { symbols: u64 },

    /// Tree walk reached a child that does not exist
    #[error("invalid child reference after {symbols} symbols")]
    InvalidChild { symbols: u64 },

    /// Stream ended between the high and low nibble of a byte
    #[error("stream ends between the two nibbles of byte {byte}")]
    TruncatedPair { byte: u64 },

    /// Length field of a single-symbol stream is malformed
    #[error("malformed length field for single-symbol stream")]
    BadLength,

    /// Bits remain after the declared content of a single-symbol stream
    #[error("{0} unexpected trailing bits")]
    TrailingBits(u64),
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
