//! nibble-huff-core: adaptive Huffman coding over 4-bit symbols
//!
//! Every input byte is coded as two nibbles (high, then low). Both sides of
//! the codec start from the same model, seeded from the set of nibble values
//! present in the input, and update it identically after every symbol, so no
//! code table is ever transmitted.
//!
//! # Architecture
//!
//! - `model`: symbols, presence sets, and the frequency model
//! - `tree`: arena-based Huffman tree builder with a deterministic merge order
//! - `code_table`: codewords derived from a tree
//! - `adaptive`: model + tree + table, rebuilt after every symbol
//! - `bitio`: MSB-first bit reader/writer with end-of-stream padding
//! - `header`: alphabet-presence header
//! - `encoder` / `decoder`: the two operations
//! - `metrics`: per-run report
//!
//! # Example
//! ```
//! use nibble_huff_core::{compress_bytes, decompress_bytes};
//!
//! let packed = compress_bytes(b"abracadabra").unwrap();
//! assert_eq!(decompress_bytes(&packed).unwrap(), b"abracadabra");
//! ```

pub mod adaptive;
pub mod bitio;
pub mod code_table;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod header;
pub mod metrics;
pub mod model;
pub mod tree;

// Re-export commonly used types
pub use decoder::{decompress, decompress_bytes};
pub use encoder::{compress, compress_bytes};
pub use error::{Error, Result};
pub use metrics::{CodecReport, Mode};
