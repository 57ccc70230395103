//! Alphabet-presence header.
//!
//! # Layout
//!
//! ```text
//! bit 0      full-alphabet flag (1 = all 16 symbols present)
//! bits 1-3   written as 0; later overwritten with the padding count
//! bits 4-19  presence bitmap, symbol 0 first (omitted when the flag is 1)
//! ```
//!
//! The header is not byte-aligned: the coded symbol stream starts right after
//! its last bit.

use std::io::{Read, Seek, Write};

use crate::bitio::{BitReader, BitWriter};
use crate::error::{CorruptStreamError, Result};
use crate::model::{PresenceSet, Symbol};

/// Width of the field that ends up holding the padding count.
pub const RESERVED_BITS: usize = 3;

/// Decoded header contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub presence: PresenceSet,
    /// Bits 1-3 of byte 0 as read back (the writer's padding count)
    pub padding_bits: u8,
}

impl Header {
    /// Header bits the encoder emits for `presence`.
    pub fn bit_len(presence: PresenceSet) -> usize {
        if presence.is_full() {
            1 + RESERVED_BITS
        } else {
            1 + RESERVED_BITS + 16
        }
    }
}

/// Emit the header for `presence`.
pub fn write_header<W: Write + Seek>(writer: &mut BitWriter<W>, presence: PresenceSet) -> Result<()> {
    let full = presence.is_full();
    writer.write_bit(full)?;
    writer.write_bits(0, RESERVED_BITS)?;
    if !full {
        writer.write_bits(presence.bitmap() as u64, 16)?;
    }
    Ok(())
}

/// Parse the header and install its padding count on the reader.
///
/// # Errors
/// `CorruptStreamError::TruncatedHeader` if the stream ends mid-header.
pub fn read_header<R: Read>(reader: &mut BitReader<R>) -> Result<Header> {
    let full = next_bit(reader)?;

    let mut padding_bits = 0u8;
    for _ in 0..RESERVED_BITS {
        padding_bits = (padding_bits << 1) | next_bit(reader)? as u8;
    }
    reader.set_padding(padding_bits)?;

    let mut presence = PresenceSet::new();
    for symbol in Symbol::all() {
        if full || next_bit(reader)? {
            presence.insert(symbol);
        }
    }

    Ok(Header {
        presence,
        padding_bits,
    })
}

fn next_bit<R: Read>(reader: &mut BitReader<R>) -> Result<bool> {
    reader
        .read_bit()?
        .ok_or_else(|| CorruptStreamError::TruncatedHeader.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Cursor;

    fn encode(presence: PresenceSet) -> Vec<u8> {
        let mut writer = BitWriter::new(Cursor::new(Vec::new())).unwrap();
        write_header(&mut writer, presence).unwrap();
        let (sink, _) = writer.finish().unwrap();
        sink.into_inner()
    }

    fn decode(bytes: &[u8]) -> Result<Header> {
        let mut reader = BitReader::new(Cursor::new(bytes), bytes.len() as u64);
        read_header(&mut reader)
    }

    #[test]
    fn test_partial_alphabet_layout() {
        let mut presence = PresenceSet::new();
        presence.insert(Symbol::new(0).unwrap());
        let bytes = encode(presence);

        // flag 0, padding 4 in bits 1-3, bitmap 1000 0000 0000 0000
        assert_eq!(bytes, vec![0b0100_1000, 0x00, 0x00]);

        let header = decode(&bytes).unwrap();
        assert_eq!(header.presence, presence);
        assert_eq!(header.padding_bits, 4);
    }

    #[test]
    fn test_full_alphabet_skips_bitmap() {
        assert_eq!(Header::bit_len(PresenceSet::full()), 4);
        let bytes = encode(PresenceSet::full());
        // 1000 + 4 padding bits
        assert_eq!(bytes, vec![0b1100_0000]);

        let header = decode(&bytes).unwrap();
        assert!(header.presence.is_full());
        assert_eq!(header.padding_bits, 4);
    }

    #[test]
    fn test_empty_presence_round_trip() {
        let bytes = encode(PresenceSet::new());
        assert_eq!(bytes.len(), 3);
        assert!(decode(&bytes).unwrap().presence.is_empty());
    }

    #[test]
    fn test_truncated_header() {
        let err = decode(&[0b0000_1111]).unwrap_err();
        assert!(matches!(err, Error::Corrupt(CorruptStreamError::TruncatedHeader)));
    }
}
