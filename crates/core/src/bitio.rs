//! Bit-level I/O over byte streams.
//!
//! This module provides `BitWriter` and `BitReader` for the coded stream.
//! Both operate in MSB-first order: the first bit written lands in the most
//! significant free position of the current byte.
//!
//! # Padding Rules
//! - `BitWriter`: pads the final partial byte with zeros, then folds the
//!   number of padding bits into bits 1-3 of byte 0 (mask `0x70`).
//! - `BitReader`: is told the padding count once the header has been parsed
//!   and reports end of stream (`None`) instead of returning padding bits.
//!
//! # Example
//! ```
//! use std::io::Cursor;
//! use nibble_huff_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new(Cursor::new(Vec::new())).unwrap();
//! writer.write_bits(0b0000_1011, 8).unwrap();
//! writer.write_bits(0b11, 2).unwrap();
//! let (sink, summary) = writer.finish().unwrap();
//! let bytes = sink.into_inner();
//! assert_eq!(summary.padding_bits, 6);
//! assert_eq!(bytes, vec![0b0110_1011, 0b1100_0000]);
//!
//! let mut reader = BitReader::new(Cursor::new(&bytes), bytes.len() as u64);
//! reader.set_padding(6).unwrap();
//! for _ in 0..10 {
//!     assert!(reader.read_bit().unwrap().is_some());
//! }
//! assert_eq!(reader.read_bit().unwrap(), None);
//! ```

use std::io::{Read, Seek, SeekFrom, Write};

use crate::code_table::Codeword;
use crate::error::{BitIoError, Result};

/// Bit position of the padding count inside byte 0.
pub const PADDING_SHIFT: u32 = 4;

/// What `BitWriter::finish` produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSummary {
    /// Total bytes emitted to the sink
    pub bytes_written: u64,
    /// Unused low bits in the final byte (0-7)
    pub padding_bits: u8,
}

/// Writes bits MSB-first into a seekable byte sink.
///
/// Complete bytes go to the sink as soon as they fill up. The first emitted
/// byte is remembered so `finish` can rewrite it with the padding count.
///
/// # Invariants
/// - `bit_count` is always < 8
#[derive(Debug)]
pub struct BitWriter<W: Write + Seek> {
    sink: W,
    /// Sink offset of byte 0
    origin: u64,
    /// Accumulator for the current partial byte (MSB-aligned)
    bit_buffer: u8,
    /// Number of bits in bit_buffer (0-7)
    bit_count: u8,
    first_byte: Option<u8>,
    bytes_written: u64,
}

impl<W: Write + Seek> BitWriter<W> {
    /// Create a writer that starts at the sink's current position.
    pub fn new(mut sink: W) -> Result<Self> {
        let origin = sink.stream_position()?;
        Ok(Self {
            sink,
            origin,
            bit_buffer: 0,
            bit_count: 0,
            first_byte: None,
            bytes_written: 0,
        })
    }

    /// Write up to 64 bits to the output.
    ///
    /// Bits are written MSB-first. For example, writing value=0b101 with count=3
    /// writes bits 1, 0, 1 in that order.
    ///
    /// # Errors
    /// Returns `BitIoError::InvalidBitCount` if count > 64, or an I/O error
    /// if the sink rejects a completed byte.
    pub fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        let mut remaining = count;
        let mut val = value;

        while remaining > 0 {
            let bits_to_write = remaining.min(8 - self.bit_count as usize);

            // Top bits_to_write bits of what is left
            let shift = remaining - bits_to_write;
            let bits = ((val >> shift) & ((1u64 << bits_to_write) - 1)) as u8;

            self.bit_buffer |= bits << (8 - self.bit_count as usize - bits_to_write);
            self.bit_count += bits_to_write as u8;

            if self.bit_count == 8 {
                let byte = self.bit_buffer;
                self.emit(byte)?;
                self.bit_buffer = 0;
                self.bit_count = 0;
            }

            val &= (1u64 << shift) - 1;
            remaining -= bits_to_write;
        }

        Ok(())
    }

    /// Write a single bit.
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.write_bits(bit as u64, 1)
    }

    /// Write a codeword produced by a `CodeTable`.
    pub fn write_codeword(&mut self, codeword: Codeword) -> Result<()> {
        self.write_bits(codeword.bits() as u64, codeword.len())
    }

    /// Write `value` (at least 1) as an Elias-gamma code: one zero per bit
    /// after the leading one, then the value itself MSB-first.
    pub fn write_gamma(&mut self, value: u64) -> Result<()> {
        if value == 0 {
            return Err(BitIoError::GammaZero.into());
        }
        let width = 64 - value.leading_zeros() as usize;
        self.write_bits(0, width - 1)?;
        self.write_bits(value, width)
    }

    /// Total bits written so far (including the partial byte).
    pub fn bit_len(&self) -> u64 {
        self.bytes_written * 8 + self.bit_count as u64
    }

    /// Flush the partial byte and patch the padding count into byte 0.
    ///
    /// A partial byte always leaves 1-7 unused bits, so `padding << 4`
    /// only touches mask `0x70` of the remembered first byte. When the stream
    /// ends on a byte boundary the padding is 0 and byte 0 is left alone.
    /// Bits 1-3 of byte 0 must have been written as zero; anything the
    /// caller put there is ORed with the count.
    ///
    /// Returns the sink, positioned after the last byte.
    pub fn finish(mut self) -> Result<(W, StreamSummary)> {
        let mut padding_bits = 0;
        if self.bit_count > 0 {
            padding_bits = 8 - self.bit_count;
            let byte = self.bit_buffer;
            self.emit(byte)?;
        }

        if padding_bits > 0 {
            if let Some(first) = self.first_byte {
                let patched = first | (padding_bits << PADDING_SHIFT);
                self.sink.seek(SeekFrom::Start(self.origin))?;
                self.sink.write_all(&[patched])?;
                self.sink.seek(SeekFrom::Start(self.origin + self.bytes_written))?;
            }
        }
        self.sink.flush()?;

        let summary = StreamSummary {
            bytes_written: self.bytes_written,
            padding_bits,
        };
        Ok((self.sink, summary))
    }

    fn emit(&mut self, byte: u8) -> Result<()> {
        self.sink.write_all(&[byte])?;
        self.first_byte.get_or_insert(byte);
        self.bytes_written += 1;
        Ok(())
    }
}

/// Reads bits MSB-first from a byte source of known length.
///
/// The reader loads one byte at a time and counts down the bytes still
/// unread, so it knows when the final byte is current. Once `8 - padding`
/// bits of the final byte have been consumed, `read_bit` yields `None`.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    source: R,
    current: u8,
    /// Unread bits left in `current` (0-8)
    bits_left: u8,
    /// Bytes not yet loaded from the source
    bytes_remaining: u64,
    padding: u8,
    bits_read: u64,
}

impl<R: Read> BitReader<R> {
    /// Create a reader over `len` bytes of `source`.
    pub fn new(source: R, len: u64) -> Self {
        Self {
            source,
            current: 0,
            bits_left: 0,
            bytes_remaining: len,
            padding: 0,
            bits_read: 0,
        }
    }

    /// Install the number of unused trailing bits in the final byte.
    ///
    /// May be called after the final byte was loaded; the bound is checked
    /// on every read.
    pub fn set_padding(&mut self, padding: u8) -> Result<()> {
        if padding >= 8 {
            return Err(BitIoError::InvalidPadding(padding).into());
        }
        self.padding = padding;
        Ok(())
    }

    /// Read one bit, or `None` once the logical stream is exhausted.
    pub fn read_bit(&mut self) -> Result<Option<bool>> {
        if self.bits_left == 0 {
            if self.bytes_remaining == 0 {
                return Ok(None);
            }
            let mut byte = [0u8; 1];
            self.source.read_exact(&mut byte)?;
            self.current = byte[0];
            self.bits_left = 8;
            self.bytes_remaining -= 1;
        }

        if self.bytes_remaining == 0 && self.bits_left <= self.padding {
            return Ok(None);
        }

        self.bits_left -= 1;
        self.bits_read += 1;
        Ok(Some((self.current >> self.bits_left) & 1 == 1))
    }

    /// Read up to 64 bits MSB-first; `None` if the stream ends first.
    pub fn read_bits(&mut self, count: usize) -> Result<Option<u64>> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }
        let mut value = 0u64;
        for _ in 0..count {
            match self.read_bit()? {
                Some(bit) => value = (value << 1) | bit as u64,
                None => return Ok(None),
            }
        }
        Ok(Some(value))
    }

    /// Read an Elias-gamma code written by `BitWriter::write_gamma`.
    ///
    /// Returns `None` if the stream ends first or the code is longer than
    /// 64 bits.
    pub fn read_gamma(&mut self) -> Result<Option<u64>> {
        let mut zeros = 0usize;
        loop {
            match self.read_bit()? {
                Some(true) => break,
                Some(false) if zeros < 63 => zeros += 1,
                _ => return Ok(None),
            }
        }
        let tail = match self.read_bits(zeros)? {
            Some(tail) => tail,
            None => return Ok(None),
        };
        Ok(Some((1u64 << zeros) | tail))
    }

    /// Logical bits not yet consumed.
    pub fn bits_remaining(&self) -> u64 {
        let total = self.bits_left as u64 + self.bytes_remaining * 8;
        total.saturating_sub(self.padding as u64)
    }

    /// Bits consumed so far.
    pub fn position(&self) -> u64 {
        self.bits_read
    }
}
