//! Two-pass compression.
//!
//! Pass 1 records which nibble values occur (stopping early once all 16 have
//! been seen). The header for that presence set is written, then pass 2
//! rewinds the input and codes every nibble, high before low, with the code
//! table of the moment, updating the model after each one.
//!
//! When only one symbol is present every codeword is empty, so the byte
//! count is written as an Elias-gamma code right after the header. This
//! length field is an extension of the plain header-plus-codewords layout
//! and makes single-symbol streams incompatible with decoders that lack it
//! (a 1-byte input gains one payload bit and its padding drops from 4 to 3).
//! Streams with two or more symbols carry no length field and are unaffected.

use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

use tracing::debug;

use crate::adaptive::AdaptiveCode;
use crate::bitio::BitWriter;
use crate::error::Result;
use crate::header::write_header;
use crate::metrics::{CodecReport, Mode};
use crate::model::{PresenceSet, Symbol};

const CHUNK_SIZE: usize = 8192;

/// Result of the presence pre-scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreScan {
    pub presence: PresenceSet,
    /// Bytes read before the scan stopped (the full length unless every
    /// symbol turned up early)
    pub bytes_scanned: u64,
}

/// Read `input` until EOF or until all 16 symbols have been seen.
pub fn prescan<R: Read>(input: &mut R) -> Result<PreScan> {
    let mut presence = PresenceSet::new();
    let mut bytes_scanned = 0u64;
    let mut buf = [0u8; CHUNK_SIZE];

    'scan: loop {
        let n = read_chunk(input, &mut buf)?;
        if n == 0 {
            break;
        }
        for &byte in &buf[..n] {
            bytes_scanned += 1;
            let (high, low) = Symbol::split_byte(byte);
            presence.insert(high);
            presence.insert(low);
            if presence.is_full() {
                break 'scan;
            }
        }
    }

    Ok(PreScan {
        presence,
        bytes_scanned,
    })
}

/// Compress everything from `input`'s current position to EOF into `output`.
///
/// `input` is rewound to where it started for the second pass; `output`
/// must be seekable so byte 0 can be patched with the padding count.
pub fn compress<R, W>(mut input: R, output: W) -> Result<CodecReport>
where
    R: Read + Seek,
    W: Write + Seek,
{
    let mut report = CodecReport::new(Mode::Compress);

    let start = input.stream_position()?;
    let scan = prescan(&mut input)?;
    input.seek(SeekFrom::Start(start))?;
    debug!(
        present = scan.presence.len(),
        bytes_scanned = scan.bytes_scanned,
        "pre-scan complete"
    );

    let mut writer = BitWriter::new(output)?;
    write_header(&mut writer, scan.presence)?;
    report.header_bits = writer.bit_len();
    report.alphabet_size = scan.presence.len();

    if scan.presence.sole_symbol().is_some() {
        writer.write_gamma(scan.bytes_scanned)?;
    }

    if !scan.presence.is_empty() {
        let mut code = AdaptiveCode::new(scan.presence)?;
        let mut buf = [0u8; CHUNK_SIZE];
        loop {
            let n = read_chunk(&mut input, &mut buf)?;
            if n == 0 {
                break;
            }
            for &byte in &buf[..n] {
                let (high, low) = Symbol::split_byte(byte);
                for symbol in [high, low] {
                    writer.write_codeword(code.codeword(symbol)?)?;
                    code.update(symbol)?;
                    report.symbols_coded += 1;
                }
                report.input_bytes += 1;
            }
        }
        report.tree_rebuilds = code.rebuilds();
    }

    let total_bits = writer.bit_len();
    let (_, summary) = writer.finish()?;
    report.payload_bits = total_bits - report.header_bits;
    report.output_bytes = summary.bytes_written;
    report.padding_bits = summary.padding_bits;
    report.complete();

    debug!(
        input_bytes = report.input_bytes,
        output_bytes = report.output_bytes,
        padding_bits = report.padding_bits,
        "compression complete"
    );
    Ok(report)
}

/// Compress an in-memory buffer.
pub fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Cursor::new(Vec::new());
    compress(Cursor::new(data), &mut output)?;
    Ok(output.into_inner())
}

fn read_chunk<R: Read>(input: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match input.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            result => return result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prescan_records_both_nibbles() {
        let scan = prescan(&mut Cursor::new(vec![0x3C, 0x33])).unwrap();
        assert_eq!(scan.presence.len(), 2);
        assert!(scan.presence.contains(Symbol::new(3).unwrap()));
        assert!(scan.presence.contains(Symbol::new(0xC).unwrap()));
        assert_eq!(scan.bytes_scanned, 2);
    }

    #[test]
    fn test_prescan_stops_once_full() {
        let mut data: Vec<u8> = (0..8u8).map(|i| (i << 4) | (i + 8)).collect();
        data.extend_from_slice(&[0xFF; 100]);
        let mut input = Cursor::new(data);
        let scan = prescan(&mut input).unwrap();
        assert!(scan.presence.is_full());
        assert_eq!(scan.bytes_scanned, 8);
    }

    #[test]
    fn test_empty_input_is_header_only() {
        let out = compress_bytes(&[]).unwrap();
        // flag 0, padding 4, empty bitmap
        assert_eq!(out, vec![0b0100_0000, 0x00, 0x00]);
    }

    #[test]
    fn test_single_byte_zero() {
        let out = compress_bytes(&[0x00]).unwrap();
        // 0 000 1000000000000000 + gamma(1) = "1", then 3 padding bits
        assert_eq!(out, vec![0b0011_1000, 0x00, 0b0000_1000]);
    }

    #[test]
    fn test_report_counts() {
        let mut output = Cursor::new(Vec::new());
        let report = compress(Cursor::new(b"abcabc".to_vec()), &mut output).unwrap();
        assert_eq!(report.input_bytes, 6);
        assert_eq!(report.symbols_coded, 12);
        assert_eq!(report.tree_rebuilds, 13);
        assert_eq!(report.header_bits, 20);
        assert_eq!(report.output_bytes, output.get_ref().len() as u64);
        assert!(report.end_time.is_some());
    }

    #[test]
    fn test_compress_from_offset() {
        let mut input = Cursor::new(vec![0xAA, 0xBB, 0x12, 0x34]);
        input.set_position(2);
        let mut output = Cursor::new(Vec::new());
        let report = compress(&mut input, &mut output).unwrap();
        assert_eq!(report.input_bytes, 2);
        assert_eq!(report.alphabet_size, 4);
    }
}
