//! Decompression.
//!
//! The decoder mirrors the encoder: it rebuilds the initial model from the
//! header, then decodes one symbol at a time by walking the current tree,
//! bumping the model after every symbol exactly as the encoder did.

use std::io::{Cursor, Read, Seek, SeekFrom, Write};

use tracing::debug;

use crate::adaptive::AdaptiveCode;
use crate::bitio::BitReader;
use crate::error::{CorruptStreamError, Result};
use crate::header::read_header;
use crate::metrics::{CodecReport, Mode};
use crate::model::Symbol;
use crate::tree::HuffmanTree;

/// Decode one symbol by walking `tree` from the root.
///
/// Returns `None` when the stream is exhausted before the first bit of the
/// codeword, which is the clean end of the stream. Running out partway
/// down the tree is corruption.
pub fn decode_symbol<R: Read>(
    reader: &mut BitReader<R>,
    tree: &HuffmanTree,
    symbols: u64,
) -> Result<Option<Symbol>> {
    let mut index = tree.root();
    let mut depth = 0usize;

    loop {
        if let Some(symbol) = tree.symbol_at(index) {
            return Ok(Some(symbol));
        }
        let Some(bit) = reader.read_bit()? else {
            if depth == 0 {
                return Ok(None);
            }
            return Err(CorruptStreamError::TruncatedCodeword { symbols }.into());
        };
        index = tree
            .child(index, bit)
            .ok_or(CorruptStreamError::InvalidChild { symbols })?;
        depth += 1;
    }
}

/// Decompress everything from `input`'s current position to EOF into `output`.
///
/// Bytes decoded before a corruption is detected have already been written
/// to `output` when the error is returned.
pub fn decompress<R, W>(mut input: R, mut output: W) -> Result<CodecReport>
where
    R: Read + Seek,
    W: Write,
{
    let mut report = CodecReport::new(Mode::Decompress);

    let start = input.stream_position()?;
    let end = input.seek(SeekFrom::End(0))?;
    input.seek(SeekFrom::Start(start))?;
    report.input_bytes = end - start;

    let mut reader = BitReader::new(input, report.input_bytes);
    let header = read_header(&mut reader)?;
    report.header_bits = reader.position();
    report.padding_bits = header.padding_bits;
    report.alphabet_size = header.presence.len();
    debug!(
        present = header.presence.len(),
        padding_bits = header.padding_bits,
        "header decoded"
    );

    if !header.presence.is_empty() {
        // Only a single-symbol stream carries its byte count
        let byte_count = match header.presence.sole_symbol() {
            Some(_) => Some(
                reader
                    .read_gamma()?
                    .ok_or(CorruptStreamError::BadLength)?,
            ),
            None => None,
        };

        let mut code = AdaptiveCode::new(header.presence)?;
        let mut high: Option<Symbol> = None;

        loop {
            if byte_count.is_some_and(|n| report.output_bytes == n) {
                break;
            }
            let Some(symbol) = decode_symbol(&mut reader, code.tree(), report.symbols_coded)? else {
                if high.is_some() {
                    return Err(CorruptStreamError::TruncatedPair {
                        byte: report.output_bytes,
                    }
                    .into());
                }
                break;
            };

            match high.take() {
                None => high = Some(symbol),
                Some(h) => {
                    output.write_all(&[Symbol::join(h, symbol)])?;
                    report.output_bytes += 1;
                }
            }
            code.update(symbol)?;
            report.symbols_coded += 1;
        }

        if byte_count.is_some() && reader.bits_remaining() > 0 {
            return Err(CorruptStreamError::TrailingBits(reader.bits_remaining()).into());
        }
        report.tree_rebuilds = code.rebuilds();
    } else if reader.bits_remaining() > 0 {
        // An empty alphabet codes nothing after the header
        return Err(CorruptStreamError::TrailingBits(reader.bits_remaining()).into());
    }

    output.flush()?;
    report.payload_bits = reader.position() - report.header_bits;
    report.complete();

    debug!(
        input_bytes = report.input_bytes,
        output_bytes = report.output_bytes,
        "decompression complete"
    );
    Ok(report)
}

/// Decompress an in-memory buffer.
pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    decompress(Cursor::new(data), &mut output)?;
    Ok(output)
}
