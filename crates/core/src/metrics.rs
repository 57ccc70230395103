//! Metrics collected while compressing or decompressing one stream.
//!
//! A `CodecReport` is filled in by the encoder or decoder as it runs and
//! returned to the caller:
//! - Byte counts in and out
//! - Symbols coded and trees rebuilt
//! - Header, payload, and padding bit counts
//! - Timing
//!
//! The report is owned by the single call that produced it.

use std::fmt;
use std::time::{Duration, Instant};

/// Which direction the codec ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Compress,
    Decompress,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Compress => f.write_str("compress"),
            Mode::Decompress => f.write_str("decompress"),
        }
    }
}

/// Observable results of one codec run.
#[derive(Debug, Clone)]
pub struct CodecReport {
    pub mode: Mode,

    // === Timing ===
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    // === Input/Output ===
    /// Bytes consumed from the input stream
    pub input_bytes: u64,

    /// Bytes written to the output stream
    pub output_bytes: u64,

    // === Model ===
    /// Distinct symbols present in the stream
    pub alphabet_size: usize,

    /// Symbols coded (two per byte)
    pub symbols_coded: u64,

    /// Trees built, including the initial one
    pub tree_rebuilds: u64,

    // === Stream layout ===
    /// Bits occupied by the presence header
    pub header_bits: u64,

    /// Bits occupied by the coded stream after the header
    pub payload_bits: u64,

    /// Unused trailing bits in the final byte
    pub padding_bits: u8,
}

impl CodecReport {
    /// Create a report with start time set to now.
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            start_time: Instant::now(),
            end_time: None,
            input_bytes: 0,
            output_bytes: 0,
            alphabet_size: 0,
            symbols_coded: 0,
            tree_rebuilds: 0,
            header_bits: 0,
            payload_bits: 0,
            padding_bits: 0,
        }
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Size of the compressed side divided by the size of the raw side.
    ///
    /// Returns 0.0 if the raw side is empty.
    pub fn compression_ratio(&self) -> f64 {
        let (raw, packed) = match self.mode {
            Mode::Compress => (self.input_bytes, self.output_bytes),
            Mode::Decompress => (self.output_bytes, self.input_bytes),
        };
        if raw == 0 {
            0.0
        } else {
            packed as f64 / raw as f64
        }
    }

    /// Average coded bits per symbol, excluding the header.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.symbols_coded == 0 {
            0.0
        } else {
            self.payload_bits as f64 / self.symbols_coded as f64
        }
    }

    /// Compute throughput in input bytes/second.
    pub fn throughput_bps(&self) -> f64 {
        let duration_secs = self.duration().as_secs_f64();
        if duration_secs == 0.0 {
            0.0
        } else {
            self.input_bytes as f64 / duration_secs
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== {} Summary ===", self.mode);
        println!("Duration: {} ms", self.duration().as_millis());
        println!();
        println!("Input:  {} bytes", self.input_bytes);
        println!("Output: {} bytes", self.output_bytes);
        println!("Ratio:  {:.1}%", self.compression_ratio() * 100.0);
        println!();
        println!("=== Model ===");
        println!("Alphabet: {} of 16 symbols", self.alphabet_size);
        println!("Symbols coded: {}", self.symbols_coded);
        println!("Tree rebuilds: {}", self.tree_rebuilds);
        println!();
        println!("=== Stream ===");
        println!("Header bits: {}", self.header_bits);
        println!("Payload bits: {} ({:.3} bits/symbol)", self.payload_bits, self.bits_per_symbol());
        println!("Padding bits: {}", self.padding_bits);
        println!();
        println!("=== Performance ===");
        println!("Throughput: {:.2} MB/s", self.throughput_bps() / 1_000_000.0);
        println!();
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "mode={}\n\
             duration_ms={}\n\
             input_bytes={}\n\
             output_bytes={}\n\
             compression_ratio={:.4}\n\
             alphabet_size={}\n\
             symbols_coded={}\n\
             tree_rebuilds={}\n\
             header_bits={}\n\
             payload_bits={}\n\
             padding_bits={}\n",
            self.mode,
            self.duration().as_millis(),
            self.input_bytes,
            self.output_bytes,
            self.compression_ratio(),
            self.alphabet_size,
            self.symbols_coded,
            self.tree_rebuilds,
            self.header_bits,
            self.payload_bits,
            self.padding_bits,
        )
    }
}
