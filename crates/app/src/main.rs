//! nibble-huff: compress or decompress one file with the adaptive nibble codec.

mod config;
mod logging;

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;
use std::process::ExitCode;

use nibble_huff_core::{compress, decompress, CodecReport, Mode};
use thiserror::Error;
use tracing::{debug, error};

use config::{Command, Config};

/// Exit status for a malformed command line.
const EXIT_USAGE: u8 = 2;

/// Fatal conditions of a run.
#[derive(Debug, Error)]
enum RunError {
    #[error("input file couldn't be opened: {0}")]
    OpenInput(#[source] io::Error),

    #[error("output file couldn't be opened: {0}")]
    OpenOutput(#[source] io::Error),

    #[error(transparent)]
    Codec(#[from] nibble_huff_core::Error),
}

fn main() -> ExitCode {
    logging::init_tracing();

    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "nibble-huff".to_string());
    let args: Vec<String> = args.collect();

    let config = match Config::from_args(&args) {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            config::print_help();
            return ExitCode::SUCCESS;
        }
        Err(msg) => {
            eprintln!("Error: {msg}");
            config::print_usage(&program);
            return ExitCode::from(EXIT_USAGE);
        }
    };

    if config.print_stats {
        config.print();
    }

    match run(&config) {
        Ok(report) => {
            if config.print_stats {
                report.print_summary();
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(mode = %config.mode, "run failed: {e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Open both files and run the codec.
///
/// The input is opened first so a missing input never creates the output.
fn run(config: &Config) -> Result<CodecReport, RunError> {
    let input = open_input(&config.input_file)?;
    let output = File::create(&config.output_file).map_err(RunError::OpenOutput)?;
    let output = BufWriter::new(output);

    debug!(
        mode = %config.mode,
        input = %config.input_file.display(),
        output = %config.output_file.display(),
        "starting"
    );

    let report = match config.mode {
        Mode::Compress => compress(input, output)?,
        Mode::Decompress => decompress(input, output)?,
    };
    Ok(report)
}

fn open_input(path: &Path) -> Result<BufReader<File>, RunError> {
    File::open(path).map(BufReader::new).map_err(RunError::OpenInput)
}
