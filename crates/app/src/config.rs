//! Configuration for the nibble-huff command-line tool.
//!
//! Parses the command line into a mode plus exactly one input and one output
//! path. Anything else is a usage error, reported before any file is opened.

use std::path::PathBuf;

use nibble_huff_core::Mode;

/// Complete configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Compress or decompress
    pub mode: Mode,

    /// Input file path
    pub input_file: PathBuf,

    /// Output file path
    pub output_file: PathBuf,

    /// Whether to print the codec summary after a successful run
    pub print_stats: bool,
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Config),
    Help,
}

impl Config {
    /// Parse configuration from command-line arguments (without the program name).
    ///
    /// Accepts `-c` / `--compress` or `-d` / `--decompress`, followed by the
    /// input and output paths. `--stats` may appear anywhere.
    pub fn from_args(args: &[String]) -> Result<Command, String> {
        let mut mode: Option<Mode> = None;
        let mut paths: Vec<PathBuf> = Vec::with_capacity(2);
        let mut print_stats = false;

        for arg in args {
            match arg.as_str() {
                "-c" | "--compress" => {
                    if mode.replace(Mode::Compress).is_some() {
                        return Err("mode given more than once".to_string());
                    }
                }
                "-d" | "--decompress" => {
                    if mode.replace(Mode::Decompress).is_some() {
                        return Err("mode given more than once".to_string());
                    }
                }
                "--stats" => {
                    print_stats = true;
                }
                "--help" | "-h" => {
                    return Ok(Command::Help);
                }
                other if other.starts_with('-') && other.len() > 1 => {
                    return Err(format!("unknown argument: {other}"));
                }
                path => {
                    paths.push(PathBuf::from(path));
                }
            }
        }

        let mode = mode.ok_or("missing mode: expected -c or -d")?;
        let [input_file, output_file]: [PathBuf; 2] = paths
            .try_into()
            .map_err(|p: Vec<PathBuf>| format!("expected an input and an output file, got {} paths", p.len()))?;

        Ok(Command::Run(Config {
            mode,
            input_file,
            output_file,
            print_stats,
        }))
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        println!("Mode:        {}", self.mode);
        println!("Input file:  {}", self.input_file.display());
        println!("Output file: {}", self.output_file.display());
        println!();
    }
}

pub fn print_usage(program: &str) {
    eprintln!("Usage: {program} [-c|-d] infile outfile");
}

pub fn print_help() {
    println!("nibble-huff: adaptive Huffman coding over 4-bit symbols");
    println!();
    println!("USAGE:");
    println!("    nibble-huff [OPTIONS] <-c|-d> <INFILE> <OUTFILE>");
    println!();
    println!("MODES:");
    println!("    -c, --compress          Compress INFILE into OUTFILE");
    println!("    -d, --decompress        Decompress INFILE into OUTFILE");
    println!();
    println!("OPTIONS:");
    println!("    --stats                 Print a codec summary after the run");
    println!("    --help, -h              Print this help");
    println!();
    println!("ENVIRONMENT:");
    println!("    NIBBLE_HUFF_LOG         Log filter (e.g. debug, nibble_huff_core=trace)");
    println!();
    println!("EXAMPLES:");
    println!("    nibble-huff -c notes.txt notes.nh");
    println!("    nibble-huff -d notes.nh notes.txt --stats");
    println!();
}
