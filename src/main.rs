//! `repair` CLI — compresses a file into an in-memory Re-Pair grammar and
//! reports summary statistics.
//!
//! Thin wrapper over the `repair_rs` library. Diagnostics go to stderr
//! (enable with `RUST_LOG=debug`); the summary goes to stdout.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::Parser;
use log::debug;
use repair_rs::Repair;

const DEFAULT_SLACK_BYTES: usize = 200;
/// Smallest slack that still holds the three-entry table minimum.
const MIN_SLACK_BYTES: usize = 24;

/// Memory-bounded Re-Pair grammar compressor.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// File to compress.
    #[arg(short = 'f', value_name = "FILENAME")]
    filename: Option<PathBuf>,

    /// Compress only the first PREFIX_LENGTH bytes.
    #[arg(short = 'p', value_name = "PREFIX_LENGTH")]
    prefix_length: Option<String>,

    /// Additional working memory in bytes.
    #[arg(short = 'm', value_name = "ADDITIONAL_MEMORY")]
    additional_memory: Option<String>,
}

fn main() {
    env_logger::init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            let _ = err.print();
            process::exit(3);
        }
    };

    process::exit(run(args));
}

fn run(args: Args) -> i32 {
    // Numeric options are parsed here, not by clap, so a malformed value
    // always maps to the same exit code.
    let prefix_length = match parse_positive(args.prefix_length.as_deref()) {
        Ok(value) => value,
        Err(text) => {
            eprintln!("Invalid numeric argument: {text}");
            return 2;
        }
    };
    let additional_memory = match parse_positive(args.additional_memory.as_deref()) {
        Ok(value) => value.unwrap_or(DEFAULT_SLACK_BYTES),
        Err(text) => {
            eprintln!("Invalid numeric argument: {text}");
            return 2;
        }
    };
    // Coerced up so the arena always holds the three-entry minimum.
    let slack_bytes = additional_memory.max(MIN_SLACK_BYTES);

    let Some(filename) = args.filename else {
        eprintln!("Need to specify a filename");
        return 4;
    };

    let mut file = match File::open(&filename) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Cannot open {}: {err}", filename.display());
            return 4;
        }
    };
    let file_size = match file.metadata() {
        Ok(metadata) => metadata.len(),
        Err(err) => {
            eprintln!("Cannot size {}: {err}", filename.display());
            return 3;
        }
    };

    let read_len = prefix_length
        .map_or(file_size, |p| p as u64)
        .min(file_size);
    let mut input = Vec::with_capacity(read_len as usize);
    if let Err(err) = file.take(read_len).read_to_end(&mut input) {
        eprintln!("Cannot read {}: {err}", filename.display());
        return 4;
    }

    debug!(
        "compressing {} bytes of {} with {} bytes of slack",
        input.len(),
        filename.display(),
        slack_bytes
    );

    let repair = match Repair::new(&input, slack_bytes) {
        Ok(repair) => repair,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };
    let grammar = match repair.compress() {
        Ok(grammar) => grammar,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };

    let stats = grammar.stats();
    println!("size of start symbol: {}", stats.start_length);
    println!("number of rounds: {}", stats.num_rounds);
    println!("number of non-terminals: {}", stats.num_rules);
    0
}

/// Parses an optional strictly positive integer, returning the offending
/// text on failure.
fn parse_positive(arg: Option<&str>) -> Result<Option<usize>, String> {
    match arg {
        None => Ok(None),
        Some(text) => match text.parse::<usize>() {
            Ok(value) if value > 0 => Ok(Some(value)),
            _ => Err(text.to_string()),
        },
    }
}
