// keydex-build: Build a dictionary file from tab-separated entries.
//
// Reads `key<TAB>weight` lines from the given files (or stdin) and writes
// a dictionary image. Duplicate keys keep their largest weight.
//
// Usage:
//   keydex-build -o words.kdx [INPUT...]

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use clap::Parser;
use keydex::{DictionaryIndex, FstBuilder};
use tracing::info;

#[derive(Parser)]
#[command(name = "keydex-build")]
#[command(about = "Build a keydex dictionary from key<TAB>weight lines")]
#[command(version)]
struct Args {
    /// Output dictionary file
    #[arg(short, long)]
    output: PathBuf,

    /// Input files; stdin when omitted
    inputs: Vec<PathBuf>,
}

fn main() {
    keydex_cli::init_logging();
    let args = Args::parse();

    let mut entries = Vec::new();
    if args.inputs.is_empty() {
        let parsed = keydex_cli::parse_entries(io::stdin().lock())
            .unwrap_or_else(|e| keydex_cli::fatal(&format!("stdin: {e}")));
        entries.extend(parsed);
    }
    for input in &args.inputs {
        let file = File::open(input).unwrap_or_else(|e| {
            keydex_cli::fatal(&format!("failed to open {}: {e}", input.display()))
        });
        let parsed = keydex_cli::parse_entries(BufReader::new(file))
            .unwrap_or_else(|e| keydex_cli::fatal(&format!("{}: {e}", input.display())));
        entries.extend(parsed);
    }

    let read = entries.len();
    let image =
        FstBuilder::from_unsorted(entries).unwrap_or_else(|e| keydex_cli::fatal(&e.to_string()));
    std::fs::write(&args.output, &image).unwrap_or_else(|e| {
        keydex_cli::fatal(&format!("failed to write {}: {e}", args.output.display()))
    });

    // Reload to report what was written.
    let index = DictionaryIndex::from_bytes(&image)
        .unwrap_or_else(|e| keydex_cli::fatal(&e.to_string()));
    info!(
        entries = read,
        keys = index.len(),
        bytes = image.len(),
        output = %args.output.display(),
        "dictionary written"
    );
    eprintln!("{}", index.statistics());
}
