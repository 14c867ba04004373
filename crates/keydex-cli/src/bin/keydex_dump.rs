// keydex-dump: Print every entry of a dictionary, or its statistics.
//
// Usage:
//   keydex-dump [-d DICT] [--stats] [--json]

use std::io::{self, Write};

use clap::Parser;
use keydex::Match;
use keydex_cli::DictArgs;

#[derive(Parser)]
#[command(name = "keydex-dump")]
#[command(about = "List the entries of a keydex dictionary in key order")]
#[command(version)]
struct Args {
    #[command(flatten)]
    dict: DictArgs,

    /// Print size statistics instead of entries
    #[arg(long)]
    stats: bool,
}

fn main() {
    keydex_cli::init_logging();
    let args = Args::parse();
    let index = keydex_cli::load_index(args.dict.dict.as_deref())
        .unwrap_or_else(|e| keydex_cli::fatal(&e));

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    if args.stats {
        let stats = index.statistics();
        let _ = if args.dict.json {
            writeln!(out, "{}", serde_json::to_string(&stats).unwrap_or_default())
        } else {
            writeln!(out, "{stats}")
        };
        return;
    }

    for entry in index.entries() {
        let (key, weight) = entry.unwrap_or_else(|e| keydex_cli::fatal(&e.to_string()));
        let m = Match::new(key, weight);
        let _ = if args.dict.json {
            writeln!(out, "{}", serde_json::to_string(&m).unwrap_or_default())
        } else {
            writeln!(out, "{m}")
        };
    }
}
