// keydex-lookup: Exact key lookup.
//
// Prints `key<TAB>weight` for every word found in the dictionary, or
// `word: not found`.
//
// Usage:
//   keydex-lookup [-d DICT] [--json] [WORD...]

use std::io::{self, Write};

use clap::Parser;
use keydex_cli::DictArgs;

#[derive(Parser)]
#[command(name = "keydex-lookup")]
#[command(about = "Look up exact keys in a keydex dictionary")]
#[command(version)]
struct Args {
    #[command(flatten)]
    dict: DictArgs,

    /// Words to look up; read from stdin (one per line) when omitted
    words: Vec<String>,
}

fn main() {
    keydex_cli::init_logging();
    let args = Args::parse();
    let index = keydex_cli::load_index(args.dict.dict.as_deref())
        .unwrap_or_else(|e| keydex_cli::fatal(&e));

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    for word in keydex_cli::words_or_stdin(args.words) {
        let found = index
            .lookup(&word)
            .unwrap_or_else(|e| keydex_cli::fatal(&e.to_string()));
        let _ = match (found, args.dict.json) {
            (Some(m), true) => writeln!(out, "{}", serde_json::to_string(&m).unwrap_or_default()),
            (Some(m), false) => writeln!(out, "{m}"),
            (None, true) => writeln!(out, "{}", serde_json::json!({ "matched": word, "found": false })),
            (None, false) => writeln!(out, "{word}: not found"),
        };
    }
}
