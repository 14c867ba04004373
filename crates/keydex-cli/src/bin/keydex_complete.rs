// keydex-complete: Prefix and fuzzy completion.
//
// For each query prints the best completions, one per line, as
// `key<TAB>weight` (plus `<TAB>distance` in fuzzy mode).
//
// Usage:
//   keydex-complete [-d DICT] [-n LIMIT] [--fuzzy N] [--exact-prefix N]
//                   [--timeout-ms MS] [--json] [QUERY...]

use std::io::{self, Write};
use std::time::Duration;

use clap::Parser;
use keydex::SearchRequest;
use keydex_cli::DictArgs;

#[derive(Parser)]
#[command(name = "keydex-complete")]
#[command(about = "Complete prefixes, optionally tolerating typos")]
#[command(version)]
struct Args {
    #[command(flatten)]
    dict: DictArgs,

    /// Maximum number of completions per query
    #[arg(short = 'n', long, default_value_t = keydex::search::DEFAULT_LIMIT)]
    limit: usize,

    /// Allow up to N edits between the query and a key prefix
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    fuzzy: Option<i32>,

    /// Leading query characters that must match exactly (fuzzy mode)
    #[arg(long, value_name = "N", default_value_t = 0)]
    exact_prefix: usize,

    /// Give up on a query after this many milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Queries; read from stdin (one per line) when omitted
    queries: Vec<String>,
}

impl Args {
    fn request(&self, query: &str) -> SearchRequest {
        let request = match self.fuzzy {
            Some(d) => SearchRequest::fuzzy(query, d).with_exact_prefix(self.exact_prefix),
            None => SearchRequest::prefix(query),
        }
        .with_limit(self.limit);
        match self.timeout_ms {
            Some(ms) => request.with_timeout(Duration::from_millis(ms)),
            None => request,
        }
    }
}

fn main() {
    keydex_cli::init_logging();
    let mut args = Args::parse();
    let index = keydex_cli::load_index(args.dict.dict.as_deref())
        .unwrap_or_else(|e| keydex_cli::fatal(&e));

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    let queries = std::mem::take(&mut args.queries);
    for query in keydex_cli::words_or_stdin(queries) {
        let outcome = index
            .search(&args.request(&query))
            .unwrap_or_else(|e| keydex_cli::fatal(&e.to_string()));

        if args.dict.json {
            let line = serde_json::json!({
                "query": query,
                "matches": outcome.matches,
                "truncated": outcome.truncated,
            });
            let _ = writeln!(out, "{line}");
            continue;
        }

        let _ = writeln!(out, "{query}:");
        if outcome.matches.is_empty() {
            let _ = writeln!(out, "  (no completions)");
        }
        for m in &outcome.matches {
            let _ = writeln!(out, "  {m}");
        }
        if outcome.truncated {
            let _ = writeln!(out, "  (timed out; results may be incomplete)");
        }
    }
}
