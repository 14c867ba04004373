// keydex-cli: shared utilities for CLI tools.

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::process;

use clap::Args;
use keydex::DictionaryIndex;
use tracing_subscriber::EnvFilter;

/// Environment variable naming the dictionary file.
pub const DICT_ENV: &str = "KEYDEX_DICT";

/// Environment variable holding the log filter (e.g. `keydex=debug`).
pub const LOG_ENV: &str = "KEYDEX_LOG";

/// Dictionary file looked up in the current directory as a last resort.
pub const DEFAULT_DICT_FILE: &str = "keydex.kdx";

/// Options shared by every tool that reads a dictionary.
#[derive(Debug, Clone, Args)]
pub struct DictArgs {
    /// Dictionary file
    #[arg(short, long, env = DICT_ENV)]
    pub dict: Option<PathBuf>,

    /// Print results as JSON lines
    #[arg(long)]
    pub json: bool,
}

/// Install the stderr log subscriber. The filter comes from `KEYDEX_LOG`
/// and defaults to `warn`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

/// Find the dictionary file and open it.
///
/// Search order:
/// 1. `dict` (from `--dict` or `KEYDEX_DICT`)
/// 2. `keydex.kdx` in the current working directory
pub fn load_index(dict: Option<&Path>) -> Result<DictionaryIndex, String> {
    let search_paths = build_search_paths(dict);

    for path in &search_paths {
        if path.is_file() {
            return DictionaryIndex::open(path).map_err(|e| e.to_string());
        }
    }

    Err(format!(
        "could not find a dictionary in any of the search paths:\n{}",
        search_paths
            .iter()
            .map(|p| format!("  - {}", p.display()))
            .collect::<Vec<_>>()
            .join("\n")
    ))
}

/// Build the list of candidate dictionary files.
fn build_search_paths(dict: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(p) = dict {
        paths.push(p.to_path_buf());
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(DEFAULT_DICT_FILE));
    }

    paths
}

/// Parse `key<TAB>weight` lines. Blank lines are skipped; a line without a
/// tab gets weight 1.
pub fn parse_entries(reader: impl BufRead) -> Result<Vec<(String, u32)>, String> {
    let mut entries = Vec::new();
    for (n, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| format!("line {}: {e}", n + 1))?;
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            continue;
        }
        let entry = match line.rsplit_once('\t') {
            Some((key, weight)) => {
                let weight = weight
                    .trim()
                    .parse::<u32>()
                    .map_err(|e| format!("line {}: invalid weight {weight:?}: {e}", n + 1))?;
                (key.to_string(), weight)
            }
            None => (line.to_string(), 1),
        };
        entries.push(entry);
    }
    Ok(entries)
}

/// Query words from the command line, or from stdin (one per line) if none
/// were given.
pub fn words_or_stdin(words: Vec<String>) -> impl Iterator<Item = String> {
    let from_stdin = words.is_empty();
    let stdin_lines = from_stdin
        .then(|| std::io::stdin().lock().lines().map_while(Result::ok))
        .into_iter()
        .flatten();
    words.into_iter().chain(stdin_lines)
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_is_searched_first() {
        let paths = build_search_paths(Some(Path::new("/tmp/words.kdx")));
        assert_eq!(paths[0], PathBuf::from("/tmp/words.kdx"));
        assert!(paths.last().unwrap().ends_with(DEFAULT_DICT_FILE));
    }

    #[test]
    fn parse_tab_separated_entries() {
        let input = "cat\t5\ncar\t3\n\nplain\n";
        let entries = parse_entries(input.as_bytes()).unwrap();
        assert_eq!(
            entries,
            vec![
                ("cat".to_string(), 5),
                ("car".to_string(), 3),
                ("plain".to_string(), 1),
            ]
        );
    }

    #[test]
    fn key_may_contain_tabs() {
        let entries = parse_entries("a\tb\t7\r\n".as_bytes()).unwrap();
        assert_eq!(entries, vec![("a\tb".to_string(), 7)]);
    }

    #[test]
    fn bad_weight_reports_line() {
        let err = parse_entries("cat\t5\ndog\tmany\n".as_bytes()).unwrap_err();
        assert!(err.starts_with("line 2"), "{err}");
    }

    #[test]
    fn missing_dictionary_lists_search_paths() {
        let err = load_index(Some(Path::new("/nonexistent/keydex/words.kdx"))).unwrap_err();
        assert!(err.contains("/nonexistent/keydex/words.kdx"));
    }
}
