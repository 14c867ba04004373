// Error type for dictionary queries.

use std::path::PathBuf;

use keydex_fst::FstError;

/// Errors returned by [`crate::DictionaryIndex`].
///
/// Cancellation is not an error: a cancelled search returns its partial
/// results with [`crate::SearchOutcome::truncated`] set.
#[derive(Debug, thiserror::Error)]
pub enum DictError {
    /// A query parameter is out of range (e.g. a negative edit distance).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The transducer reported an inconsistent structure during a query.
    /// The query is aborted; nothing is returned.
    #[error("corrupt index: {0}")]
    CorruptIndex(#[from] FstError),

    /// The dictionary image could not be loaded.
    #[error("failed to load dictionary: {0}")]
    Load(#[source] FstError),

    /// The dictionary file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
