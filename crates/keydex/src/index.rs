// DictionaryIndex: the query entry point over a loaded transducer.

use std::path::Path;
use std::time::Instant;

use keydex_core::Match;
use keydex_fst::{EntryIterator, Fst, Statistics, Traversal};
use tracing::{debug, info, warn};

use crate::error::DictError;
use crate::search::{self, SearchOutcome, SearchRequest};

/// A read-only dictionary answering exact, prefix and fuzzy queries.
///
/// All query methods take `&self`; an index can be shared between threads
/// (e.g. behind an `Arc`) and queried concurrently. Each query owns its own
/// search state.
///
/// The index is generic over the transducer so the query layer can run on
/// anything implementing [`Traversal`]. The default is the arena-backed
/// [`Fst`].
#[derive(Debug)]
pub struct DictionaryIndex<T = Fst> {
    traversal: T,
}

impl DictionaryIndex<Fst> {
    /// Load a dictionary file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DictError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| DictError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let index = Self::from_bytes(&data)?;
        info!(
            path = %path.display(),
            keys = index.len(),
            bytes = data.len(),
            "dictionary loaded"
        );
        Ok(index)
    }

    /// Load a dictionary from an in-memory image.
    pub fn from_bytes(data: &[u8]) -> Result<Self, DictError> {
        Fst::from_bytes(data)
            .map(Self::new)
            .map_err(DictError::Load)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.traversal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traversal.is_empty()
    }

    pub fn statistics(&self) -> Statistics {
        self.traversal.statistics()
    }

    /// Every (key, weight) pair in key order.
    pub fn entries(&self) -> EntryIterator<'_, Fst> {
        self.traversal.entries()
    }
}

impl<T: Traversal> DictionaryIndex<T> {
    pub fn new(traversal: T) -> Self {
        Self { traversal }
    }

    pub fn traversal(&self) -> &T {
        &self.traversal
    }

    /// The match for `key` if it is in the dictionary.
    pub fn lookup(&self, key: &str) -> Result<Option<Match>, DictError> {
        let outcome = self.search(&SearchRequest::exact(key))?;
        Ok(outcome.matches.into_iter().next())
    }

    pub fn contains(&self, key: &str) -> Result<bool, DictError> {
        Ok(self.lookup(key)?.is_some())
    }

    /// The `limit` best keys starting with `query`.
    pub fn complete(&self, query: &str, limit: usize) -> Result<Vec<Match>, DictError> {
        let outcome = self.search(&SearchRequest::prefix(query).with_limit(limit))?;
        Ok(outcome.matches)
    }

    /// The `limit` best keys that have a prefix within `max_edit_distance`
    /// edits of `query`.
    pub fn fuzzy_complete(
        &self,
        query: &str,
        max_edit_distance: i32,
        limit: usize,
    ) -> Result<Vec<Match>, DictError> {
        let request = SearchRequest::fuzzy(query, max_edit_distance).with_limit(limit);
        Ok(self.search(&request)?.matches)
    }

    /// Run a fully described request, with cancellation and deadline.
    pub fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, DictError> {
        let started = Instant::now();
        let result = search::run(&self.traversal, request);
        match &result {
            Ok(outcome) => debug!(
                query = %request.query,
                mode = request.mode.name(),
                limit = request.limit,
                matches = outcome.matches.len(),
                expansions = outcome.expansions,
                truncated = outcome.truncated,
                elapsed_us = started.elapsed().as_micros() as u64,
                "search finished"
            ),
            Err(DictError::CorruptIndex(e)) => warn!(
                query = %request.query,
                mode = request.mode.name(),
                error = %e,
                "search aborted on corrupt index"
            ),
            Err(e) => debug!(query = %request.query, error = %e, "search rejected"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keydex_fst::{Arc, FstBuilder, FstError, StateId};

    fn sample() -> DictionaryIndex {
        let data =
            FstBuilder::from_unsorted([("cat", 5), ("car", 3), ("can", 3), ("cart", 1)]).unwrap();
        DictionaryIndex::from_bytes(&data).unwrap()
    }

    #[test]
    fn lookup_and_contains() {
        let index = sample();
        assert_eq!(index.lookup("cat").unwrap(), Some(Match::new("cat", 5)));
        assert!(index.contains("cart").unwrap());
        assert!(!index.contains("ca").unwrap());
    }

    #[test]
    fn statistics_and_len() {
        let index = sample();
        assert_eq!(index.len(), 4);
        assert!(!index.is_empty());
        let stats = index.statistics();
        assert_eq!(stats.key_count, 4);
        assert_eq!(stats.final_state_count, 4);
    }

    #[test]
    fn bad_image_is_a_load_error() {
        let err = DictionaryIndex::from_bytes(&[0u8; 8]).unwrap_err();
        assert!(matches!(err, DictError::Load(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = DictionaryIndex::open("/nonexistent/keydex/dict.kdx").unwrap_err();
        assert!(matches!(err, DictError::Io { .. }));
    }

    #[test]
    fn open_reads_a_file() {
        let data = FstBuilder::from_unsorted([("hello", 2), ("help", 7)]).unwrap();
        let path = std::env::temp_dir().join(format!("keydex-open-{}.kdx", std::process::id()));
        std::fs::write(&path, &data).unwrap();
        let index = DictionaryIndex::open(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        let names: Vec<String> = index
            .complete("hel", 10)
            .unwrap()
            .into_iter()
            .map(Match::into_matched)
            .collect();
        assert_eq!(names, vec!["help", "hello"]);
    }

    /// Reports a transition into a state that does not exist.
    struct DanglingTarget;

    impl Traversal for DanglingTarget {
        fn start_state(&self) -> StateId {
            StateId(0)
        }

        fn transition_count(&self, state: StateId) -> Result<usize, FstError> {
            match state.0 {
                0 => Ok(1),
                _ => Err(FstError::Corrupt {
                    state: state.0,
                    reason: "state out of range".to_string(),
                }),
            }
        }

        fn transition(&self, _state: StateId, _index: usize) -> Result<Arc, FstError> {
            Ok(Arc {
                label: 'a',
                target: StateId(99),
                output: 0,
            })
        }

        fn is_final(&self, state: StateId) -> Result<bool, FstError> {
            Ok(self.final_output(state)?.is_some())
        }

        fn final_output(&self, state: StateId) -> Result<Option<u32>, FstError> {
            match state.0 {
                0 => Ok(None),
                _ => Err(FstError::Corrupt {
                    state: state.0,
                    reason: "state out of range".to_string(),
                }),
            }
        }
    }

    #[test]
    fn traversal_errors_surface_as_corrupt_index() {
        let index = DictionaryIndex::new(DanglingTarget);
        assert!(matches!(
            index.complete("", 5),
            Err(DictError::CorruptIndex(_))
        ));
        assert!(matches!(
            index.fuzzy_complete("b", 1, 5),
            Err(DictError::CorruptIndex(_))
        ));
        assert!(matches!(index.lookup("a"), Err(DictError::CorruptIndex(_))));
    }

    /// Every state loops back to the start on two labels.
    struct TwoLoops;

    impl Traversal for TwoLoops {
        fn start_state(&self) -> StateId {
            StateId(0)
        }

        fn transition_count(&self, _state: StateId) -> Result<usize, FstError> {
            Ok(2)
        }

        fn transition(&self, _state: StateId, index: usize) -> Result<Arc, FstError> {
            Ok(Arc {
                label: if index == 0 { 'a' } else { 'b' },
                target: StateId(0),
                output: 0,
            })
        }

        fn is_final(&self, _state: StateId) -> Result<bool, FstError> {
            Ok(false)
        }

        fn final_output(&self, _state: StateId) -> Result<Option<u32>, FstError> {
            Ok(None)
        }

        fn max_remaining(&self, _state: StateId) -> Result<Option<u32>, FstError> {
            Ok(Some(0))
        }
    }

    #[test]
    fn cyclic_traversal_is_corrupt_index() {
        let index = DictionaryIndex::new(TwoLoops);
        assert!(matches!(
            index.complete("", 1),
            Err(DictError::CorruptIndex(FstError::Corrupt { .. }))
        ));
        assert!(matches!(
            index.fuzzy_complete("ab", 1, 1),
            Err(DictError::CorruptIndex(FstError::Corrupt { .. }))
        ));
    }

    #[test]
    fn works_through_a_reference() {
        let index = sample();
        let borrowed = DictionaryIndex::new(index.traversal());
        assert_eq!(borrowed.complete("ca", 1).unwrap()[0].matched(), "cat");
    }
}
