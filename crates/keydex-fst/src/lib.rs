//! Finite state transducer dictionaries.
//!
//! A dictionary maps string keys to integer weights. It is stored as an
//! acyclic transducer: an arena of fixed-size state records, each owning a
//! sorted run of transition records. A key's weight is the sum of the output
//! fragments on its path plus the final output of the accepting state.
//!
//! # Architecture
//!
//! - [`format`] -- Binary header parsing and validation
//! - [`transition`] -- Zero-copy state and transition record layout
//! - [`symbols`] -- Symbol table (char-to-index and index-to-char mapping)
//! - [`fst`] -- Arena loading and the [`Traversal`] implementation
//! - [`entries`] -- Lexicographic iteration over all keys
//! - [`builder`] -- Building a dictionary image from sorted keys

pub mod builder;
pub mod entries;
pub mod format;
pub mod fst;
pub mod symbols;
pub mod transition;

pub use builder::FstBuilder;
pub use entries::EntryIterator;
pub use fst::{Fst, Statistics};

/// Error type for dictionary loading, traversal and building.
#[derive(Debug, thiserror::Error)]
pub enum FstError {
    #[error("invalid magic number in dictionary header")]
    InvalidMagic,
    #[error("file too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },
    #[error("unsupported dictionary format version {0}")]
    UnsupportedVersion(u8),
    #[error("reserved header bytes are not zero")]
    ReservedBytes,
    #[error("invalid symbol table: {0}")]
    InvalidSymbolTable(String),
    #[error("corrupt transducer at state {state}: {reason}")]
    Corrupt { state: u32, reason: String },
    #[error("key {key:?} inserted after {previous:?}; keys must be strictly increasing")]
    KeyOutOfOrder { previous: String, key: String },
    #[error("key of {0} characters exceeds the maximum key length")]
    KeyTooLong(usize),
    #[error("alphabet exceeds the symbol table capacity")]
    TooManySymbols,
}

impl FstError {
    pub(crate) fn corrupt(state: StateId, reason: impl Into<String>) -> Self {
        FstError::Corrupt {
            state: state.0,
            reason: reason.into(),
        }
    }
}

/// Maximum key length in characters.
///
/// Traversals deeper than this can only happen on a cyclic (corrupt)
/// transducer and are reported as [`FstError::Corrupt`].
pub const MAX_KEY_LENGTH: usize = 4096;

/// Handle of a state in the transducer arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub u32);

/// One outgoing transition: consumes `label`, moves to `target` and emits
/// `output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arc {
    pub label: char,
    pub target: StateId,
    pub output: u32,
}

/// Read-only traversal interface over a transducer.
///
/// This is the only way the query layer touches a dictionary. Every method
/// takes `&self`, so one transducer can serve any number of concurrent
/// queries. Implementations report structural inconsistencies through
/// [`FstError::Corrupt`] instead of panicking.
///
/// Transitions of a state must be sorted by label.
pub trait Traversal {
    fn start_state(&self) -> StateId;

    fn transition_count(&self, state: StateId) -> Result<usize, FstError>;

    /// The `index`-th outgoing transition of `state`, in label order.
    fn transition(&self, state: StateId, index: usize) -> Result<Arc, FstError>;

    fn is_final(&self, state: StateId) -> Result<bool, FstError>;

    /// Output emitted when a key ends at `state`, or `None` if the state is
    /// not final.
    fn final_output(&self, state: StateId) -> Result<Option<u32>, FstError>;

    /// Upper bound on the output still collectable from `state` to any final
    /// state below it, or `None` if unknown. Used to prune weight-ordered
    /// searches; a transducer without bounds is searched exhaustively.
    fn max_remaining(&self, _state: StateId) -> Result<Option<u32>, FstError> {
        Ok(None)
    }

    /// Whether `label` is part of the transducer's alphabet.
    fn in_alphabet(&self, _label: char) -> bool {
        true
    }

    /// Find the transition of `state` labelled `label`.
    fn find_transition(&self, state: StateId, label: char) -> Result<Option<Arc>, FstError> {
        for index in 0..self.transition_count(state)? {
            let arc = self.transition(state, index)?;
            if arc.label == label {
                return Ok(Some(arc));
            }
            if arc.label > label {
                break;
            }
        }
        Ok(None)
    }

    /// Iterate over all transitions of `state`.
    fn transitions(&self, state: StateId) -> Result<Transitions<'_, Self>, FstError>
    where
        Self: Sized,
    {
        let count = self.transition_count(state)?;
        Ok(Transitions {
            traversal: self,
            state,
            index: 0,
            count,
        })
    }
}

/// Iterator over the transitions of one state.
pub struct Transitions<'a, T: Traversal> {
    traversal: &'a T,
    state: StateId,
    index: usize,
    count: usize,
}

impl<T: Traversal> Iterator for Transitions<'_, T> {
    type Item = Result<Arc, FstError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }
        let arc = self.traversal.transition(self.state, self.index);
        self.index += 1;
        Some(arc)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.count - self.index;
        (rest, Some(rest))
    }
}

impl<T: Traversal> Traversal for &T {
    fn start_state(&self) -> StateId {
        (**self).start_state()
    }

    fn transition_count(&self, state: StateId) -> Result<usize, FstError> {
        (**self).transition_count(state)
    }

    fn transition(&self, state: StateId, index: usize) -> Result<Arc, FstError> {
        (**self).transition(state, index)
    }

    fn is_final(&self, state: StateId) -> Result<bool, FstError> {
        (**self).is_final(state)
    }

    fn final_output(&self, state: StateId) -> Result<Option<u32>, FstError> {
        (**self).final_output(state)
    }

    fn max_remaining(&self, state: StateId) -> Result<Option<u32>, FstError> {
        (**self).max_remaining(state)
    }

    fn in_alphabet(&self, label: char) -> bool {
        (**self).in_alphabet(label)
    }

    fn find_transition(&self, state: StateId, label: char) -> Result<Option<Arc>, FstError> {
        (**self).find_transition(state, label)
    }
}
