// Dictionary loading and arena traversal.

use std::fmt;

use serde::Serialize;

use crate::entries::EntryIterator;
use crate::format::{self, HEADER_SIZE, align_to, read_u32};
use crate::symbols::{self, SymbolTable};
use crate::transition::{
    STATE_RECORD_SIZE, StateRecord, TRANSITION_RECORD_SIZE, TransitionRecord,
};
use crate::{Arc, FstError, StateId, Traversal};

/// A read-only dictionary transducer.
///
/// Loaded from a `&[u8]` image, the state and transition tables are copied
/// into owned, aligned vectors. The structure is immutable after loading and
/// is `Send + Sync`, so it can be shared between threads behind an
/// `std::sync::Arc` or a plain reference.
pub struct Fst {
    key_count: u32,
    symbols: SymbolTable,
    states: Vec<StateRecord>,
    transitions: Vec<TransitionRecord>,
}

impl fmt::Debug for Fst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fst")
            .field("key_count", &self.key_count)
            .field("state_count", &self.states.len())
            .field("transition_count", &self.transitions.len())
            .field("alphabet_size", &self.symbols.alphabet_size())
            .finish()
    }
}

/// Size figures of a loaded dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub key_count: u32,
    pub state_count: usize,
    pub transition_count: usize,
    pub final_state_count: usize,
    pub alphabet_size: usize,
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "keys: {}", self.key_count)?;
        writeln!(f, "states: {}", self.state_count)?;
        writeln!(f, "transitions: {}", self.transition_count)?;
        writeln!(f, "final states: {}", self.final_state_count)?;
        write!(f, "alphabet: {}", self.alphabet_size)
    }
}

impl Fst {
    /// Load a dictionary from its binary image.
    ///
    /// Layout after the header and symbol table: state count and transition
    /// count (u32 each, 4-byte aligned), zero padding to a 16-byte boundary,
    /// the state table, then the transition table.
    pub fn from_bytes(data: &[u8]) -> Result<Self, FstError> {
        let header = format::parse_header(data)?;
        let (symbols, sym_end) = symbols::parse_symbol_table(data, HEADER_SIZE)?;

        let counts_offset = align_to(sym_end, 4);
        if counts_offset + 8 > data.len() {
            return Err(FstError::TooShort {
                expected: counts_offset + 8,
                actual: data.len(),
            });
        }
        let state_count = read_u32(data, counts_offset) as usize;
        let transition_count = read_u32(data, counts_offset + 4) as usize;

        if state_count == 0 {
            return Err(FstError::corrupt(StateId(0), "no start state"));
        }

        let states_offset = align_to(counts_offset + 8, 16);
        let transitions_offset = states_offset + state_count * STATE_RECORD_SIZE;
        let end = transitions_offset + transition_count * TRANSITION_RECORD_SIZE;
        if end > data.len() {
            return Err(FstError::TooShort {
                expected: end,
                actual: data.len(),
            });
        }

        // Copy into aligned Vecs; the source slice may not be aligned.
        let mut states = vec![StateRecord::default(); state_count];
        bytemuck::cast_slice_mut::<StateRecord, u8>(&mut states)
            .copy_from_slice(&data[states_offset..transitions_offset]);

        let mut transitions = vec![TransitionRecord::default(); transition_count];
        bytemuck::cast_slice_mut::<TransitionRecord, u8>(&mut transitions)
            .copy_from_slice(&data[transitions_offset..end]);

        Ok(Self {
            key_count: header.key_count,
            symbols,
            states,
            transitions,
        })
    }

    /// Number of keys stored.
    pub fn len(&self) -> usize {
        self.key_count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.key_count == 0
    }

    /// Access the symbol table.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn statistics(&self) -> Statistics {
        Statistics {
            key_count: self.key_count,
            state_count: self.states.len(),
            transition_count: self.transitions.len(),
            final_state_count: self.states.iter().filter(|s| s.is_final()).count(),
            alphabet_size: self.symbols.alphabet_size(),
        }
    }

    /// Iterate over all (key, weight) pairs in lexicographic order.
    pub fn entries(&self) -> EntryIterator<'_, Self> {
        EntryIterator::new(self)
    }

    fn state(&self, state: StateId) -> Result<&StateRecord, FstError> {
        self.states
            .get(state.0 as usize)
            .ok_or_else(|| FstError::corrupt(state, "state index out of range"))
    }

    /// The transition records owned by `state`.
    fn transition_slice(&self, state: StateId) -> Result<&[TransitionRecord], FstError> {
        let record = self.state(state)?;
        if record.transitions_end() > self.transitions.len() as u64 {
            return Err(FstError::corrupt(
                state,
                "transition range exceeds the transition table",
            ));
        }
        let start = record.first_transition as usize;
        Ok(&self.transitions[start..start + record.transition_count as usize])
    }

    fn resolve(&self, state: StateId, record: &TransitionRecord) -> Result<Arc, FstError> {
        let label = self.symbols.char_of(record.symbol).ok_or_else(|| {
            FstError::corrupt(state, format!("unknown symbol index {}", record.symbol))
        })?;
        if record.target as usize >= self.states.len() {
            return Err(FstError::corrupt(
                state,
                format!("transition target {} out of range", record.target),
            ));
        }
        if record.target <= state.0 {
            return Err(FstError::corrupt(
                state,
                format!("transition target {} does not lead forward", record.target),
            ));
        }
        Ok(Arc {
            label,
            target: StateId(record.target),
            output: record.output,
        })
    }
}

impl Traversal for Fst {
    fn start_state(&self) -> StateId {
        StateId(0)
    }

    fn transition_count(&self, state: StateId) -> Result<usize, FstError> {
        Ok(self.transition_slice(state)?.len())
    }

    fn transition(&self, state: StateId, index: usize) -> Result<Arc, FstError> {
        let slice = self.transition_slice(state)?;
        let record = slice
            .get(index)
            .ok_or_else(|| FstError::corrupt(state, format!("no transition {index}")))?;
        if index > 0 && slice[index - 1].symbol >= record.symbol {
            return Err(FstError::corrupt(state, "transitions are not sorted"));
        }
        self.resolve(state, record)
    }

    fn is_final(&self, state: StateId) -> Result<bool, FstError> {
        Ok(self.state(state)?.is_final())
    }

    fn final_output(&self, state: StateId) -> Result<Option<u32>, FstError> {
        let record = self.state(state)?;
        Ok(record.is_final().then_some(record.final_output))
    }

    fn max_remaining(&self, state: StateId) -> Result<Option<u32>, FstError> {
        Ok(Some(self.state(state)?.max_remaining))
    }

    fn in_alphabet(&self, label: char) -> bool {
        self.symbols.symbol_of(label).is_some()
    }

    /// Binary search over the state's sorted transition run.
    fn find_transition(&self, state: StateId, label: char) -> Result<Option<Arc>, FstError> {
        let Some(symbol) = self.symbols.symbol_of(label) else {
            return Ok(None);
        };
        let slice = self.transition_slice(state)?;
        match slice.binary_search_by_key(&symbol, |t| t.symbol) {
            Ok(i) => self.resolve(state, &slice[i]).map(Some),
            Err(_) => Ok(None),
        }
    }
}
