// Exact lookup and prefix completion.

use keydex_core::Match;
use keydex_fst::{FstError, StateId, Traversal};

use super::SearchOutcome;
use super::cancel::Interrupt;
use super::enumerate::{Root, Unconstrained, best_first};

/// Follow `query` from the start state. Returns the reached state and the
/// output collected on the way, or `None` if the path leaves the transducer.
pub(crate) fn walk<T: Traversal>(
    traversal: &T,
    query: &str,
) -> Result<Option<(StateId, u64)>, FstError> {
    let mut state = traversal.start_state();
    let mut output = 0u64;
    for ch in query.chars() {
        if !traversal.in_alphabet(ch) {
            return Ok(None);
        }
        match traversal.find_transition(state, ch)? {
            Some(arc) => {
                state = arc.target;
                output += u64::from(arc.output);
            }
            None => return Ok(None),
        }
    }
    Ok(Some((state, output)))
}

pub(crate) fn lookup<T: Traversal>(traversal: &T, key: &str) -> Result<Option<Match>, FstError> {
    let Some((state, output)) = walk(traversal, key)? else {
        return Ok(None);
    };
    Ok(traversal
        .final_output(state)?
        .map(|fo| Match::new(key, output + u64::from(fo))))
}

/// The `limit` heaviest keys starting with `query`.
pub(crate) fn complete<T: Traversal>(
    traversal: &T,
    query: &str,
    limit: usize,
    interrupt: &mut Interrupt<'_>,
) -> Result<SearchOutcome, FstError> {
    let Some((state, output)) = walk(traversal, query)? else {
        return Ok(SearchOutcome::default());
    };
    let root = Root {
        state,
        prefix: query.to_string(),
        output,
        cursor: (),
    };
    best_first(traversal, &Unconstrained, root, limit, interrupt)
}
