// Best-first enumeration of final states, ordered by an upper bound on weight.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use keydex_core::Match;
use keydex_fst::{FstError, MAX_KEY_LENGTH, StateId, Traversal};

use super::SearchOutcome;
use super::cancel::Interrupt;
use super::topk::TopK;

/// Decides which paths a search may follow and which keys it reports.
///
/// A cursor is the per-node acceptor state. It travels with the search node
/// and is advanced once per consumed label.
pub(crate) trait Acceptor {
    type Cursor;

    /// Advance over `label`, or `None` to prune the subtree.
    fn step(&self, cursor: &Self::Cursor, label: char) -> Option<Self::Cursor>;

    /// Build the match for a key ending at a node with this cursor, or `None`
    /// if the key is not accepted.
    fn accept(&self, cursor: &Self::Cursor, key: &str, weight: u64) -> Option<Match>;
}

/// Accepts every key below the root.
pub(crate) struct Unconstrained;

impl Acceptor for Unconstrained {
    type Cursor = ();

    fn step(&self, _cursor: &(), _label: char) -> Option<()> {
        Some(())
    }

    fn accept(&self, _cursor: &(), key: &str, weight: u64) -> Option<Match> {
        Some(Match::new(key, weight))
    }
}

/// Where an enumeration starts.
pub(crate) struct Root<C> {
    pub state: StateId,
    pub prefix: String,
    pub output: u64,
    pub cursor: C,
}

struct Node<C> {
    bound: u64,
    seq: u64,
    state: StateId,
    prefix: String,
    depth: usize,
    output: u64,
    cursor: C,
}

// Highest bound first; among equal bounds, last queued first, so ties go
// depth-first.
impl<C> Ord for Node<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bound
            .cmp(&other.bound)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl<C> PartialOrd for Node<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C> PartialEq for Node<C> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<C> Eq for Node<C> {}

fn corrupt(state: StateId, reason: &str) -> FstError {
    FstError::Corrupt {
        state: state.0,
        reason: reason.to_string(),
    }
}

/// Largest weight reachable from `state` having collected `output`.
fn upper_bound<T: Traversal>(traversal: &T, state: StateId, output: u64) -> Result<u64, FstError> {
    Ok(match traversal.max_remaining(state)? {
        Some(remaining) => output.saturating_add(u64::from(remaining)),
        None => u64::MAX,
    })
}

/// Collect the `limit` best accepted keys below `root`.
///
/// Nodes are expanded in order of decreasing weight bound. The search ends
/// when the queue is empty or when the best remaining bound can no longer
/// enter the Top-K, so the result is exact while whole subtrees of light
/// keys are never visited. An interrupt ends the search early with
/// `truncated` set and whatever was collected so far.
pub(crate) fn best_first<T, A>(
    traversal: &T,
    acceptor: &A,
    root: Root<A::Cursor>,
    limit: usize,
    interrupt: &mut Interrupt<'_>,
) -> Result<SearchOutcome, FstError>
where
    T: Traversal,
    A: Acceptor,
{
    let mut topk = TopK::new(limit);
    let mut queue = BinaryHeap::new();
    let mut seq = 0u64;
    let mut expansions = 0u64;
    let mut truncated = false;

    queue.push(Node {
        bound: upper_bound(traversal, root.state, root.output)?,
        seq,
        state: root.state,
        depth: root.prefix.chars().count(),
        prefix: root.prefix,
        output: root.output,
        cursor: root.cursor,
    });

    while let Some(node) = queue.pop() {
        if !topk.admits(node.bound) {
            break;
        }
        if interrupt.should_stop() {
            truncated = true;
            break;
        }
        expansions += 1;

        if let Some(final_output) = traversal.final_output(node.state)? {
            let weight = node.output + u64::from(final_output);
            if weight > node.bound {
                return Err(corrupt(node.state, "final weight exceeds the state's bound"));
            }
            if topk.admits(weight) {
                if let Some(candidate) = acceptor.accept(&node.cursor, &node.prefix, weight) {
                    topk.offer(candidate);
                }
            }
        }

        let count = traversal.transition_count(node.state)?;
        if count > 0 && node.depth >= MAX_KEY_LENGTH {
            return Err(corrupt(node.state, "path exceeds the maximum key length"));
        }
        for index in 0..count {
            let arc = traversal.transition(node.state, index)?;
            let Some(cursor) = acceptor.step(&node.cursor, arc.label) else {
                continue;
            };
            let output = node.output + u64::from(arc.output);
            let bound = upper_bound(traversal, arc.target, output)?;
            if bound > node.bound {
                return Err(corrupt(arc.target, "weight bound increases along a transition"));
            }
            if !topk.admits(bound) {
                continue;
            }
            let mut prefix = String::with_capacity(node.prefix.len() + arc.label.len_utf8());
            prefix.push_str(&node.prefix);
            prefix.push(arc.label);
            seq += 1;
            queue.push(Node {
                bound,
                seq,
                state: arc.target,
                prefix,
                depth: node.depth + 1,
                output,
                cursor,
            });
        }
    }

    Ok(SearchOutcome {
        matches: topk.into_sorted_vec(),
        truncated,
        expansions,
    })
}
