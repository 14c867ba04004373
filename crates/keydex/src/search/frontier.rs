// Edit-distance frontier carried by each fuzzy search node.

use hashbrown::HashMap;

/// Query-side parameters shared by every frontier of one search.
pub(crate) struct FuzzyQuery {
    query: Vec<char>,
    max_distance: u32,
    exact_prefix: usize,
}

impl FuzzyQuery {
    /// `exact_prefix` is clamped to the query length.
    pub(crate) fn new(query: &str, max_distance: u32, exact_prefix: usize) -> Self {
        let query: Vec<char> = query.chars().collect();
        let exact_prefix = exact_prefix.min(query.len());
        Self {
            query,
            max_distance,
            exact_prefix,
        }
    }

    fn end(&self) -> usize {
        self.query.len()
    }

    /// Edits are forbidden while the cursor is inside the exact prefix.
    fn editable(&self, cursor: usize) -> bool {
        cursor >= self.exact_prefix
    }
}

/// Reachable query cursors for one FST state, each with the minimum number
/// of edits spent to get there.
///
/// Cursor `i` means the first `i` query characters have been accounted for.
/// A cursor at the end of the query absorbs further key characters for free,
/// so the distance reported at the end cursor is the edit distance between
/// the query and the closest prefix of the key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Frontier {
    entries: HashMap<usize, u32>,
}

impl Frontier {
    /// Frontier before any key character: cursor 0, plus leading deletions.
    pub(crate) fn start(q: &FuzzyQuery) -> Self {
        let mut frontier = Self::default();
        frontier.relax(q, 0, 0);
        frontier.close_deletions(q);
        frontier
    }

    /// Keep `distance` at `cursor` if it is within bound and improves on what
    /// is already there.
    fn relax(&mut self, q: &FuzzyQuery, cursor: usize, distance: u32) {
        if distance > q.max_distance {
            return;
        }
        self.entries
            .entry(cursor)
            .and_modify(|d| *d = (*d).min(distance))
            .or_insert(distance);
    }

    /// Apply query-character deletions until nothing improves.
    ///
    /// Deletion moves the cursor forward one step at a cost of one edit, so a
    /// single ascending sweep reaches the fixpoint.
    fn close_deletions(&mut self, q: &FuzzyQuery) {
        for cursor in 0..q.end() {
            let Some(&d) = self.entries.get(&cursor) else {
                continue;
            };
            if q.editable(cursor) {
                self.relax(q, cursor + 1, d + 1);
            }
        }
    }

    /// Frontier after consuming key character `label`, or `None` if every
    /// cursor exceeds the distance bound.
    pub(crate) fn step(&self, q: &FuzzyQuery, label: char) -> Option<Self> {
        let mut next = Self::default();
        for (&cursor, &d) in &self.entries {
            if cursor == q.end() {
                next.relax(q, cursor, d);
                continue;
            }
            if q.query[cursor] == label {
                next.relax(q, cursor + 1, d);
            }
            if q.editable(cursor) {
                // Substitution, then insertion of `label`.
                next.relax(q, cursor + 1, d + 1);
                next.relax(q, cursor, d + 1);
            }
        }
        next.close_deletions(q);
        (!next.is_empty()).then_some(next)
    }

    /// Distance at which a key ending here matches, if it does.
    pub(crate) fn accepted(&self, q: &FuzzyQuery) -> Option<u32> {
        self.entries.get(&q.end()).copied()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
