// Fuzzy completion: Levenshtein-bounded product search over the transducer.

use keydex_core::Match;
use keydex_fst::{FstError, Traversal};

use super::SearchOutcome;
use super::cancel::Interrupt;
use super::enumerate::{Acceptor, Root, best_first};
use super::frontier::{Frontier, FuzzyQuery};

impl Acceptor for FuzzyQuery {
    type Cursor = Frontier;

    fn step(&self, cursor: &Frontier, label: char) -> Option<Frontier> {
        cursor.step(self, label)
    }

    fn accept(&self, cursor: &Frontier, key: &str, weight: u64) -> Option<Match> {
        cursor
            .accepted(self)
            .map(|distance| Match::with_distance(key, weight, distance))
    }
}

/// The `limit` best keys that have a prefix within `max_distance` edits of
/// `query`. The first `exact_prefix` query characters must match exactly.
pub(crate) fn fuzzy_complete<T: Traversal>(
    traversal: &T,
    query: &str,
    max_distance: u32,
    exact_prefix: usize,
    limit: usize,
    interrupt: &mut Interrupt<'_>,
) -> Result<SearchOutcome, FstError> {
    let fuzzy = FuzzyQuery::new(query, max_distance, exact_prefix);
    let root = Root {
        state: traversal.start_state(),
        prefix: String::new(),
        output: 0,
        cursor: Frontier::start(&fuzzy),
    };
    best_first(traversal, &fuzzy, root, limit, interrupt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keydex_fst::{Fst, FstBuilder};

    fn sample() -> Fst {
        let data = FstBuilder::from_unsorted([
            ("cat", 5),
            ("car", 3),
            ("can", 3),
            ("cart", 1),
            ("dog", 4),
        ])
        .unwrap();
        Fst::from_bytes(&data).unwrap()
    }

    fn fuzzy(fst: &Fst, query: &str, d: u32, limit: usize) -> Vec<(String, Option<u32>)> {
        fuzzy_complete(fst, query, d, 0, limit, &mut Interrupt::none())
            .unwrap()
            .matches
            .into_iter()
            .map(|m| (m.matched().to_string(), m.distance()))
            .collect()
    }

    #[test]
    fn swapped_letters_within_one_edit() {
        let fst = sample();
        assert_eq!(
            fuzzy(&fst, "cta", 1, 3),
            vec![
                ("cat".to_string(), Some(1)),
                ("car".to_string(), Some(1)),
                ("can".to_string(), Some(1)),
            ]
        );
    }

    #[test]
    fn zero_distance_is_prefix_completion() {
        let fst = sample();
        assert_eq!(
            fuzzy(&fst, "car", 0, 10),
            vec![("car".to_string(), Some(0)), ("cart".to_string(), Some(0))]
        );
    }

    #[test]
    fn out_of_alphabet_query_still_matches_with_edits() {
        let fst = sample();
        let got = fuzzy(&fst, "cxt", 1, 10);
        assert_eq!(got[0], ("cat".to_string(), Some(1)));
        assert!(fuzzy(&fst, "xyz", 0, 10).is_empty());
    }

    #[test]
    fn weight_ranks_before_distance() {
        let fst = sample();
        // "dot" is one edit from "dog" (4) and two from "cat" (5).
        assert_eq!(
            fuzzy(&fst, "dot", 2, 2),
            vec![("cat".to_string(), Some(2)), ("dog".to_string(), Some(1))]
        );
    }

    #[test]
    fn exact_prefix_restricts_edits() {
        let fst = sample();
        // Without the exact prefix, "cat" would be one substitution away.
        assert_eq!(fuzzy(&fst, "dat", 1, 1), vec![("cat".to_string(), Some(1))]);
        let got = fuzzy_complete(&fst, "dat", 2, 1, 10, &mut Interrupt::none()).unwrap();
        let names: Vec<&str> = got.matches.iter().map(Match::matched).collect();
        assert_eq!(names, vec!["dog"]);
    }
}
