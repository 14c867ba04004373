// Ranking order shared by every query mode.

use std::cmp::Ordering;

use crate::matching::Match;

/// Compare two matches by rank. `Ordering::Less` means `a` ranks better.
///
/// Keys, in order:
/// 1. weight, descending
/// 2. edit distance, ascending (non-fuzzy matches count as 0)
/// 3. length in characters, ascending
/// 4. string, reverse lexicographic
///
/// This is a total order: two matches compare equal only when weight,
/// distance and string are all equal.
pub fn rank_cmp(a: &Match, b: &Match) -> Ordering {
    b.weight()
        .cmp(&a.weight())
        .then_with(|| a.rank_distance().cmp(&b.rank_distance()))
        .then_with(|| a.char_len().cmp(&b.char_len()))
        .then_with(|| b.matched().cmp(a.matched()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut v: Vec<Match>) -> Vec<String> {
        v.sort_by(rank_cmp);
        v.into_iter().map(Match::into_matched).collect()
    }

    #[test]
    fn heavier_first() {
        let v = vec![Match::new("car", 3), Match::new("cat", 5)];
        assert_eq!(sorted(v), vec!["cat", "car"]);
    }

    #[test]
    fn closer_first_on_equal_weight() {
        let v = vec![
            Match::with_distance("cab", 3, 1),
            Match::with_distance("cat", 3, 0),
        ];
        assert_eq!(sorted(v), vec!["cat", "cab"]);
    }

    #[test]
    fn weight_beats_distance() {
        let v = vec![
            Match::with_distance("cat", 3, 0),
            Match::with_distance("cab", 9, 1),
        ];
        assert_eq!(sorted(v), vec!["cab", "cat"]);
    }

    #[test]
    fn shorter_first_then_reverse_lexicographic() {
        let v = vec![
            Match::new("cart", 3),
            Match::new("can", 3),
            Match::new("car", 3),
        ];
        assert_eq!(sorted(v), vec!["car", "can", "cart"]);
    }

    #[test]
    fn equal_only_when_identical() {
        let a = Match::with_distance("cat", 3, 1);
        let b = Match::with_distance("cat", 3, 1);
        assert_eq!(rank_cmp(&a, &b), Ordering::Equal);
        let c = Match::with_distance("cat", 3, 2);
        assert_eq!(rank_cmp(&a, &c), Ordering::Less);
    }
}
