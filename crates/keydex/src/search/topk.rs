// Bounded best-of-K selection under the ranking order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use keydex_core::{Match, rank_cmp};

/// Heap entry ordered so that the worst-ranked match is the maximum.
struct Ranked(Match);

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        rank_cmp(&self.0, &other.0)
    }
}

/// Exact top-K selector.
///
/// Keeps at most `k` matches in a max-heap whose top is the worst admitted
/// match. A new match enters while there is room, or when it outranks the
/// worst one, which is evicted. The result never omits a match that ranks
/// better than one it keeps.
///
/// [`TopK::admits`] lets a producer ask whether anything with a given upper
/// bound on weight could still get in, so it can stop early.
pub struct TopK {
    k: usize,
    heap: BinaryHeap<Ranked>,
}

impl TopK {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            heap: BinaryHeap::with_capacity(k.min(1024)),
        }
    }

    /// Select the best `k` matches of a sequence.
    pub fn select(candidates: impl IntoIterator<Item = Match>, k: usize) -> Vec<Match> {
        let mut topk = Self::new(k);
        for candidate in candidates {
            topk.offer(candidate);
        }
        topk.into_sorted_vec()
    }

    /// Offer a candidate. Returns `true` if it was admitted.
    pub fn offer(&mut self, candidate: Match) -> bool {
        if self.k == 0 {
            return false;
        }
        if self.heap.len() < self.k {
            self.heap.push(Ranked(candidate));
            return true;
        }
        let better = self
            .heap
            .peek()
            .is_some_and(|worst| rank_cmp(&candidate, &worst.0) == Ordering::Less);
        if better {
            self.heap.pop();
            self.heap.push(Ranked(candidate));
        }
        better
    }

    /// Whether a candidate whose weight is at most `bound` could still be
    /// admitted.
    ///
    /// Weight is the primary ranking key, so once the heap is full nothing
    /// lighter than the worst admitted match can enter. A candidate of equal
    /// weight may still win on distance or string, so equality admits.
    pub fn admits(&self, bound: u64) -> bool {
        if self.k == 0 {
            return false;
        }
        if self.heap.len() < self.k {
            return true;
        }
        self.worst().is_none_or(|worst| bound >= worst.weight())
    }

    /// The worst admitted match.
    pub fn worst(&self) -> Option<&Match> {
        self.heap.peek().map(|r| &r.0)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.k
    }

    /// Admitted matches, best first.
    pub fn into_sorted_vec(self) -> Vec<Match> {
        // Ascending under `rank_cmp` is best first.
        self.heap.into_sorted_vec().into_iter().map(|r| r.0).collect()
    }
}
