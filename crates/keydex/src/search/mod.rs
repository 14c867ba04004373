// Query descriptions and dispatch to the prefix and fuzzy engines.

pub mod cancel;
mod enumerate;
mod frontier;
mod fuzzy;
mod prefix;
pub mod topk;

use std::time::{Duration, Instant};

use keydex_core::Match;
use keydex_fst::Traversal;

use crate::error::DictError;

pub use cancel::CancelToken;
pub use topk::TopK;

use cancel::Interrupt;

/// Result count used when a request does not set one.
pub const DEFAULT_LIMIT: usize = 10;

/// What kind of matching a query performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// The query must be a key.
    Exact,
    /// Keys starting with the query.
    Prefix,
    /// Keys with a prefix within `max_edit_distance` edits of the query.
    /// The first `exact_prefix` query characters must match exactly.
    Fuzzy {
        max_edit_distance: i32,
        exact_prefix: usize,
    },
}

impl QueryMode {
    pub fn name(&self) -> &'static str {
        match self {
            QueryMode::Exact => "exact",
            QueryMode::Prefix => "prefix",
            QueryMode::Fuzzy { .. } => "fuzzy",
        }
    }
}

/// A fully described query.
///
/// ```
/// use keydex::{CancelToken, SearchRequest};
/// use std::time::Duration;
///
/// let token = CancelToken::new();
/// let request = SearchRequest::fuzzy("helo", 1)
///     .with_limit(5)
///     .with_cancel(token.clone())
///     .with_timeout(Duration::from_millis(20));
/// assert_eq!(request.limit, 5);
/// ```
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub mode: QueryMode,
    pub limit: usize,
    pub cancel: Option<CancelToken>,
    pub deadline: Option<Instant>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, mode: QueryMode) -> Self {
        Self {
            query: query.into(),
            mode,
            limit: DEFAULT_LIMIT,
            cancel: None,
            deadline: None,
        }
    }

    pub fn exact(query: impl Into<String>) -> Self {
        Self::new(query, QueryMode::Exact)
    }

    pub fn prefix(query: impl Into<String>) -> Self {
        Self::new(query, QueryMode::Prefix)
    }

    pub fn fuzzy(query: impl Into<String>, max_edit_distance: i32) -> Self {
        Self::new(
            query,
            QueryMode::Fuzzy {
                max_edit_distance,
                exact_prefix: 0,
            },
        )
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Require the first `n` query characters to match without edits.
    /// Has no effect outside fuzzy mode.
    pub fn with_exact_prefix(mut self, n: usize) -> Self {
        if let QueryMode::Fuzzy { exact_prefix, .. } = &mut self.mode {
            *exact_prefix = n;
        }
        self
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }
}

/// Matches of one query, best first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    pub matches: Vec<Match>,
    /// Set when cancellation or the deadline stopped the search early.
    /// `matches` then holds the best results found up to that point.
    pub truncated: bool,
    /// Number of search nodes expanded.
    pub expansions: u64,
}

/// A request whose parameters have been checked.
enum Plan {
    Exact,
    Prefix,
    Fuzzy { max_distance: u32, exact_prefix: usize },
}

impl Plan {
    fn of(mode: QueryMode) -> Result<Self, DictError> {
        Ok(match mode {
            QueryMode::Exact => Plan::Exact,
            QueryMode::Prefix => Plan::Prefix,
            QueryMode::Fuzzy {
                max_edit_distance,
                exact_prefix,
            } => Plan::Fuzzy {
                max_distance: u32::try_from(max_edit_distance).map_err(|_| {
                    DictError::InvalidParameter(format!(
                        "max_edit_distance must be non-negative, got {max_edit_distance}"
                    ))
                })?,
                exact_prefix,
            },
        })
    }
}

/// Validate and execute `request` against `traversal`.
pub(crate) fn run<T: Traversal>(
    traversal: &T,
    request: &SearchRequest,
) -> Result<SearchOutcome, DictError> {
    let plan = Plan::of(request.mode)?;
    if request.limit == 0 {
        return Ok(SearchOutcome::default());
    }

    let mut interrupt = Interrupt::new(request.cancel.as_ref(), request.deadline);
    let outcome = match plan {
        Plan::Exact if interrupt.should_stop() => SearchOutcome {
            truncated: true,
            ..SearchOutcome::default()
        },
        Plan::Exact => SearchOutcome {
            matches: prefix::lookup(traversal, &request.query)?
                .into_iter()
                .collect(),
            truncated: false,
            expansions: 1,
        },
        Plan::Prefix => {
            prefix::complete(traversal, &request.query, request.limit, &mut interrupt)?
        }
        Plan::Fuzzy {
            max_distance,
            exact_prefix,
        } => fuzzy::fuzzy_complete(
            traversal,
            &request.query,
            max_distance,
            exact_prefix,
            request.limit,
            &mut interrupt,
        )?,
    };
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keydex_fst::{Fst, FstBuilder};

    fn sample() -> Fst {
        let data =
            FstBuilder::from_unsorted([("cat", 5), ("car", 3), ("can", 3), ("cart", 1)]).unwrap();
        Fst::from_bytes(&data).unwrap()
    }

    #[test]
    fn negative_distance_is_rejected() {
        let fst = sample();
        let err = run(&fst, &SearchRequest::fuzzy("cat", -1)).unwrap_err();
        assert!(matches!(err, DictError::InvalidParameter(_)));
    }

    #[test]
    fn negative_distance_is_rejected_even_with_zero_limit() {
        let fst = sample();
        let request = SearchRequest::fuzzy("cat", -3).with_limit(0);
        assert!(matches!(
            run(&fst, &request),
            Err(DictError::InvalidParameter(_))
        ));
    }

    #[test]
    fn zero_limit_is_empty() {
        let fst = sample();
        let out = run(&fst, &SearchRequest::prefix("ca").with_limit(0)).unwrap();
        assert_eq!(out, SearchOutcome::default());
    }

    #[test]
    fn exact_mode_returns_at_most_one() {
        let fst = sample();
        let out = run(&fst, &SearchRequest::exact("car")).unwrap();
        assert_eq!(out.matches, vec![Match::new("car", 3)]);
        let out = run(&fst, &SearchRequest::exact("ca")).unwrap();
        assert!(out.matches.is_empty());
    }

    #[test]
    fn request_builders() {
        let request = SearchRequest::fuzzy("ca", 2).with_exact_prefix(1).with_limit(3);
        assert_eq!(
            request.mode,
            QueryMode::Fuzzy {
                max_edit_distance: 2,
                exact_prefix: 1
            }
        );
        assert_eq!(request.mode.name(), "fuzzy");
        assert_eq!(request.limit, 3);

        let request = SearchRequest::prefix("ca").with_exact_prefix(1);
        assert_eq!(request.mode, QueryMode::Prefix);
        assert_eq!(request.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn cancelled_request_is_truncated() {
        let fst = sample();
        let token = CancelToken::new();
        token.cancel();
        for request in [
            SearchRequest::exact("cat"),
            SearchRequest::prefix("ca"),
            SearchRequest::fuzzy("ca", 1),
        ] {
            let out = run(&fst, &request.with_cancel(token.clone())).unwrap();
            assert!(out.truncated);
            assert!(out.matches.is_empty());
        }
    }
}
