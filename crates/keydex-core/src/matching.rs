// Match candidate: a matched key with its weight and optional edit distance.

use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Attribute names
// ---------------------------------------------------------------------------

pub const ATTR_WEIGHT: &str = "weight";
pub const ATTR_DISTANCE: &str = "distance";

/// A named attribute value attached to a [`Match`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Int(u64),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Int(v) => write!(f, "{v}"),
        }
    }
}

/// A single result of a lookup, prefix completion or fuzzy completion.
///
/// The weight is the sum of all output fragments collected along the path
/// through the transducer plus the final output of the accepting state.
/// `distance` is only set by fuzzy completion; it is the edit distance
/// between the query and the closest prefix of `matched`.
///
/// Matches are immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Match {
    matched: String,
    weight: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    distance: Option<u32>,
}

impl Match {
    /// Create a match produced by an exact lookup or a prefix completion.
    pub fn new(matched: impl Into<String>, weight: u64) -> Self {
        Self {
            matched: matched.into(),
            weight,
            distance: None,
        }
    }

    /// Create a match produced by fuzzy completion.
    pub fn with_distance(matched: impl Into<String>, weight: u64, distance: u32) -> Self {
        Self {
            matched: matched.into(),
            weight,
            distance: Some(distance),
        }
    }

    pub fn matched(&self) -> &str {
        &self.matched
    }

    pub fn weight(&self) -> u64 {
        self.weight
    }

    /// Edit distance, present for fuzzy matches only.
    pub fn distance(&self) -> Option<u32> {
        self.distance
    }

    /// Distance used for ranking: exact and prefix matches count as 0.
    pub fn rank_distance(&self) -> u32 {
        self.distance.unwrap_or(0)
    }

    /// Look up a named attribute (`"weight"`, `"distance"`).
    ///
    /// Returns `None` for unknown names and for `"distance"` on non-fuzzy
    /// matches.
    pub fn attribute(&self, name: &str) -> Option<AttributeValue> {
        match name {
            ATTR_WEIGHT => Some(AttributeValue::Int(self.weight)),
            ATTR_DISTANCE => self.distance.map(|d| AttributeValue::Int(d as u64)),
            _ => None,
        }
    }

    /// Names of the attributes this match carries.
    pub fn attribute_names(&self) -> Vec<&'static str> {
        let mut names = vec![ATTR_WEIGHT];
        if self.distance.is_some() {
            names.push(ATTR_DISTANCE);
        }
        names
    }

    /// Score as a float, for consumers that blend dictionary weight with
    /// other signals.
    pub fn score(&self) -> f64 {
        self.weight as f64
    }

    /// The stored value rendered as a string.
    pub fn value_as_string(&self) -> String {
        self.weight.to_string()
    }

    /// Number of characters in the matched string.
    pub fn char_len(&self) -> usize {
        self.matched.chars().count()
    }

    pub fn into_matched(self) -> String {
        self.matched
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.distance {
            Some(d) => write!(f, "{}\t{}\t{}", self.matched, self.weight, d),
            None => write!(f, "{}\t{}", self.matched, self.weight),
        }
    }
}
