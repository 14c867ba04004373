//! Value types shared by the keydex crates.
//!
//! - [`matching`] -- the [`Match`] candidate returned by every query mode
//! - [`rank`] -- the total order used to rank candidates

pub mod matching;
pub mod rank;

pub use matching::{ATTR_DISTANCE, ATTR_WEIGHT, AttributeValue, Match};
pub use rank::rank_cmp;
