//! Ranked lookup, prefix completion and fuzzy completion over FST
//! dictionaries.
//!
//! ```
//! use keydex::{DictionaryIndex, FstBuilder};
//!
//! let image = FstBuilder::from_unsorted([("cat", 5), ("car", 3), ("can", 3), ("cart", 1)])?;
//! let index = DictionaryIndex::from_bytes(&image)?;
//!
//! let top: Vec<_> = index.complete("ca", 2)?.into_iter().map(|m| m.into_matched()).collect();
//! assert_eq!(top, ["cat", "car"]);
//!
//! let fuzzy = index.fuzzy_complete("cta", 1, 3)?;
//! assert_eq!(fuzzy[0].matched(), "cat");
//! assert_eq!(fuzzy[0].distance(), Some(1));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Architecture
//!
//! - [`index`] -- [`DictionaryIndex`], the entry point for queries
//! - [`search`] -- query modes, the prefix and fuzzy engines, the Top-K
//!   selector and cancellation
//! - [`error`] -- [`DictError`]

pub mod error;
pub mod index;
pub mod search;

pub use error::DictError;
pub use index::DictionaryIndex;
pub use keydex_core::{AttributeValue, Match};
pub use keydex_fst::{Arc, Fst, FstBuilder, FstError, StateId, Statistics, Traversal};
pub use search::{CancelToken, QueryMode, SearchOutcome, SearchRequest, TopK};
