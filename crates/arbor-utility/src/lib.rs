//! Built-in selection and composite scoring policies for arbor decision
//! graphs.
//!
//! Selection scores a set of qualifiers and picks one winner; tie-breaking
//! is stable by qualifier order for determinism. Composite scoring folds
//! child scorers under a small closed policy vocabulary.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod composite;
pub mod scorer;
pub mod select;

pub use composite::{CompositePolicy, CompositeScore};
pub use scorer::ContextualScorer;
pub use select::{FirstAboveDefault, HighestScoreWins};
