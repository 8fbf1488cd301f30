//! Conjunctive triple-pattern queries: typed patterns, a minimal text
//! parser, and a selectivity-ordered backtracking join evaluator.

mod engine;
mod pattern;

pub use engine::{QueryEngine, QueryOutcome, SelectResult};
pub use pattern::{PatternTerm, Query, QueryBuilder, QueryForm, TriplePattern};
