//! Error taxonomy for the knowledge-graph engine.
//!
//! Every variant carries the offending identifier or pattern text so a
//! failure can be traced back to the schema element or query that caused it.
//! Consistency findings are deliberately *not* errors: they are returned as
//! [`crate::reasoner::ConflictReport`] values.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The kind of entity a direct lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Class,
    Property,
    Individual,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Class => write!(f, "class"),
            EntityKind::Property => write!(f, "property"),
            EntityKind::Individual => write!(f, "individual"),
        }
    }
}

/// Errors raised by the stores, the reasoning engines, and the query layer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KgError {
    /// Reference to an undeclared class or property, or a malformed
    /// schema declaration (e.g. a class declared disjoint with itself).
    #[error("schema violation for '{id}': {detail}")]
    Schema { id: String, detail: String },

    /// A subclass cycle was hit while computing an ancestor closure.
    #[error("subclass cycle detected at '{class}'")]
    Cycle { class: String },

    /// An individual was re-asserted under a different class.
    #[error(
        "individual '{individual}' already asserted under '{existing}', cannot re-assert under '{attempted}'"
    )]
    Conflict {
        individual: String,
        existing: String,
        attempted: String,
    },

    /// The ingest-then-freeze lifecycle was violated.
    #[error("frozen-store contract violated by {operation}")]
    FrozenStore { operation: &'static str },

    /// Malformed query text, rejected at parse time.
    #[error("query syntax error: {detail} in '{query}'")]
    QuerySyntax { detail: String, query: String },

    /// Direct lookup of an unknown class, property, or individual.
    #[error("{kind} not found: '{id}'")]
    NotFound { kind: EntityKind, id: String },
}

impl KgError {
    pub fn schema(id: impl Into<String>, detail: impl Into<String>) -> Self {
        KgError::Schema {
            id: id.into(),
            detail: detail.into(),
        }
    }

    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        KgError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Error category for log fields and metrics.
    pub fn category(&self) -> &'static str {
        match self {
            KgError::Schema { .. } => "schema_error",
            KgError::Cycle { .. } => "cycle_error",
            KgError::Conflict { .. } => "conflict_error",
            KgError::FrozenStore { .. } => "lifecycle_error",
            KgError::QuerySyntax { .. } => "query_syntax_error",
            KgError::NotFound { .. } => "not_found",
        }
    }
}

pub type KgResult<T> = Result<T, KgError>;
