//! Core data model: terms, triples, and the schema/assertion entities.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A node in the graph: an IRI or a plain literal.
///
/// Subjects and predicates are always IRIs; only triple objects may be
/// literals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    Iri(String),
    Literal(String),
}

impl Term {
    pub fn iri(value: impl Into<String>) -> Self {
        Term::Iri(value.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal(value.into())
    }

    /// Lexical value, without distinguishing IRIs from literals.
    pub fn as_str(&self) -> &str {
        match self {
            Term::Iri(v) | Term::Literal(v) => v,
        }
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(v) => write!(f, "<{v}>"),
            Term::Literal(v) => write!(f, "\"{v}\""),
        }
    }
}

/// An asserted (subject, predicate, object) statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: impl Into<String>, predicate: impl Into<String>, object: Term) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object,
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}> <{}> {}", self.subject, self.predicate, self.object)
    }
}

/// A declared class: direct superclasses and declared disjoint partners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub id: String,
    pub supers: IndexSet<String>,
    pub disjoint: IndexSet<String>,
}

impl Class {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            supers: IndexSet::new(),
            disjoint: IndexSet::new(),
        }
    }
}

/// A declared property. Domain and range are absent only for the built-in
/// vocabulary predicates; every user-declared property carries both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub domain: Option<String>,
    pub range: Option<String>,
    pub symmetric: bool,
}

/// An asserted individual and the class it was created under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Individual {
    pub id: String,
    pub class: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_display() {
        assert_eq!(Term::iri("capec#High").to_string(), "<capec#High>");
        assert_eq!(Term::literal("High").to_string(), "\"High\"");
    }

    #[test]
    fn test_triple_equality_is_structural() {
        let a = Triple::new("s", "p", Term::iri("o"));
        let b = Triple::new("s", "p", Term::iri("o"));
        let c = Triple::new("s", "p", Term::literal("o"));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
