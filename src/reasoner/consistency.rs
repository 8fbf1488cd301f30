//! Disjointness-based consistency checking.
//!
//! Two independent checks over a frozen store:
//!
//! - **Ontology consistency**: does any individual's effective type set
//!   contain both members of a declared disjoint pair? (An asserted fact
//!   makes the model inconsistent.)
//! - **Concept consistency**: does any class subsume two disjoint classes?
//!   Such a class can never have a valid instance, regardless of data.
//!
//! Both are pure functions of the store and safe to call repeatedly and
//! concurrently. Findings are returned as a [`ConflictReport`] value, not
//! as an error.

use super::instances::InstanceClassifier;
use super::subsumption::SubsumptionEngine;
use crate::error::KgResult;
use crate::store::KnowledgeBase;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// What a conflict violates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictKind {
    /// An individual is an instance of two disjoint classes.
    DisjointInstance,
    /// A class subsumes two disjoint classes and is unsatisfiable.
    UnsatisfiableClass,
}

/// A single consistency violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub kind: ConflictKind,
    /// The disjoint pair that was violated, in sorted order.
    pub class_a: String,
    pub class_b: String,
    /// The offending individual (ontology mode only).
    pub witness: Option<String>,
    /// The class that can have no instance (concept mode only).
    pub unsatisfiable: Option<String>,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ConflictKind::DisjointInstance => write!(
                f,
                "individual '{}' is an instance of disjoint classes '{}' and '{}'",
                self.witness.as_deref().unwrap_or("?"),
                self.class_a,
                self.class_b
            ),
            ConflictKind::UnsatisfiableClass => write!(
                f,
                "class '{}' subsumes disjoint classes '{}' and '{}' and can have no instance",
                self.unsatisfiable.as_deref().unwrap_or("?"),
                self.class_a,
                self.class_b
            ),
        }
    }
}

/// Outcome of a consistency check: consistent, or a list of conflicts in
/// deterministic order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReport {
    pub conflicts: Vec<Conflict>,
}

impl ConflictReport {
    pub fn is_consistent(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Human-readable lines for the presentation collaborator.
    pub fn summaries(&self) -> Vec<String> {
        if self.is_consistent() {
            vec!["the model is consistent".to_string()]
        } else {
            self.conflicts
                .iter()
                .map(|conflict| conflict.to_string())
                .collect()
        }
    }
}

/// Runs the two disjointness checks.
#[derive(Debug)]
pub struct ConsistencyChecker {
    kb: Arc<KnowledgeBase>,
    subsumption: Arc<SubsumptionEngine>,
    classifier: Arc<InstanceClassifier>,
}

impl ConsistencyChecker {
    pub fn new(
        kb: Arc<KnowledgeBase>,
        subsumption: Arc<SubsumptionEngine>,
        classifier: Arc<InstanceClassifier>,
    ) -> Self {
        Self {
            kb,
            subsumption,
            classifier,
        }
    }

    /// Ontology consistency: scan every individual's effective type set
    /// against every declared disjoint pair.
    pub fn check_ontology(&self) -> KgResult<ConflictReport> {
        let pairs = self.kb.schema().disjoint_pairs();
        let mut conflicts = Vec::new();
        if pairs.is_empty() {
            return Ok(ConflictReport { conflicts });
        }
        for individual in self.kb.graph().individuals() {
            let types = self.classifier.effective_types(&individual.id)?;
            for (a, b) in &pairs {
                if types.contains(a) && types.contains(b) {
                    conflicts.push(Conflict {
                        kind: ConflictKind::DisjointInstance,
                        class_a: a.clone(),
                        class_b: b.clone(),
                        witness: Some(individual.id.clone()),
                        unsatisfiable: None,
                    });
                }
            }
        }
        Ok(ConflictReport { conflicts })
    }

    /// Concept consistency: scan every class's closure against every
    /// declared disjoint pair, independent of asserted individuals.
    pub fn check_concepts(&self) -> KgResult<ConflictReport> {
        let pairs = self.kb.schema().disjoint_pairs();
        let mut conflicts = Vec::new();
        if pairs.is_empty() {
            return Ok(ConflictReport { conflicts });
        }
        for class in self.kb.schema().class_ids() {
            let mut closure: IndexSet<String> = IndexSet::new();
            closure.insert(class.clone());
            for ancestor in self.subsumption.ancestors(&class)?.iter() {
                closure.insert(ancestor.clone());
            }
            for (a, b) in &pairs {
                if closure.contains(a) && closure.contains(b) {
                    conflicts.push(Conflict {
                        kind: ConflictKind::UnsatisfiableClass,
                        class_a: a.clone(),
                        class_b: b.clone(),
                        witness: None,
                        unsatisfiable: Some(class.clone()),
                    });
                }
            }
        }
        Ok(ConflictReport { conflicts })
    }
}
