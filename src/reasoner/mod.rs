//! The four reasoning tasks over a frozen knowledge base.
//!
//! [`Reasoner`] bundles the engines behind the task-level entry points the
//! original catalog application exposed: query answering, inconsistency
//! detection, subsumption/classification, and instance checking/retrieval.
//! Everything here is read-only and safe to share across threads.

mod consistency;
mod instances;
mod subsumption;

pub use consistency::{Conflict, ConflictKind, ConflictReport, ConsistencyChecker};
pub use instances::InstanceClassifier;
pub use subsumption::SubsumptionEngine;

use crate::error::{KgError, KgResult};
use crate::query::{Query, QueryEngine, QueryOutcome};
use crate::store::KnowledgeBase;
use std::sync::Arc;

/// Which consistency check to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsistencyMode {
    /// Do asserted individuals violate a disjointness axiom?
    Ontology,
    /// Is some class unsatisfiable by schema alone?
    Concept,
}

/// Facade over the reasoning engines, constructed from a frozen store.
#[derive(Debug)]
pub struct Reasoner {
    kb: Arc<KnowledgeBase>,
    subsumption: Arc<SubsumptionEngine>,
    classifier: Arc<InstanceClassifier>,
    consistency: ConsistencyChecker,
}

impl Reasoner {
    /// The store must already be frozen: the engines' write-once caches
    /// assume nothing mutates underneath them.
    pub fn new(kb: Arc<KnowledgeBase>) -> KgResult<Self> {
        if !kb.is_frozen() {
            return Err(KgError::FrozenStore {
                operation: "constructing a Reasoner over an unfrozen store",
            });
        }
        let subsumption = Arc::new(SubsumptionEngine::new(kb.clone()));
        let classifier = Arc::new(InstanceClassifier::new(kb.clone(), subsumption.clone()));
        let consistency =
            ConsistencyChecker::new(kb.clone(), subsumption.clone(), classifier.clone());
        Ok(Self {
            kb,
            subsumption,
            classifier,
            consistency,
        })
    }

    pub fn knowledge_base(&self) -> &Arc<KnowledgeBase> {
        &self.kb
    }

    pub fn subsumption(&self) -> &SubsumptionEngine {
        &self.subsumption
    }

    pub fn classifier(&self) -> &InstanceClassifier {
        &self.classifier
    }

    pub fn consistency(&self) -> &ConsistencyChecker {
        &self.consistency
    }

    /// Query answering: parse and evaluate a textual SELECT or ASK query.
    pub fn query(&self, text: &str) -> KgResult<QueryOutcome> {
        let query = Query::parse(text)?;
        Ok(QueryEngine::new(self.kb.graph()).run(&query))
    }

    /// Evaluate an already-built query.
    pub fn run(&self, query: &Query) -> QueryOutcome {
        QueryEngine::new(self.kb.graph()).run(query)
    }

    /// Consistency checking in the requested mode.
    pub fn detect_inconsistency(&self, mode: ConsistencyMode) -> KgResult<ConflictReport> {
        match mode {
            ConsistencyMode::Ontology => self.consistency.check_ontology(),
            ConsistencyMode::Concept => self.consistency.check_concepts(),
        }
    }

    /// TBox classification: every (sub, super) pair, direct and transitive.
    pub fn classify(&self) -> KgResult<Vec<(String, String)>> {
        self.subsumption.classify_all()
    }

    /// Concept subsumption: is every instance of `c` an instance of `d`?
    pub fn is_subsumed(&self, c: &str, d: &str) -> KgResult<bool> {
        self.subsumption.is_subsumed(c, d)
    }

    /// Instance checking: is `individual` an instance of `class`?
    pub fn instance_checking(&self, individual: &str, class: &str) -> KgResult<bool> {
        self.classifier.is_instance_of(individual, class)
    }

    /// Instance retrieval: all members of `class`, subclasses included.
    pub fn list_instances(&self, class: &str) -> KgResult<Vec<String>> {
        Ok(self.classifier.list_instances(class)?.as_ref().clone())
    }
}
