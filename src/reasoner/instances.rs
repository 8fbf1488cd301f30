//! Instance checking and retrieval: effective type sets and per-class
//! instance listings.

use super::subsumption::SubsumptionEngine;
use crate::error::KgResult;
use crate::query::{PatternTerm, Query, QueryEngine};
use crate::store::KnowledgeBase;
use crate::vocab;
use ahash::AHashMap;
use indexmap::IndexSet;
use parking_lot::RwLock;
use std::sync::Arc;

/// Computes the effective types of individuals and answers retrieval.
///
/// The closure of a class (itself plus its ancestors) is memoized per class;
/// it is identical for every individual created under that class. Instance
/// listings are computed lazily and cached per class. Both caches are
/// write-once after the store freeze.
#[derive(Debug)]
pub struct InstanceClassifier {
    kb: Arc<KnowledgeBase>,
    subsumption: Arc<SubsumptionEngine>,
    closures: RwLock<AHashMap<String, Arc<IndexSet<String>>>>,
    instances: RwLock<AHashMap<String, Arc<Vec<String>>>>,
}

impl InstanceClassifier {
    pub fn new(kb: Arc<KnowledgeBase>, subsumption: Arc<SubsumptionEngine>) -> Self {
        Self {
            kb,
            subsumption,
            closures: RwLock::new(AHashMap::new()),
            instances: RwLock::new(AHashMap::new()),
        }
    }

    /// `{class}` plus its ancestor closure.
    fn class_closure(&self, class: &str) -> KgResult<Arc<IndexSet<String>>> {
        if let Some(hit) = self.closures.read().get(class) {
            return Ok(hit.clone());
        }
        let mut closure = IndexSet::new();
        closure.insert(class.to_string());
        for ancestor in self.subsumption.ancestors(class)?.iter() {
            closure.insert(ancestor.clone());
        }
        let closure = Arc::new(closure);
        self.closures
            .write()
            .insert(class.to_string(), closure.clone());
        Ok(closure)
    }

    /// Effective type set of an individual: its direct class, every class
    /// asserted through an explicit `rdf:type` triple, and all of their
    /// ancestors. Unknown individuals and undeclared type references fail
    /// with `NotFound` rather than being silently skipped.
    pub fn effective_types(&self, individual: &str) -> KgResult<IndexSet<String>> {
        let direct = self.kb.graph().individual(individual)?.class.clone();
        let mut types = self.class_closure(&direct)?.as_ref().clone();

        // extra asserted types, gathered through the query engine
        let asserted = Query::select(["t"])
            .pattern(
                PatternTerm::iri(individual),
                PatternTerm::iri(vocab::RDF_TYPE),
                PatternTerm::var("t"),
            )
            .build()?;
        if let crate::query::QueryOutcome::Rows(result) =
            QueryEngine::new(self.kb.graph()).run(&asserted)
        {
            for row in result.rows {
                for term in row {
                    let class = term.as_str();
                    if !types.contains(class) {
                        for member in self.class_closure(class)?.iter() {
                            types.insert(member.clone());
                        }
                    }
                }
            }
        }
        Ok(types)
    }

    /// True iff `class` is in the effective type set of `individual`.
    pub fn is_instance_of(&self, individual: &str, class: &str) -> KgResult<bool> {
        self.kb.schema().get_class(class)?;
        self.kb.graph().individual(individual)?;
        Ok(self.effective_types(individual)?.contains(class))
    }

    /// All individuals whose direct class is `class` or any of its
    /// transitive subclasses, in deterministic order.
    pub fn list_instances(&self, class: &str) -> KgResult<Arc<Vec<String>>> {
        self.kb.schema().get_class(class)?;
        if let Some(hit) = self.instances.read().get(class) {
            return Ok(hit.clone());
        }
        let mut out: Vec<String> = Vec::new();
        for candidate in self.kb.schema().class_ids() {
            let matches =
                candidate == class || self.subsumption.ancestors(&candidate)?.contains(class);
            if matches {
                out.extend(
                    self.kb
                        .graph()
                        .direct_instances(&candidate)
                        .iter()
                        .cloned(),
                );
            }
        }
        let out = Arc::new(out);
        self.instances
            .write()
            .insert(class.to_string(), out.clone());
        Ok(out)
    }
}
