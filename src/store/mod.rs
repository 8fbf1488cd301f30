//! The combined store: schema (TBox) plus graph (ABox) with one lifecycle.
//!
//! A [`KnowledgeBase`] is built during a single-threaded ingestion phase and
//! transitioned to read-only with [`KnowledgeBase::freeze`]. After the
//! freeze it can be shared behind an `Arc` across concurrent readers; every
//! mutator checks the frozen flag and fails with
//! [`crate::error::KgError::FrozenStore`].

mod graph;
mod schema;
mod snapshot;

pub use graph::GraphStore;
pub use schema::SchemaStore;
pub use snapshot::{ClassSnapshot, PropertySnapshot, Snapshot};

use crate::error::{KgError, KgResult};
use crate::model::{Term, Triple};
use crate::vocab;

/// Schema and graph under a shared ingest-then-freeze lifecycle.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    schema: SchemaStore,
    graph: GraphStore,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self {
            schema: SchemaStore::new(),
            graph: GraphStore::new(),
        }
    }

    pub fn schema(&self) -> &SchemaStore {
        &self.schema
    }

    pub fn graph(&self) -> &GraphStore {
        &self.graph
    }

    pub fn define_class(&mut self, id: &str) -> KgResult<()> {
        self.schema.define_class(id)?;
        Ok(())
    }

    pub fn define_subclass(&mut self, sub: &str, sup: &str) -> KgResult<()> {
        self.schema.define_subclass(sub, sup)
    }

    pub fn define_disjoint(&mut self, a: &str, b: &str) -> KgResult<()> {
        self.schema.define_disjoint(a, b)
    }

    pub fn define_property(
        &mut self,
        id: &str,
        domain: &str,
        range: &str,
        symmetric: bool,
    ) -> KgResult<()> {
        self.schema.define_property(id, domain, range, symmetric)?;
        Ok(())
    }

    /// Assert an individual under a declared class and materialize its
    /// `rdf:type` triple.
    pub fn assert_individual(&mut self, class: &str, id: &str) -> KgResult<()> {
        self.schema.get_class(class)?;
        self.graph.assert_individual(class, id)?;
        self.graph
            .assert_triple(Triple::new(id, vocab::RDF_TYPE, Term::iri(class)))?;
        Ok(())
    }

    /// Assert a triple. The predicate must be a declared property; symmetric
    /// predicates are mirrored when the object is an IRI.
    pub fn assert_triple(&mut self, subject: &str, predicate: &str, object: Term) -> KgResult<()> {
        let symmetric = match self.schema.get_property(predicate) {
            Ok(property) => property.symmetric,
            Err(_) => {
                return Err(KgError::schema(
                    predicate,
                    "triple predicate is not a declared property",
                ));
            }
        };
        if symmetric {
            if let Term::Iri(object_iri) = &object {
                if *object_iri != subject {
                    self.graph.assert_triple(Triple::new(
                        object_iri.clone(),
                        predicate,
                        Term::iri(subject),
                    ))?;
                }
            }
        }
        self.graph
            .assert_triple(Triple::new(subject, predicate, object))?;
        Ok(())
    }

    /// End the ingestion phase: materialize one `rdfs:subClassOf` triple per
    /// direct subclass edge, then mark schema and graph read-only.
    pub fn freeze(&mut self) -> KgResult<()> {
        if self.is_frozen() {
            return Err(KgError::FrozenStore {
                operation: "freeze of an already frozen store",
            });
        }
        let edges: Vec<(String, String)> = self
            .schema
            .classes()
            .flat_map(|class| {
                class
                    .supers
                    .iter()
                    .map(|sup| (class.id.clone(), sup.clone()))
            })
            .collect();
        for (sub, sup) in edges {
            self.graph
                .assert_triple(Triple::new(sub, vocab::RDFS_SUB_CLASS_OF, Term::iri(sup)))?;
        }
        self.schema.freeze();
        self.graph.freeze();
        Ok(())
    }

    pub fn is_frozen(&self) -> bool {
        self.schema.is_frozen() && self.graph.is_frozen()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_triple_predicate_must_be_declared() {
        let mut kb = KnowledgeBase::new();
        let err = kb
            .assert_triple("s", "undeclared", Term::iri("o"))
            .unwrap_err();
        assert_matches!(err, KgError::Schema { id, .. } if id == "undeclared");
    }

    #[test]
    fn test_symmetric_predicate_is_mirrored() {
        let mut kb = KnowledgeBase::new();
        kb.define_class("AttackPattern").unwrap();
        kb.define_property("relatedPattern", "AttackPattern", "AttackPattern", true)
            .unwrap();
        kb.assert_triple("p1", "relatedPattern", Term::iri("p2"))
            .unwrap();
        assert!(kb
            .graph()
            .contains(&Triple::new("p2", "relatedPattern", Term::iri("p1"))));
        assert_eq!(kb.graph().triple_count(), 2);
    }

    #[test]
    fn test_individual_materializes_type_triple() {
        let mut kb = KnowledgeBase::new();
        kb.define_class("Severity").unwrap();
        kb.assert_individual("Severity", "High").unwrap();
        assert!(kb
            .graph()
            .contains(&Triple::new("High", vocab::RDF_TYPE, Term::iri("Severity"))));
    }

    #[test]
    fn test_freeze_materializes_subclass_edges() {
        let mut kb = KnowledgeBase::new();
        kb.define_class("Attacker").unwrap();
        kb.define_class("Skill").unwrap();
        kb.define_subclass("Skill", "Attacker").unwrap();
        kb.freeze().unwrap();
        assert!(kb.graph().contains(&Triple::new(
            "Skill",
            vocab::RDFS_SUB_CLASS_OF,
            Term::iri("Attacker")
        )));
        assert!(kb.is_frozen());
        assert_matches!(kb.freeze(), Err(KgError::FrozenStore { .. }));
    }
}
