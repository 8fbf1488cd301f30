//! Plain-data snapshot of the combined store.
//!
//! The persistence collaborator serializes these however it likes (RDF/XML,
//! JSON, ...); the engine only guarantees that an exported snapshot imported
//! back through the normal declaration path reproduces the same store.

use super::KnowledgeBase;
use crate::error::KgResult;
use crate::model::{Individual, Triple};
use crate::vocab;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSnapshot {
    pub id: String,
    pub supers: Vec<String>,
    pub disjoint: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySnapshot {
    pub id: String,
    pub domain: Option<String>,
    pub range: Option<String>,
    pub symmetric: bool,
}

/// Everything declared and asserted, as plain data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub classes: Vec<ClassSnapshot>,
    pub properties: Vec<PropertySnapshot>,
    pub individuals: Vec<Individual>,
    pub triples: Vec<Triple>,
}

impl KnowledgeBase {
    /// Export the full store contents. Built-in vocabulary predicates are
    /// omitted; [`KnowledgeBase::new`] re-registers them on import.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            classes: self
                .schema
                .classes()
                .map(|class| ClassSnapshot {
                    id: class.id.clone(),
                    supers: class.supers.iter().cloned().collect(),
                    disjoint: class.disjoint.iter().cloned().collect(),
                })
                .collect(),
            properties: self
                .schema
                .properties()
                .filter(|property| !vocab::is_builtin_property(&property.id))
                .map(|property| PropertySnapshot {
                    id: property.id.clone(),
                    domain: property.domain.clone(),
                    range: property.range.clone(),
                    symmetric: property.symmetric,
                })
                .collect(),
            individuals: self.graph.individuals().cloned().collect(),
            triples: self.graph.triples().cloned().collect(),
        }
    }

    /// Rebuild an unfrozen store from a snapshot through the normal
    /// declaration path, so every invariant is re-validated. The caller
    /// freezes when done.
    pub fn from_snapshot(snapshot: &Snapshot) -> KgResult<Self> {
        let mut kb = KnowledgeBase::new();
        for class in &snapshot.classes {
            kb.define_class(&class.id)?;
        }
        for class in &snapshot.classes {
            for sup in &class.supers {
                kb.define_subclass(&class.id, sup)?;
            }
            for other in &class.disjoint {
                kb.define_disjoint(&class.id, other)?;
            }
        }
        for property in &snapshot.properties {
            if let (Some(domain), Some(range)) = (&property.domain, &property.range) {
                kb.define_property(&property.id, domain, range, property.symmetric)?;
            }
        }
        for individual in &snapshot.individuals {
            kb.assert_individual(&individual.class, &individual.id)?;
        }
        for triple in &snapshot.triples {
            kb.assert_triple(&triple.subject, &triple.predicate, triple.object.clone())?;
        }
        Ok(kb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Term;

    #[test]
    fn test_snapshot_round_trip_preserves_contents() {
        let mut kb = KnowledgeBase::new();
        kb.define_class("Attacker").unwrap();
        kb.define_class("Skill").unwrap();
        kb.define_class("Status").unwrap();
        kb.define_class("Abstraction").unwrap();
        kb.define_subclass("Skill", "Attacker").unwrap();
        kb.define_disjoint("Status", "Abstraction").unwrap();
        kb.define_property("needs", "Attacker", "Skill", false).unwrap();
        kb.assert_individual("Skill", "sql-injection").unwrap();
        kb.assert_triple("attacker0", "needs", Term::iri("sql-injection"))
            .unwrap();

        let snapshot = kb.snapshot();
        let rebuilt = KnowledgeBase::from_snapshot(&snapshot).unwrap();
        assert!(!rebuilt.is_frozen());
        assert_eq!(rebuilt.snapshot(), snapshot);
    }

    #[test]
    fn test_snapshot_is_serializable() {
        let mut kb = KnowledgeBase::new();
        kb.define_class("Severity").unwrap();
        kb.assert_individual("Severity", "High").unwrap();
        let json = serde_json::to_string(&kb.snapshot()).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, kb.snapshot());
    }
}
