//! TBox store: class and property declarations, subclass edges, disjointness.

use crate::error::{EntityKind, KgError, KgResult};
use crate::model::{Class, Property};
use crate::vocab;
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// Owns every schema declaration. Built once during ingestion, immutable
/// after [`SchemaStore::freeze`].
///
/// Subclass edges are recorded without an eager cycle check; a cycle is a
/// schema error that surfaces as [`KgError::Cycle`] at the first ancestor
/// closure that walks it. This keeps ingestion a single linear pass.
#[derive(Debug, Clone)]
pub struct SchemaStore {
    classes: IndexMap<String, Class>,
    properties: IndexMap<String, Property>,
    frozen: bool,
}

impl Default for SchemaStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaStore {
    /// Empty schema with the built-in vocabulary predicates pre-registered.
    pub fn new() -> Self {
        let mut properties = IndexMap::new();
        for builtin in [vocab::RDF_TYPE, vocab::RDFS_SUB_CLASS_OF] {
            properties.insert(
                builtin.to_string(),
                Property {
                    id: builtin.to_string(),
                    domain: None,
                    range: None,
                    symmetric: false,
                },
            );
        }
        Self {
            classes: IndexMap::new(),
            properties,
            frozen: false,
        }
    }

    fn guard(&self, operation: &'static str) -> KgResult<()> {
        if self.frozen {
            Err(KgError::FrozenStore { operation })
        } else {
            Ok(())
        }
    }

    /// Create a class, or return the existing declaration. Idempotent.
    pub fn define_class(&mut self, id: &str) -> KgResult<&Class> {
        self.guard("define_class after freeze")?;
        self.classes
            .entry(id.to_string())
            .or_insert_with(|| Class::new(id));
        Ok(&self.classes[id])
    }

    /// Record a direct subclass edge `sub -> sup`. Both ends must already be
    /// declared; there is no implicit creation.
    pub fn define_subclass(&mut self, sub: &str, sup: &str) -> KgResult<()> {
        self.guard("define_subclass after freeze")?;
        if !self.classes.contains_key(sup) {
            return Err(KgError::schema(sup, "undeclared superclass"));
        }
        let class = self
            .classes
            .get_mut(sub)
            .ok_or_else(|| KgError::schema(sub, "undeclared subclass"))?;
        class.supers.insert(sup.to_string());
        Ok(())
    }

    /// Declare `a` and `b` disjoint. Symmetric: the pair is recorded on both
    /// sides. Irreflexive: a class is never disjoint with itself.
    pub fn define_disjoint(&mut self, a: &str, b: &str) -> KgResult<()> {
        self.guard("define_disjoint after freeze")?;
        if a == b {
            return Err(KgError::schema(a, "class cannot be disjoint with itself"));
        }
        if !self.classes.contains_key(a) {
            return Err(KgError::schema(a, "undeclared class in disjointness axiom"));
        }
        if !self.classes.contains_key(b) {
            return Err(KgError::schema(b, "undeclared class in disjointness axiom"));
        }
        self.classes[a].disjoint.insert(b.to_string());
        self.classes[b].disjoint.insert(a.to_string());
        Ok(())
    }

    /// Register a property. Domain and range must be declared classes.
    /// Re-registering an existing id returns the original declaration.
    pub fn define_property(
        &mut self,
        id: &str,
        domain: &str,
        range: &str,
        symmetric: bool,
    ) -> KgResult<&Property> {
        self.guard("define_property after freeze")?;
        if !self.classes.contains_key(domain) {
            return Err(KgError::schema(domain, "undeclared domain class"));
        }
        if !self.classes.contains_key(range) {
            return Err(KgError::schema(range, "undeclared range class"));
        }
        self.properties.entry(id.to_string()).or_insert(Property {
            id: id.to_string(),
            domain: Some(domain.to_string()),
            range: Some(range.to_string()),
            symmetric,
        });
        Ok(&self.properties[id])
    }

    pub fn get_class(&self, id: &str) -> KgResult<&Class> {
        self.classes
            .get(id)
            .ok_or_else(|| KgError::not_found(EntityKind::Class, id))
    }

    pub fn get_property(&self, id: &str) -> KgResult<&Property> {
        self.properties
            .get(id)
            .ok_or_else(|| KgError::not_found(EntityKind::Property, id))
    }

    pub fn has_class(&self, id: &str) -> bool {
        self.classes.contains_key(id)
    }

    pub fn classes(&self) -> impl Iterator<Item = &Class> {
        self.classes.values()
    }

    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.values()
    }

    /// All declared class ids, sorted for reproducible traversal.
    pub fn class_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.classes.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Every declared disjoint pair exactly once, as (min, max) by id,
    /// sorted. Deterministic input for the consistency checks.
    pub fn disjoint_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = BTreeSet::new();
        for class in self.classes.values() {
            for other in &class.disjoint {
                let pair = if class.id < *other {
                    (class.id.clone(), other.clone())
                } else {
                    (other.clone(), class.id.clone())
                };
                pairs.insert(pair);
            }
        }
        pairs.into_iter().collect()
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_define_class_is_idempotent() {
        let mut schema = SchemaStore::new();
        schema.define_class("A").unwrap();
        schema.define_class("A").unwrap();
        assert_eq!(schema.classes().filter(|c| c.id == "A").count(), 1);
    }

    #[test]
    fn test_subclass_requires_declared_classes() {
        let mut schema = SchemaStore::new();
        schema.define_class("A").unwrap();
        assert_matches!(
            schema.define_subclass("A", "Missing"),
            Err(KgError::Schema { .. })
        );
        assert_matches!(
            schema.define_subclass("Missing", "A"),
            Err(KgError::Schema { .. })
        );
    }

    #[test]
    fn test_disjointness_is_symmetric_and_irreflexive() {
        let mut schema = SchemaStore::new();
        schema.define_class("A").unwrap();
        schema.define_class("B").unwrap();
        schema.define_disjoint("A", "B").unwrap();
        assert!(schema.get_class("A").unwrap().disjoint.contains("B"));
        assert!(schema.get_class("B").unwrap().disjoint.contains("A"));
        assert_matches!(schema.define_disjoint("A", "A"), Err(KgError::Schema { .. }));
        // one pair, declared from either side
        assert_eq!(schema.disjoint_pairs(), vec![("A".into(), "B".into())]);

        schema.define_class("C").unwrap();
        schema.define_disjoint("C", "A").unwrap();
        // normalized to (min, max), sorted, each pair once
        assert_eq!(
            schema.disjoint_pairs(),
            vec![("A".into(), "B".into()), ("A".into(), "C".into())]
        );
    }

    #[test]
    fn test_lookup_does_not_create() {
        let schema = SchemaStore::new();
        assert_matches!(
            schema.get_class("Ghost"),
            Err(KgError::NotFound {
                kind: EntityKind::Class,
                ..
            })
        );
        assert_matches!(
            schema.get_property("ghostProp"),
            Err(KgError::NotFound {
                kind: EntityKind::Property,
                ..
            })
        );
    }

    #[test]
    fn test_builtins_are_registered() {
        let schema = SchemaStore::new();
        assert!(schema.get_property(vocab::RDF_TYPE).is_ok());
        assert!(schema.get_property(vocab::RDFS_SUB_CLASS_OF).is_ok());
    }

    #[test]
    fn test_frozen_schema_rejects_mutation() {
        let mut schema = SchemaStore::new();
        schema.define_class("A").unwrap();
        schema.freeze();
        assert_matches!(
            schema.define_class("B"),
            Err(KgError::FrozenStore { .. })
        );
        assert_matches!(
            schema.define_subclass("A", "A"),
            Err(KgError::FrozenStore { .. })
        );
    }
}
