//! ABox store: asserted individuals and triples with single-term indices.

use crate::error::{EntityKind, KgError, KgResult};
use crate::model::{Individual, Term, Triple};
use ahash::AHashMap;
use indexmap::{IndexMap, IndexSet};

/// Owns the asserted individuals and the triple set.
///
/// The triple set has set semantics (duplicate assertion is a no-op) and is
/// indexed by subject, predicate, and object lexical value, maintained
/// incrementally during ingestion. Index values are positions into the
/// insertion-ordered triple set, so all lookups iterate in assertion order.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    triples: IndexSet<Triple>,
    by_subject: AHashMap<String, Vec<usize>>,
    by_predicate: AHashMap<String, Vec<usize>>,
    by_object: AHashMap<String, Vec<usize>>,
    individuals: IndexMap<String, Individual>,
    direct_instances: AHashMap<String, Vec<String>>,
    frozen: bool,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self, operation: &'static str) -> KgResult<()> {
        if self.frozen {
            Err(KgError::FrozenStore { operation })
        } else {
            Ok(())
        }
    }

    /// Create an individual under `class`, or return the existing one when
    /// the id was already asserted under the same class. Re-assertion under
    /// a different class is a conflict.
    pub fn assert_individual(&mut self, class: &str, id: &str) -> KgResult<&Individual> {
        self.guard("assert_individual after freeze")?;
        if let Some(existing) = self.individuals.get(id) {
            if existing.class != class {
                return Err(KgError::Conflict {
                    individual: id.to_string(),
                    existing: existing.class.clone(),
                    attempted: class.to_string(),
                });
            }
            return Ok(&self.individuals[id]);
        }
        self.individuals.insert(
            id.to_string(),
            Individual {
                id: id.to_string(),
                class: class.to_string(),
            },
        );
        self.direct_instances
            .entry(class.to_string())
            .or_default()
            .push(id.to_string());
        Ok(&self.individuals[id])
    }

    /// Add a triple. Returns `true` if it was new, `false` for a duplicate.
    pub fn assert_triple(&mut self, triple: Triple) -> KgResult<bool> {
        self.guard("assert_triple after freeze")?;
        let subject = triple.subject.clone();
        let predicate = triple.predicate.clone();
        let object_key = triple.object.as_str().to_string();
        let (position, inserted) = self.triples.insert_full(triple);
        if inserted {
            self.by_subject.entry(subject).or_default().push(position);
            self.by_predicate.entry(predicate).or_default().push(position);
            self.by_object.entry(object_key).or_default().push(position);
        }
        Ok(inserted)
    }

    fn indexed<'a>(&'a self, index: &AHashMap<String, Vec<usize>>, key: &str) -> Vec<&'a Triple> {
        index
            .get(key)
            .map(|positions| {
                positions
                    .iter()
                    .filter_map(|&p| self.triples.get_index(p))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn by_subject(&self, subject: &str) -> Vec<&Triple> {
        self.indexed(&self.by_subject, subject)
    }

    pub fn by_predicate(&self, predicate: &str) -> Vec<&Triple> {
        self.indexed(&self.by_predicate, predicate)
    }

    /// Triples whose object has the given lexical value (IRI or literal).
    pub fn by_object(&self, object: &str) -> Vec<&Triple> {
        self.indexed(&self.by_object, object)
    }

    pub fn triples(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    pub fn triple_count(&self) -> usize {
        self.triples.len()
    }

    pub fn individual(&self, id: &str) -> KgResult<&Individual> {
        self.individuals
            .get(id)
            .ok_or_else(|| KgError::not_found(EntityKind::Individual, id))
    }

    pub fn has_individual(&self, id: &str) -> bool {
        self.individuals.contains_key(id)
    }

    pub fn individuals(&self) -> impl Iterator<Item = &Individual> {
        self.individuals.values()
    }

    pub fn individual_count(&self) -> usize {
        self.individuals.len()
    }

    /// Ids of individuals asserted directly under `class`, in assertion
    /// order. Subclass instances are the classifier's concern.
    pub fn direct_instances(&self, class: &str) -> &[String] {
        self.direct_instances
            .get(class)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}
