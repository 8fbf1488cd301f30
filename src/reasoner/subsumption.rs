//! Subsumption over the subclass graph: memoized ancestor closures,
//! pairwise subsumption checks, and full TBox classification.

use crate::error::{KgError, KgResult};
use crate::store::KnowledgeBase;
use ahash::AHashMap;
use indexmap::IndexSet;
use parking_lot::RwLock;
use std::sync::Arc;

/// Computes transitive superclass closures by depth-first traversal.
///
/// Closures are memoized per class. The cache is write-once: after the
/// store freeze nothing can invalidate it, so recomputation is at worst
/// redundant, never wrong, and concurrent readers need no coordination
/// beyond the `RwLock`.
#[derive(Debug)]
pub struct SubsumptionEngine {
    kb: Arc<KnowledgeBase>,
    ancestors: RwLock<AHashMap<String, Arc<IndexSet<String>>>>,
}

impl SubsumptionEngine {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self {
            kb,
            ancestors: RwLock::new(AHashMap::new()),
        }
    }

    /// Transitive closure of the superclass relation for `class`.
    ///
    /// A subclass cycle is detected here, lazily: revisiting a class that is
    /// still on the traversal path raises [`KgError::Cycle`].
    pub fn ancestors(&self, class: &str) -> KgResult<Arc<IndexSet<String>>> {
        let mut path = IndexSet::new();
        self.walk(class, &mut path)
    }

    fn walk(&self, class: &str, path: &mut IndexSet<String>) -> KgResult<Arc<IndexSet<String>>> {
        if let Some(hit) = self.ancestors.read().get(class) {
            return Ok(hit.clone());
        }
        if !path.insert(class.to_string()) {
            return Err(KgError::Cycle {
                class: class.to_string(),
            });
        }
        let supers: Vec<String> = self
            .kb
            .schema()
            .get_class(class)?
            .supers
            .iter()
            .cloned()
            .collect();

        let mut closure = IndexSet::new();
        for sup in supers {
            let transitive = self.walk(&sup, path)?;
            closure.insert(sup);
            for ancestor in transitive.iter() {
                closure.insert(ancestor.clone());
            }
        }
        path.shift_remove(class);

        let closure = Arc::new(closure);
        self.ancestors
            .write()
            .insert(class.to_string(), closure.clone());
        Ok(closure)
    }

    /// True iff every instance of `c` is necessarily an instance of `d`:
    /// `c == d` or `d` is an ancestor of `c`. Both classes must be declared.
    pub fn is_subsumed(&self, c: &str, d: &str) -> KgResult<bool> {
        self.kb.schema().get_class(c)?;
        self.kb.schema().get_class(d)?;
        if c == d {
            return Ok(true);
        }
        Ok(self.ancestors(c)?.contains(d))
    }

    /// Every (sub, super) pair reachable through the subclass relation,
    /// direct and transitive, deduplicated and sorted by sub then super.
    pub fn classify_all(&self) -> KgResult<Vec<(String, String)>> {
        let mut pairs = Vec::new();
        for sub in self.kb.schema().class_ids() {
            for sup in self.ancestors(&sub)?.iter() {
                pairs.push((sub.clone(), sup.clone()));
            }
        }
        pairs.sort();
        pairs.dedup();
        Ok(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn engine(build: impl FnOnce(&mut KnowledgeBase)) -> SubsumptionEngine {
        let mut kb = KnowledgeBase::new();
        build(&mut kb);
        kb.freeze().unwrap();
        SubsumptionEngine::new(Arc::new(kb))
    }

    fn chain() -> SubsumptionEngine {
        engine(|kb| {
            for class in ["Attacker", "Skill", "TechnicalSkill"] {
                kb.define_class(class).unwrap();
            }
            kb.define_subclass("Skill", "Attacker").unwrap();
            kb.define_subclass("TechnicalSkill", "Skill").unwrap();
        })
    }

    #[test]
    fn test_ancestors_are_transitive() {
        let engine = chain();
        let closure = engine.ancestors("TechnicalSkill").unwrap();
        assert!(closure.contains("Skill"));
        assert!(closure.contains("Attacker"));
        assert!(engine.ancestors("Attacker").unwrap().is_empty());
    }

    #[test]
    fn test_is_subsumed() {
        let engine = chain();
        assert!(engine.is_subsumed("Skill", "Attacker").unwrap());
        assert!(engine.is_subsumed("TechnicalSkill", "Attacker").unwrap());
        assert!(engine.is_subsumed("Skill", "Skill").unwrap());
        assert!(!engine.is_subsumed("Attacker", "Skill").unwrap());
        assert_matches!(
            engine.is_subsumed("Skill", "Ghost"),
            Err(KgError::NotFound { .. })
        );
    }

    #[test]
    fn test_classify_all_is_sorted_and_complete() {
        let engine = chain();
        let pairs = engine.classify_all().unwrap();
        assert_eq!(
            pairs,
            vec![
                ("Skill".to_string(), "Attacker".to_string()),
                ("TechnicalSkill".to_string(), "Attacker".to_string()),
                ("TechnicalSkill".to_string(), "Skill".to_string()),
            ]
        );
        // repeatable
        assert_eq!(engine.classify_all().unwrap(), pairs);
    }

    #[test]
    fn test_cycle_is_detected_lazily() {
        let engine = engine(|kb| {
            kb.define_class("A").unwrap();
            kb.define_class("B").unwrap();
            kb.define_subclass("A", "B").unwrap();
            // recording the closing edge succeeds; the cycle surfaces at
            // closure time
            kb.define_subclass("B", "A").unwrap();
        });
        assert_matches!(engine.ancestors("A"), Err(KgError::Cycle { .. }));
        assert_matches!(engine.classify_all(), Err(KgError::Cycle { .. }));
    }

    #[test]
    fn test_self_edge_is_a_cycle() {
        let engine = engine(|kb| {
            kb.define_class("A").unwrap();
            kb.define_subclass("A", "A").unwrap();
        });
        assert_matches!(
            engine.ancestors("A"),
            Err(KgError::Cycle { class }) if class == "A"
        );
    }
}
