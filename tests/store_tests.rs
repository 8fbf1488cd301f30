//! Store lifecycle, set semantics, and snapshot behavior.

use assert_matches::assert_matches;
use capec_kg::{KgError, KnowledgeBase, Reasoner, Term, Triple};
use std::sync::Arc;

fn small_kb() -> KnowledgeBase {
    let mut kb = KnowledgeBase::new();
    for class in ["Attacker", "Skill", "Status", "Abstraction"] {
        kb.define_class(class).unwrap();
    }
    kb.define_subclass("Skill", "Attacker").unwrap();
    kb.define_disjoint("Status", "Abstraction").unwrap();
    kb.define_property("need", "Attacker", "Skill", false)
        .unwrap();
    kb.assert_individual("Skill", "sql").unwrap();
    kb.assert_individual("Attacker", "attacker0").unwrap();
    kb.assert_triple("attacker0", "need", Term::iri("sql"))
        .unwrap();
    kb
}

#[test]
fn reasserting_a_triple_never_changes_counts_or_indices() {
    let mut kb = small_kb();
    let before = kb.graph().triple_count();
    let by_subject = kb.graph().by_subject("attacker0").len();
    for _ in 0..10 {
        kb.assert_triple("attacker0", "need", Term::iri("sql"))
            .unwrap();
    }
    assert_eq!(kb.graph().triple_count(), before);
    assert_eq!(kb.graph().by_subject("attacker0").len(), by_subject);
    assert_eq!(kb.graph().by_predicate("need").len(), 1);
    assert_eq!(kb.graph().by_object("sql").len(), 1);
}

#[test]
fn every_mutator_fails_after_freeze() {
    let mut kb = small_kb();
    kb.freeze().unwrap();
    assert_matches!(kb.define_class("New"), Err(KgError::FrozenStore { .. }));
    assert_matches!(
        kb.define_subclass("Skill", "Attacker"),
        Err(KgError::FrozenStore { .. })
    );
    assert_matches!(
        kb.define_disjoint("Skill", "Status"),
        Err(KgError::FrozenStore { .. })
    );
    assert_matches!(
        kb.define_property("uses", "Attacker", "Skill", false),
        Err(KgError::FrozenStore { .. })
    );
    assert_matches!(
        kb.assert_individual("Skill", "xss"),
        Err(KgError::FrozenStore { .. })
    );
    assert_matches!(
        kb.assert_triple("attacker0", "need", Term::iri("xss")),
        Err(KgError::FrozenStore { .. })
    );
}

#[test]
fn cross_class_reassertion_is_a_conflict_with_details() {
    let mut kb = small_kb();
    let err = kb.assert_individual("Status", "sql").unwrap_err();
    assert_matches!(
        err,
        KgError::Conflict { individual, existing, attempted }
            if individual == "sql" && existing == "Skill" && attempted == "Status"
    );
}

#[test]
fn snapshot_round_trip_preserves_reasoning_results() {
    let mut kb = small_kb();
    kb.freeze().unwrap();
    let snapshot = kb.snapshot();

    let mut rebuilt = KnowledgeBase::from_snapshot(&snapshot).unwrap();
    rebuilt.freeze().unwrap();

    let original = Reasoner::new(Arc::new(kb)).unwrap();
    let restored = Reasoner::new(Arc::new(rebuilt)).unwrap();
    assert_eq!(original.classify().unwrap(), restored.classify().unwrap());
    assert_eq!(
        original.list_instances("Attacker").unwrap(),
        restored.list_instances("Attacker").unwrap()
    );
    assert_eq!(
        original.query("ASK WHERE { attacker0 need sql }").unwrap(),
        restored.query("ASK WHERE { attacker0 need sql }").unwrap()
    );
}

#[test]
fn snapshot_import_revalidates_invariants() {
    let kb = small_kb();
    let mut snapshot = kb.snapshot();
    // corrupt the snapshot: a triple with an undeclared predicate
    snapshot
        .triples
        .push(Triple::new("attacker0", "undeclared", Term::iri("sql")));
    assert_matches!(
        KnowledgeBase::from_snapshot(&snapshot),
        Err(KgError::Schema { .. })
    );
}
