//! SELECT/ASK behavior through the public query surface.

use assert_matches::assert_matches;
use capec_kg::{
    KgError, KnowledgeBase, PatternTerm, Query, QueryEngine, QueryOutcome, Reasoner, Term,
};
use std::sync::Arc;

fn reasoner() -> Reasoner {
    let mut kb = KnowledgeBase::new();
    for class in ["AttackPattern", "Severity", "Likelihood"] {
        kb.define_class(class).unwrap();
    }
    kb.define_property("hasSeverity", "AttackPattern", "Severity", false)
        .unwrap();
    kb.define_property("hasLikelihood", "AttackPattern", "Likelihood", false)
        .unwrap();
    kb.assert_individual("AttackPattern", "cap1").unwrap();
    kb.assert_individual("AttackPattern", "cap2").unwrap();
    kb.assert_triple("cap1", "hasSeverity", Term::iri("High"))
        .unwrap();
    kb.assert_triple("cap1", "hasLikelihood", Term::iri("Medium"))
        .unwrap();
    kb.assert_triple("cap2", "hasSeverity", Term::iri("Low"))
        .unwrap();
    kb.freeze().unwrap();
    Reasoner::new(Arc::new(kb)).unwrap()
}

#[test]
fn select_join_returns_single_binding_row() {
    let reasoner = reasoner();
    let outcome = reasoner
        .query("SELECT ?a ?l WHERE { ?a hasSeverity High . ?a hasLikelihood ?l }")
        .unwrap();
    let QueryOutcome::Rows(result) = outcome else {
        panic!("expected rows");
    };
    assert_eq!(result.vars, ["a", "l"]);
    assert_eq!(
        result.rows,
        vec![vec![Term::iri("cap1"), Term::iri("Medium")]]
    );
}

#[test]
fn ask_on_absent_severity_is_false() {
    let reasoner = reasoner();
    let outcome = reasoner
        .query("ASK WHERE { ?a hasSeverity VeryHigh . ?a hasLikelihood ?l }")
        .unwrap();
    assert_eq!(outcome, QueryOutcome::Boolean(false));
}

#[test]
fn empty_select_result_is_not_an_error() {
    let reasoner = reasoner();
    let outcome = reasoner
        .query("SELECT ?a WHERE { ?a hasSeverity VeryHigh }")
        .unwrap();
    let QueryOutcome::Rows(result) = outcome else {
        panic!("expected rows");
    };
    assert!(result.is_empty());
}

#[test]
fn malformed_query_text_fails_before_evaluation() {
    let reasoner = reasoner();
    for bad in [
        "SELECT ?a WHERE { ?a hasSeverity }",
        "SELECT ?a ?ghost WHERE { ?a hasSeverity High }",
        "DESCRIBE ?a WHERE { ?a hasSeverity High }",
        "SELECT ?a WHERE { ?a hasSeverity High",
    ] {
        assert_matches!(
            reasoner.query(bad),
            Err(KgError::QuerySyntax { .. }),
            "expected syntax error for {bad:?}"
        );
    }
}

#[test]
fn built_queries_run_like_parsed_ones() {
    let reasoner = reasoner();
    let built = Query::select(["a"])
        .pattern(
            PatternTerm::var("a"),
            PatternTerm::iri("hasSeverity"),
            PatternTerm::iri("High"),
        )
        .build()
        .unwrap();
    let parsed = Query::parse("SELECT ?a WHERE { ?a hasSeverity High }").unwrap();
    assert_eq!(reasoner.run(&built), reasoner.run(&parsed));
}

#[test]
fn engine_answers_over_materialized_type_triples() {
    let reasoner = reasoner();
    let kb = reasoner.knowledge_base();
    let engine = QueryEngine::new(kb.graph());
    let q = Query::parse("SELECT ?i WHERE { ?i rdf:type AttackPattern }").unwrap();
    let QueryOutcome::Rows(result) = engine.run(&q) else {
        panic!("expected rows");
    };
    assert_eq!(
        result.rows,
        vec![vec![Term::iri("cap1")], vec![Term::iri("cap2")]]
    );
}
