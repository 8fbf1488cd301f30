//! CAPEC schema bootstrap and dataset ingestion.
//!
//! The dataset collaborator hands over already-tokenized rows; nothing here
//! touches a file. Each row mints the individuals and property assertions
//! the catalog schema calls for. A malformed row is skipped with a warning
//! and a bumped skip-count; ingestion never aborts on a single bad row.

use crate::error::{KgError, KgResult};
use crate::model::Term;
use crate::store::KnowledgeBase;
use crate::vocab::{self, well_formed_iri};
use serde::{Deserialize, Serialize};

/// The CAPEC class names declared by [`build_schema`].
const CLASSES: &[&str] = &[
    "AttackPattern",
    "Attacker",
    "Attack",
    "Id",
    "Name",
    "Abstraction",
    "Status",
    "Likelihood",
    "Severity",
    "Prerequisite",
    "Skill",
    "Resource",
    "Vulnerability",
    "ExecutionFlow",
    "Consequence",
    "MitigationAction",
];

/// Direct subclass edges: (sub, super).
const SUBCLASSES: &[(&str, &str)] = &[
    ("Prerequisite", "Attacker"),
    ("Resource", "Attacker"),
    ("Skill", "Attacker"),
    ("ExecutionFlow", "Attack"),
    ("Consequence", "Attack"),
    ("MitigationAction", "Attack"),
    ("Id", "AttackPattern"),
];

/// Object properties: (id, domain, range, symmetric).
const PROPERTIES: &[(&str, &str, &str, bool)] = &[
    ("hasName", "AttackPattern", "Name", false),
    ("hasAbstraction", "AttackPattern", "Abstraction", false),
    ("hasStatus", "AttackPattern", "Status", false),
    ("hasSeverity", "AttackPattern", "Severity", false),
    ("hasLikelihood", "AttackPattern", "Likelihood", false),
    ("uses", "Attacker", "Resource", false),
    ("need", "Attacker", "Skill", false),
    ("precondition", "Attacker", "Prerequisite", false),
    ("implies", "Attack", "Consequence", false),
    ("executes", "Attack", "ExecutionFlow", false),
    ("reduces", "MitigationAction", "Attack", false),
    ("hasKnowledge", "Attacker", "Vulnerability", false),
    ("exploits", "Attack", "Vulnerability", false),
    ("makes", "Attacker", "Attack", false),
    ("relatedTo", "Attack", "AttackPattern", false),
    ("relatedPattern", "AttackPattern", "AttackPattern", true),
];

/// One tokenized CAPEC dataset row, as supplied by the dataset collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapecRow {
    pub id: String,
    pub name: String,
    pub abstraction: String,
    pub status: String,
    pub likelihood: String,
    pub severity: String,
    pub related_pattern_id: String,
    pub execution_flow_id: String,
    pub prerequisite_id: String,
    pub skill_id: String,
    pub resource_id: String,
    pub consequence_id: String,
    pub mitigation_id: String,
    pub vulnerability_id: String,
}

/// Ingestion knobs mirroring the original loader's customization points.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Namespace prefix for every minted IRI.
    pub namespace: String,
    /// Cap on the number of rows taken from the stream.
    pub max_rows: Option<usize>,
    /// Also declare MitigationAction ⊥ ExecutionFlow,
    /// MitigationAction ⊥ Consequence, and Resource ⊥ Skill.
    pub extra_disjointness: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            namespace: vocab::DEFAULT_NS.to_string(),
            max_rows: None,
            extra_disjointness: false,
        }
    }
}

/// Outcome of an ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub loaded: usize,
    pub skipped: usize,
}

/// Declare the CAPEC classes, hierarchy, properties, and disjointness.
pub fn build_schema(kb: &mut KnowledgeBase, options: &IngestOptions) -> KgResult<()> {
    let ns = |name: &str| format!("{}{}", options.namespace, name);
    for class in CLASSES {
        kb.define_class(&ns(class))?;
    }
    for (sub, sup) in SUBCLASSES {
        kb.define_subclass(&ns(sub), &ns(sup))?;
    }
    for (id, domain, range, symmetric) in PROPERTIES {
        kb.define_property(&ns(id), &ns(domain), &ns(range), *symmetric)?;
    }
    kb.define_disjoint(&ns("Status"), &ns("Abstraction"))?;
    if options.extra_disjointness {
        kb.define_disjoint(&ns("MitigationAction"), &ns("ExecutionFlow"))?;
        kb.define_disjoint(&ns("MitigationAction"), &ns("Consequence"))?;
        kb.define_disjoint(&ns("Resource"), &ns("Skill"))?;
    }
    Ok(())
}

/// Populate the graph from a row stream. Returns loaded/skipped counts.
pub fn ingest<I>(kb: &mut KnowledgeBase, rows: I, options: &IngestOptions) -> KgResult<IngestReport>
where
    I: IntoIterator<Item = CapecRow>,
{
    let mut report = IngestReport::default();
    for (row_number, row) in rows.into_iter().enumerate() {
        if let Some(cap) = options.max_rows {
            if report.loaded >= cap {
                break;
            }
        }
        match ingest_row(kb, &row, row_number, options) {
            Ok(()) => report.loaded += 1,
            Err(err) => {
                tracing::warn!(
                    row = row_number,
                    pattern_id = %row.id,
                    error = %err,
                    category = err.category(),
                    "skipping malformed dataset row"
                );
                report.skipped += 1;
            }
        }
    }
    tracing::info!(
        loaded = report.loaded,
        skipped = report.skipped,
        triples = kb.graph().triple_count(),
        individuals = kb.graph().individual_count(),
        "ingested CAPEC dataset"
    );
    Ok(report)
}

/// Assert `id` under `class`, multi-typing through an extra `rdf:type`
/// triple when the id was already asserted under another class. Dataset
/// rows routinely share identifiers across classes (a related-pattern id
/// is another row's pattern id), so a cross-class collision here is data,
/// not an error.
fn assert_typed(kb: &mut KnowledgeBase, class: &str, id: &str) -> KgResult<()> {
    match kb.assert_individual(class, id) {
        Ok(()) => Ok(()),
        Err(KgError::Conflict { .. }) => kb.assert_triple(id, vocab::RDF_TYPE, Term::iri(class)),
        Err(err) => Err(err),
    }
}

fn ingest_row(
    kb: &mut KnowledgeBase,
    row: &CapecRow,
    counter: usize,
    options: &IngestOptions,
) -> KgResult<()> {
    // reject before the first store mutation: a skipped row must leave no
    // partial state behind
    if row.id.trim().is_empty() || row.name.trim().is_empty() {
        return Err(KgError::schema(row.id.clone(), "row is missing its id or name"));
    }
    let ns = |name: &str| format!("{}{}", options.namespace, name);
    let flow = well_formed_iri(&row.execution_flow_id);
    let prerequisite = well_formed_iri(&row.prerequisite_id);
    let mitigation = well_formed_iri(&row.mitigation_id);

    let attacker = ns(&format!("attacker{counter}"));
    let attack = ns(&format!("attack{counter}"));
    let pattern = ns(&row.id);
    let name = ns(&row.name);
    let abstraction = ns(&row.abstraction);
    let status = ns(&row.status);
    let likelihood = ns(&row.likelihood);
    let severity = ns(&row.severity);
    let related = ns(&row.related_pattern_id);
    let flow = ns(&flow);
    let prerequisite = ns(&prerequisite);
    let skill = ns(&row.skill_id);
    let resource = ns(&row.resource_id);
    let consequence = ns(&row.consequence_id);
    let mitigation = ns(&mitigation);
    let vulnerability = ns(&row.vulnerability_id);

    assert_typed(kb, &ns("Attacker"), &attacker)?;
    assert_typed(kb, &ns("Attack"), &attack)?;
    assert_typed(kb, &ns("Id"), &pattern)?;
    assert_typed(kb, &ns("Name"), &name)?;
    assert_typed(kb, &ns("Abstraction"), &abstraction)?;
    assert_typed(kb, &ns("Status"), &status)?;
    assert_typed(kb, &ns("Likelihood"), &likelihood)?;
    assert_typed(kb, &ns("Severity"), &severity)?;
    assert_typed(kb, &ns("AttackPattern"), &related)?;
    assert_typed(kb, &ns("ExecutionFlow"), &flow)?;
    assert_typed(kb, &ns("Prerequisite"), &prerequisite)?;
    assert_typed(kb, &ns("Skill"), &skill)?;
    assert_typed(kb, &ns("Resource"), &resource)?;
    assert_typed(kb, &ns("Consequence"), &consequence)?;
    assert_typed(kb, &ns("MitigationAction"), &mitigation)?;
    assert_typed(kb, &ns("Vulnerability"), &vulnerability)?;

    kb.assert_triple(&pattern, &ns("hasName"), Term::iri(&name))?;
    kb.assert_triple(&pattern, &ns("hasAbstraction"), Term::iri(&abstraction))?;
    kb.assert_triple(&pattern, &ns("hasStatus"), Term::iri(&status))?;
    kb.assert_triple(&pattern, &ns("hasSeverity"), Term::iri(&severity))?;
    kb.assert_triple(&pattern, &ns("hasLikelihood"), Term::iri(&likelihood))?;
    kb.assert_triple(&pattern, &ns("relatedPattern"), Term::iri(&related))?;

    kb.assert_triple(&attack, &ns("implies"), Term::iri(&consequence))?;
    kb.assert_triple(&attack, &ns("executes"), Term::iri(&flow))?;
    kb.assert_triple(&mitigation, &ns("reduces"), Term::iri(&attack))?;

    kb.assert_triple(&attacker, &ns("uses"), Term::iri(&resource))?;
    kb.assert_triple(&attacker, &ns("need"), Term::iri(&skill))?;
    kb.assert_triple(&attacker, &ns("precondition"), Term::iri(&prerequisite))?;

    kb.assert_triple(&attacker, &ns("hasKnowledge"), Term::iri(&vulnerability))?;
    kb.assert_triple(&attacker, &ns("makes"), Term::iri(&attack))?;
    kb.assert_triple(&attack, &ns("exploits"), Term::iri(&vulnerability))?;
    kb.assert_triple(&attack, &ns("relatedTo"), Term::iri(&pattern))?;
    kb.assert_triple(&attacker, &ns("relatedTo"), Term::iri(&pattern))?;

    Ok(())
}

/// Convenience entry point: declare the schema, ingest the rows, freeze.
pub fn build_knowledge_base<I>(rows: I, options: &IngestOptions) -> KgResult<(KnowledgeBase, IngestReport)>
where
    I: IntoIterator<Item = CapecRow>,
{
    let mut kb = KnowledgeBase::new();
    build_schema(&mut kb, options)?;
    let report = ingest(&mut kb, rows, options)?;
    kb.freeze()?;
    Ok((kb, report))
}
