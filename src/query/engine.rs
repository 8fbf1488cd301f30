//! Backtracking join evaluator for conjunctive triple patterns.
//!
//! Patterns are reordered by estimated selectivity (bound predicate plus a
//! bound subject or object first, fully-variable patterns last), then joined
//! by extending a partial binding map one pattern at a time, probing the
//! store index that matches the most specific slot bound at that point.
//! ASK stops at the first satisfying binding. No matches is a valid empty
//! result, never an error.

use super::pattern::{PatternTerm, Query, QueryForm, TriplePattern};
use crate::model::{Term, Triple};
use crate::store::GraphStore;
use ahash::AHashMap;

/// Result rows of a SELECT, one `Term` per projected variable, in the order
/// the variables were declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectResult {
    pub vars: Vec<String>,
    pub rows: Vec<Vec<Term>>,
}

impl SelectResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Outcome of running a query: rows for SELECT, a boolean for ASK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    Rows(SelectResult),
    Boolean(bool),
}

impl QueryOutcome {
    pub fn is_boolean(&self) -> bool {
        matches!(self, QueryOutcome::Boolean(_))
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            QueryOutcome::Boolean(value) => Some(*value),
            QueryOutcome::Rows(_) => None,
        }
    }

    pub fn as_rows(&self) -> Option<&SelectResult> {
        match self {
            QueryOutcome::Rows(result) => Some(result),
            QueryOutcome::Boolean(_) => None,
        }
    }
}

/// Evaluator over a (typically frozen) graph store.
pub struct QueryEngine<'g> {
    graph: &'g GraphStore,
}

type Bindings = AHashMap<String, Term>;

impl<'g> QueryEngine<'g> {
    pub fn new(graph: &'g GraphStore) -> Self {
        Self { graph }
    }

    /// Evaluate a validated query.
    pub fn run(&self, query: &Query) -> QueryOutcome {
        match &query.form {
            QueryForm::Select(vars) => {
                let mut rows = Vec::new();
                self.solve(&ordered(&query.patterns), &mut Bindings::new(), &mut |b| {
                    let row = vars
                        .iter()
                        .map(|var| {
                            b.get(var)
                                .cloned()
                                .expect("projected variable bound by validated query")
                        })
                        .collect();
                    rows.push(row);
                    false
                });
                QueryOutcome::Rows(SelectResult {
                    vars: vars.clone(),
                    rows,
                })
            }
            QueryForm::Ask => QueryOutcome::Boolean(self.ask(query)),
        }
    }

    /// True iff at least one satisfying binding exists. Usable on any query
    /// form; stops at the first solution.
    pub fn ask(&self, query: &Query) -> bool {
        self.solve(&ordered(&query.patterns), &mut Bindings::new(), &mut |_| true)
    }

    /// Depth-first join. `emit` receives each complete binding and returns
    /// `true` to stop the search.
    fn solve(
        &self,
        patterns: &[&TriplePattern],
        bindings: &mut Bindings,
        emit: &mut dyn FnMut(&Bindings) -> bool,
    ) -> bool {
        let Some((&pattern, rest)) = patterns.split_first() else {
            return emit(bindings);
        };

        let subject = resolve(&pattern.subject, bindings);
        let predicate = resolve(&pattern.predicate, bindings);
        let object = resolve(&pattern.object, bindings);

        for triple in self.candidates(subject.as_ref(), predicate.as_ref(), object.as_ref()) {
            let mut newly_bound: Vec<String> = Vec::new();
            if extend(pattern, triple, bindings, &mut newly_bound) {
                let stop = self.solve(rest, bindings, emit);
                for var in &newly_bound {
                    bindings.remove(var);
                }
                if stop {
                    return true;
                }
            } else {
                for var in &newly_bound {
                    bindings.remove(var);
                }
            }
        }
        false
    }

    /// Pick the candidate set from the most specific index available:
    /// predicate, then subject, then object, else a full scan.
    fn candidates(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
    ) -> Vec<&'g Triple> {
        if let Some(p) = predicate {
            self.graph.by_predicate(p.as_str())
        } else if let Some(s) = subject {
            self.graph.by_subject(s.as_str())
        } else if let Some(o) = object {
            self.graph.by_object(o.as_str())
        } else {
            self.graph.triples().collect()
        }
    }
}

/// A slot's concrete value under the current bindings, if any.
fn resolve(slot: &PatternTerm, bindings: &Bindings) -> Option<Term> {
    match slot {
        PatternTerm::Bound(term) => Some(term.clone()),
        PatternTerm::Var(name) => bindings.get(name).cloned(),
    }
}

/// Try to match `triple` against `pattern` under `bindings`, binding any
/// free variables. Newly bound names are recorded so the caller can undo.
fn extend(
    pattern: &TriplePattern,
    triple: &Triple,
    bindings: &mut Bindings,
    newly_bound: &mut Vec<String>,
) -> bool {
    let slots = [
        (&pattern.subject, Term::Iri(triple.subject.clone())),
        (&pattern.predicate, Term::Iri(triple.predicate.clone())),
        (&pattern.object, triple.object.clone()),
    ];
    for (slot, value) in slots {
        match slot {
            PatternTerm::Bound(term) => {
                if *term != value {
                    return false;
                }
            }
            PatternTerm::Var(name) => match bindings.get(name) {
                Some(bound) => {
                    if *bound != value {
                        return false;
                    }
                }
                None => {
                    bindings.insert(name.clone(), value);
                    newly_bound.push(name.clone());
                }
            },
        }
    }
    true
}

/// Stable selectivity ordering: more bound slots first, bound predicate
/// weighted highest.
fn ordered(patterns: &[TriplePattern]) -> Vec<&TriplePattern> {
    let mut out: Vec<&TriplePattern> = patterns.iter().collect();
    out.sort_by_key(|pattern| std::cmp::Reverse(selectivity(pattern)));
    out
}

fn selectivity(pattern: &TriplePattern) -> u8 {
    let mut score = 0;
    if !pattern.predicate.is_var() {
        score += 4;
    }
    if !pattern.subject.is_var() {
        score += 2;
    }
    if !pattern.object.is_var() {
        score += 1;
    }
    score
}
