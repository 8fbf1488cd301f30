//! In-memory knowledge-graph engine for the CAPEC attack-pattern catalog.
//!
//! A [`store::KnowledgeBase`] is populated during a single-threaded
//! ingestion phase (schema first, then individuals and triples) and frozen.
//! Four reasoning tasks then run read-only over the frozen store, safely
//! from multiple threads:
//!
//! - consistency checking ([`reasoner::ConsistencyChecker`])
//! - subsumption and classification ([`reasoner::SubsumptionEngine`])
//! - instance checking and retrieval ([`reasoner::InstanceClassifier`])
//! - conjunctive SELECT/ASK pattern queries ([`query::QueryEngine`])
//!
//! ```
//! use capec_kg::{ingest, IngestOptions, Reasoner};
//! use std::sync::Arc;
//!
//! let rows = vec![/* tokenized dataset rows */];
//! let (kb, _report) = ingest::build_knowledge_base(rows, &IngestOptions::default())?;
//! let reasoner = Reasoner::new(Arc::new(kb))?;
//! assert!(reasoner
//!     .query("ASK WHERE { ?p ?q ?r }")?
//!     .is_boolean());
//! # Ok::<(), capec_kg::KgError>(())
//! ```

pub mod error;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod query;
pub mod reasoner;
pub mod store;
pub mod vocab;

pub use error::{EntityKind, KgError, KgResult};
pub use ingest::{CapecRow, IngestOptions, IngestReport};
pub use logging::{LogFormat, LoggingConfig, init_logging};
pub use model::{Individual, Term, Triple};
pub use query::{PatternTerm, Query, QueryEngine, QueryOutcome, SelectResult, TriplePattern};
pub use reasoner::{ConflictReport, ConsistencyMode, Reasoner};
pub use store::{KnowledgeBase, Snapshot};
