//! # Virtue Pillars
//!
//! Pillar scorer adapters for the virtue debate engine.
//!
//! A *pillar* is an independent scoring perspective (Logic, Empathy,
//! Authenticity, ...) that proposes a candidate answer for a query each
//! debate round. This crate defines the data types exchanged with the
//! debate engine and the adapter seam to the external model-inference and
//! knowledge-retrieval subsystems:
//!
//! - [`Query`] / [`Candidate`] / [`Confidence`]: the per-round data contract
//! - [`PillarScorer`]: the async capability trait every pillar implements
//! - [`PillarRegistry`]: name → implementation mapping resolved at
//!   configuration load, not at call time
//! - [`InferenceBackend`] / [`KnowledgeRetriever`]: external collaborator
//!   interfaces, with [`BackendPillar`] as the generic adapter over them
//!
//! Scorers never abort a debate session: the engine bounds every call with
//! a timeout and substitutes a sentinel low-confidence candidate when a
//! pillar fails to answer in time.

mod backend;
mod candidate;
mod error;
mod query;
mod registry;
mod scorer;

pub use backend::{BackendPillar, Inference, InferenceBackend, KnowledgeRetriever, RetrievedNode};
pub use candidate::{Candidate, Confidence};
pub use error::ScorerError;
pub use query::Query;
pub use registry::PillarRegistry;
pub use scorer::{PillarScorer, SessionContext};

/// Result type for pillar scorer operations.
pub type Result<T> = std::result::Result<T, ScorerError>;
