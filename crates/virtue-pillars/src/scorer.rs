//! The pillar scorer capability trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{Candidate, Query, Result};

/// Per-round context handed to every scorer.
///
/// Carries the round index and the current weight vector as a hint, so an
/// adapter can re-prompt a pillar that the debate has underweighted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    /// Zero-based debate round index.
    pub round: usize,
    /// Current pillar weights, carried forward from the previous round.
    pub weight_hint: BTreeMap<String, f64>,
    /// Domain-template preamble to prepend to scorer prompts.
    pub preamble: Option<String>,
}

impl SessionContext {
    /// Creates the context for a round.
    pub fn new(round: usize, weight_hint: BTreeMap<String, f64>) -> Self {
        Self {
            round,
            weight_hint,
            preamble: None,
        }
    }

    /// Attaches a prompt preamble.
    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = Some(preamble.into());
        self
    }

    /// Returns the hinted weight for a pillar, if present.
    pub fn hint_for(&self, pillar: &str) -> Option<f64> {
        self.weight_hint.get(pillar).copied()
    }

    /// Returns true if the pillar currently sits below the uniform share.
    ///
    /// Underweighted pillars may choose to sharpen their perspective in
    /// later rounds.
    pub fn is_underweighted(&self, pillar: &str) -> bool {
        if self.weight_hint.is_empty() {
            return false;
        }
        let uniform = 1.0 / self.weight_hint.len() as f64;
        self.hint_for(pillar).map(|w| w < uniform).unwrap_or(false)
    }
}

/// Trait for pillar scorer adapters.
///
/// Each implementation wraps one independent scoring perspective and
/// produces a candidate answer per round. Implementations must be safe to
/// call concurrently across sessions and should not block indefinitely:
/// the debate engine bounds every call with a per-adapter timeout and
/// substitutes [`Candidate::timed_out`] when the deadline elapses.
#[async_trait]
pub trait PillarScorer: Send + Sync {
    /// Returns the pillar name (e.g., "Logic").
    fn name(&self) -> &str;

    /// Returns a short description of this pillar's perspective.
    fn perspective(&self) -> &str;

    /// Produces a candidate answer for the query in this round.
    ///
    /// # Errors
    /// Errors are absorbed by the engine into a sentinel candidate; they
    /// never abort the session.
    async fn score(&self, query: &Query, ctx: &SessionContext) -> Result<Candidate>;
}
