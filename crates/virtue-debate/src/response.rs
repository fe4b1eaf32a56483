//! The final response emitted to callers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::session::TerminationReason;

/// A non-primary surviving candidate attached to the response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alternative {
    /// Pillar that proposed this answer.
    pub pillar: String,
    /// The alternative answer text.
    pub answer: String,
    /// The pillar's confidence.
    pub confidence: f64,
    /// Weighted score (`weight × confidence`) used for ranking.
    pub score: f64,
}

/// The arbitrated answer plus observability metadata.
///
/// When the session abstained or was cancelled, `answer` is `None` and
/// the response is a structured refusal, never a fabricated answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// The synthesized answer; `None` for refusals.
    pub answer: Option<String>,
    /// Pillar behind the primary answer.
    pub primary_pillar: Option<String>,
    /// Remaining surviving candidates, best first.
    pub alternatives: Vec<Alternative>,
    /// Final per-pillar weights.
    pub virtue_scores: BTreeMap<String, f64>,
    /// Ordered, deduplicated watchdog reasons from the winning round.
    pub safety_flags: Vec<String>,
    /// Number of debate rounds the session ran.
    pub debate_rounds: usize,
    /// Why the session terminated.
    pub termination: TerminationReason,
}

impl Response {
    /// Creates a structured refusal.
    pub fn refusal(
        termination: TerminationReason,
        virtue_scores: BTreeMap<String, f64>,
        debate_rounds: usize,
    ) -> Self {
        Self {
            answer: None,
            primary_pillar: None,
            alternatives: Vec::new(),
            virtue_scores,
            safety_flags: Vec::new(),
            debate_rounds,
            termination,
        }
    }

    /// Returns true if this response declines to answer.
    pub fn is_refusal(&self) -> bool {
        self.answer.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refusal_shape() {
        let response = Response::refusal(TerminationReason::Abstained, BTreeMap::new(), 2);
        assert!(response.is_refusal());
        assert!(response.answer.is_none());
        assert!(response.alternatives.is_empty());
        assert_eq!(response.debate_rounds, 2);
        assert_eq!(response.termination, TerminationReason::Abstained);
    }

    #[test]
    fn test_response_serialization() {
        let mut scores = BTreeMap::new();
        scores.insert("Logic".to_string(), 0.6);
        scores.insert("Empathy".to_string(), 0.4);
        let response = Response {
            answer: Some("yes".to_string()),
            primary_pillar: Some("Logic".to_string()),
            alternatives: Vec::new(),
            virtue_scores: scores,
            safety_flags: vec!["flag".to_string()],
            debate_rounds: 1,
            termination: TerminationReason::Converged,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("Converged"));
        let parsed: Response = serde_json::from_str(&json).unwrap();
        assert!(!parsed.is_refusal());
        assert_eq!(parsed.primary_pillar.as_deref(), Some("Logic"));
    }
}
