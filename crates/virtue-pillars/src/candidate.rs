//! Candidate answers proposed by pillars.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A pillar's confidence in its own candidate answer.
///
/// Ranges from 0.0 (no confidence) to 1.0 (absolute certainty).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Confidence(f64);

impl Confidence {
    /// Creates a new confidence value.
    ///
    /// # Panics
    /// Panics if value is outside [0.0, 1.0]. Use [`Confidence::clamped`]
    /// for values coming from external backends.
    pub fn new(value: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&value),
            "Confidence must be between 0.0 and 1.0"
        );
        Self(value)
    }

    /// Creates a confidence value, clamping out-of-range input.
    ///
    /// External inference backends are not trusted to stay in range.
    pub fn clamped(value: f64) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    /// Returns the confidence value.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Creates a zero confidence (used by sentinel candidates).
    pub fn zero() -> Self {
        Self(0.0)
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0 * 100.0)
    }
}

/// One pillar's proposed answer for a query-round.
///
/// Owned by the round that collected it; retained in the round record for
/// audit even when screening fails it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// Name of the pillar that produced this candidate.
    pub pillar: String,
    /// The proposed answer text.
    pub answer: String,
    /// The pillar's confidence in the answer.
    pub confidence: Confidence,
    /// Ordered reasoning steps behind the answer.
    pub rationale: Vec<String>,
    /// Knowledge-graph node identifiers cited as grounding.
    pub citations: BTreeSet<String>,
    /// True when this is a sentinel substituted for a scorer that timed
    /// out or failed; sentinels never pass screening.
    pub timed_out: bool,
}

impl Candidate {
    /// Creates a new candidate answer.
    pub fn new(pillar: impl Into<String>, answer: impl Into<String>, confidence: Confidence) -> Self {
        Self {
            pillar: pillar.into(),
            answer: answer.into(),
            confidence,
            rationale: Vec::new(),
            citations: BTreeSet::new(),
            timed_out: false,
        }
    }

    /// Appends a reasoning step to the rationale trace.
    pub fn with_rationale_step(mut self, step: impl Into<String>) -> Self {
        self.rationale.push(step.into());
        self
    }

    /// Adds a knowledge-graph citation.
    pub fn with_citation(mut self, node_id: impl Into<String>) -> Self {
        self.citations.insert(node_id.into());
        self
    }

    /// Creates the sentinel candidate substituted when a scorer times out.
    pub fn timed_out(pillar: impl Into<String>) -> Self {
        Self::sentinel(pillar, "scorer timeout: no answer within the adapter deadline")
    }

    /// Creates a sentinel candidate recording a scorer failure.
    ///
    /// Sentinels carry zero confidence and the `timed_out` flag so the
    /// watchdog records them without letting them influence weighting.
    pub fn sentinel(pillar: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            pillar: pillar.into(),
            answer: String::new(),
            confidence: Confidence::zero(),
            rationale: vec![reason.into()],
            citations: BTreeSet::new(),
            timed_out: true,
        }
    }

    /// Returns true if this candidate cites at least one knowledge node.
    pub fn is_grounded(&self) -> bool {
        !self.citations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_new_valid() {
        let c = Confidence::new(0.5);
        assert!((c.value() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    #[should_panic(expected = "Confidence must be between 0.0 and 1.0")]
    fn test_confidence_new_invalid() {
        Confidence::new(1.5);
    }

    #[test]
    fn test_confidence_clamped() {
        assert!((Confidence::clamped(2.0).value() - 1.0).abs() < f64::EPSILON);
        assert!((Confidence::clamped(-0.5).value() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_confidence_display() {
        assert_eq!(Confidence::new(0.75).to_string(), "75.0%");
    }

    #[test]
    fn test_candidate_new() {
        let c = Candidate::new("Logic", "42", Confidence::new(0.9));
        assert_eq!(c.pillar, "Logic");
        assert_eq!(c.answer, "42");
        assert!(!c.timed_out);
        assert!(!c.is_grounded());
    }

    #[test]
    fn test_candidate_builders() {
        let c = Candidate::new("Empathy", "answer", Confidence::new(0.6))
            .with_rationale_step("considered user framing")
            .with_citation("kg://node/7")
            .with_citation("kg://node/7"); // duplicate collapses
        assert_eq!(c.rationale.len(), 1);
        assert_eq!(c.citations.len(), 1);
        assert!(c.is_grounded());
    }

    #[test]
    fn test_candidate_timed_out_sentinel() {
        let c = Candidate::timed_out("Logic");
        assert!(c.timed_out);
        assert!(c.answer.is_empty());
        assert!((c.confidence.value() - 0.0).abs() < f64::EPSILON);
        assert!(c.rationale[0].contains("timeout"));
    }

    #[test]
    fn test_candidate_serialization() {
        let c = Candidate::new("Logic", "yes", Confidence::new(0.8)).with_citation("kg://n/1");
        let json = serde_json::to_string(&c).unwrap();
        let parsed: Candidate = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.pillar, "Logic");
        assert!(parsed.citations.contains("kg://n/1"));
    }
}
