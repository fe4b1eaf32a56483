//! The watchdog gate.

use tracing::debug;
use virtue_pillars::Candidate;

use crate::signals::{BiasScorer, HallucinationScorer, SignalScorer};
use crate::verdict::{SignalScore, WatchdogVerdict};
use crate::{Result, WatchdogError};

/// Screens candidates against hallucination and bias thresholds.
///
/// Deterministic given the same candidate and configuration. The gate
/// never mutates candidates and never errs at evaluation time; invalid
/// thresholds are rejected at construction.
pub struct WatchdogGate {
    hallucination_threshold: f64,
    bias_sensitivity: f64,
    hallucination: Box<dyn SignalScorer>,
    bias: Box<dyn SignalScorer>,
}

impl WatchdogGate {
    /// Creates a gate with the default lexical scorers.
    ///
    /// # Errors
    /// Returns [`WatchdogError::InvalidThreshold`] if either threshold is
    /// outside [0.0, 1.0].
    pub fn new(hallucination_threshold: f64, bias_sensitivity: f64) -> Result<Self> {
        Self::with_scorers(
            hallucination_threshold,
            bias_sensitivity,
            Box::new(HallucinationScorer::new()),
            Box::new(BiasScorer::new()),
        )
    }

    /// Creates a gate with custom signal scorers.
    pub fn with_scorers(
        hallucination_threshold: f64,
        bias_sensitivity: f64,
        hallucination: Box<dyn SignalScorer>,
        bias: Box<dyn SignalScorer>,
    ) -> Result<Self> {
        for &(name, value) in &[
            ("hallucination_threshold", hallucination_threshold),
            ("bias_sensitivity", bias_sensitivity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(WatchdogError::InvalidThreshold {
                    name: name.to_string(),
                    value,
                });
            }
        }
        Ok(Self {
            hallucination_threshold,
            bias_sensitivity,
            hallucination,
            bias,
        })
    }

    /// Returns the hallucination threshold.
    pub fn hallucination_threshold(&self) -> f64 {
        self.hallucination_threshold
    }

    /// Returns the bias sensitivity.
    pub fn bias_sensitivity(&self) -> f64 {
        self.bias_sensitivity
    }

    /// Evaluates one candidate.
    ///
    /// Sentinel candidates (scorer timeout or failure) always fail, so
    /// they are recorded in the round but never weighted.
    pub fn evaluate(&self, candidate: &Candidate) -> WatchdogVerdict {
        if candidate.timed_out {
            return WatchdogVerdict::fail(
                SignalScore::zero(),
                SignalScore::zero(),
                vec![format!("scorer timeout: pillar '{}' produced no answer", candidate.pillar)],
            );
        }

        let (h_raw, h_reasons) = self.hallucination.score(candidate);
        let (b_raw, b_reasons) = self.bias.score(candidate);
        let hallucination = SignalScore::clamped(h_raw);
        let bias = SignalScore::clamped(b_raw);

        let mut reasons = Vec::new();
        if hallucination.exceeds(self.hallucination_threshold) {
            reasons.push(format!(
                "hallucination {hallucination} exceeds threshold {:.2}: {}",
                self.hallucination_threshold,
                h_reasons.join(", ")
            ));
        }
        if bias.exceeds(self.bias_sensitivity) {
            reasons.push(format!(
                "bias {bias} exceeds sensitivity {:.2}: {}",
                self.bias_sensitivity,
                b_reasons.join(", ")
            ));
        }

        if reasons.is_empty() {
            WatchdogVerdict::pass(hallucination, bias)
        } else {
            debug!(pillar = %candidate.pillar, ?reasons, "candidate failed screening");
            WatchdogVerdict::fail(hallucination, bias, reasons)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use virtue_pillars::Confidence;

    fn gate() -> WatchdogGate {
        WatchdogGate::new(0.3, 0.3).unwrap()
    }

    fn grounded(answer: &str) -> Candidate {
        Candidate::new("Logic", answer, Confidence::new(0.8)).with_citation("kg://n/1")
    }

    #[test]
    fn test_gate_invalid_threshold_rejected() {
        let err = WatchdogGate::new(1.5, 0.3).err().unwrap();
        assert!(matches!(err, WatchdogError::InvalidThreshold { .. }));
        assert!(WatchdogGate::new(0.3, -0.1).is_err());
    }

    #[test]
    fn test_gate_passes_clean_candidate() {
        let verdict = gate().evaluate(&grounded("Light scatters more at short wavelengths."));
        assert!(verdict.passed);
        assert!(verdict.reasons.is_empty());
    }

    #[test]
    fn test_gate_fails_hallucinated_candidate() {
        let verdict = gate().evaluate(&grounded("Studies show it is definitively proven."));
        assert!(!verdict.passed);
        assert!(verdict.hallucination.exceeds(0.3));
        assert!(verdict.reasons[0].contains("hallucination"));
    }

    #[test]
    fn test_gate_fails_biased_candidate() {
        let verdict = gate().evaluate(&grounded("Everyone knows those people are wrong."));
        assert!(!verdict.passed);
        assert!(verdict.reasons.iter().any(|r| r.contains("bias")));
    }

    #[test]
    fn test_gate_boundary_is_inclusive() {
        // A score exactly at the threshold passes: passed = score <= threshold.
        let verdict = WatchdogGate::new(0.4, 0.3)
            .unwrap()
            .evaluate(&grounded("Studies show interesting results."));
        assert!((verdict.hallucination.value() - 0.4).abs() < 1e-9);
        assert!(verdict.passed);
    }

    #[test]
    fn test_gate_fails_timed_out_sentinel() {
        let verdict = gate().evaluate(&Candidate::timed_out("Empathy"));
        assert!(!verdict.passed);
        assert!(verdict.reasons[0].contains("scorer timeout"));
        assert!(verdict.reasons[0].contains("Empathy"));
    }

    #[test]
    fn test_gate_is_deterministic() {
        let g = gate();
        let c = grounded("Studies show mixed results.");
        let a = g.evaluate(&c);
        let b = g.evaluate(&c);
        assert_eq!(a.passed, b.passed);
        assert_eq!(a.reasons, b.reasons);
        assert!((a.hallucination.value() - b.hallucination.value()).abs() < f64::EPSILON);
    }
}
