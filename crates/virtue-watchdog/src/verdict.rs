//! Watchdog verdict types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A screening signal strength in [0.0, 1.0].
///
/// 0.0 means no signal detected, 1.0 means the strongest possible signal.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct SignalScore(f64);

impl SignalScore {
    /// Creates a new signal score.
    ///
    /// # Panics
    /// Panics if value is outside [0.0, 1.0].
    pub fn new(value: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&value),
            "SignalScore must be between 0.0 and 1.0"
        );
        Self(value)
    }

    /// Creates a signal score, clamping out-of-range input.
    pub fn clamped(value: f64) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    /// Returns the score value.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Returns true if this score exceeds a threshold.
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.0 > threshold
    }

    /// Creates a zero score.
    pub fn zero() -> Self {
        Self(0.0)
    }
}

impl Default for SignalScore {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for SignalScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// The watchdog's verdict on one candidate.
///
/// Computed once per candidate per round; immutable thereafter. A failed
/// candidate stays in the round record for audit but is excluded from
/// weighting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchdogVerdict {
    /// Hallucination signal strength.
    pub hallucination: SignalScore,
    /// Bias signal strength.
    pub bias: SignalScore,
    /// True if the candidate cleared both thresholds.
    pub passed: bool,
    /// Ordered reasons for failure (empty when passed).
    pub reasons: Vec<String>,
}

impl WatchdogVerdict {
    /// Creates a passing verdict.
    pub fn pass(hallucination: SignalScore, bias: SignalScore) -> Self {
        Self {
            hallucination,
            bias,
            passed: true,
            reasons: Vec::new(),
        }
    }

    /// Creates a failing verdict with its reasons.
    pub fn fail(hallucination: SignalScore, bias: SignalScore, reasons: Vec<String>) -> Self {
        Self {
            hallucination,
            bias,
            passed: false,
            reasons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_score_new_valid() {
        let s = SignalScore::new(0.4);
        assert!((s.value() - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    #[should_panic(expected = "SignalScore must be between 0.0 and 1.0")]
    fn test_signal_score_new_invalid() {
        SignalScore::new(-0.1);
    }

    #[test]
    fn test_signal_score_clamped() {
        assert!((SignalScore::clamped(1.8).value() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_signal_score_exceeds() {
        let s = SignalScore::new(0.5);
        assert!(s.exceeds(0.3));
        assert!(!s.exceeds(0.5)); // equal does not exceed
        assert!(!s.exceeds(0.7));
    }

    #[test]
    fn test_verdict_pass() {
        let v = WatchdogVerdict::pass(SignalScore::zero(), SignalScore::zero());
        assert!(v.passed);
        assert!(v.reasons.is_empty());
    }

    #[test]
    fn test_verdict_fail() {
        let v = WatchdogVerdict::fail(
            SignalScore::new(0.9),
            SignalScore::zero(),
            vec!["fabricated certainty".to_string()],
        );
        assert!(!v.passed);
        assert_eq!(v.reasons.len(), 1);
    }

    #[test]
    fn test_verdict_serialization() {
        let v = WatchdogVerdict::pass(SignalScore::new(0.1), SignalScore::new(0.2));
        let json = serde_json::to_string(&v).unwrap();
        let parsed: WatchdogVerdict = serde_json::from_str(&json).unwrap();
        assert!(parsed.passed);
    }
}
