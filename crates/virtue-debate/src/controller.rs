//! The virtue weight controller and its entropy guard.

use tracing::debug;

use crate::session::DebateRound;
use crate::weights::WeightVector;
use crate::{DebateError, Result};

/// Binary-search iterations for the entropy blend; halves the α interval
/// each step, far past f64 resolution.
const BLEND_ITERATIONS: usize = 64;

/// Maintains the weight vector over pillars across debate rounds.
///
/// Rebalancing is a confidence-weighted softmax constrained by the
/// **entropy guard**: the normalized Shannon entropy of the result must
/// stay at or above the configured floor, so no pillar is ever starved to
/// near-zero weight. Rebalance is a pure function of the round and the
/// configuration: replaying the same rounds into a fresh controller
/// reproduces the same vectors.
#[derive(Debug)]
pub struct VirtueWeightController {
    base: WeightVector,
    entropy_floor: f64,
    temperature: f64,
    current: WeightVector,
}

impl VirtueWeightController {
    /// Creates a controller from the configured base weights.
    ///
    /// # Errors
    /// Rejects an entropy floor outside [0.0, 1.0] or a non-positive
    /// softmax temperature. An empty pillar set is already impossible for
    /// a validated [`WeightVector`].
    pub fn new(base: WeightVector, entropy_floor: f64, temperature: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&entropy_floor) {
            return Err(DebateError::InvalidSetting {
                name: "entropy_floor".to_string(),
                reason: format!("{entropy_floor} is outside [0.0, 1.0]"),
            });
        }
        if !temperature.is_finite() || temperature <= 0.0 {
            return Err(DebateError::InvalidSetting {
                name: "temperature".to_string(),
                reason: format!("{temperature} is not a positive number"),
            });
        }
        let current = base.clone();
        Ok(Self {
            base,
            entropy_floor,
            temperature,
            current,
        })
    }

    /// Returns the configured base weights (used for round 0).
    pub fn initial(&self) -> WeightVector {
        self.base.clone()
    }

    /// Returns the vector produced by the most recent rebalance.
    pub fn current(&self) -> &WeightVector {
        &self.current
    }

    /// Returns the configured entropy floor.
    pub fn entropy_floor(&self) -> f64 {
        self.entropy_floor
    }

    /// Rebalances the weight vector from a round's screening results.
    ///
    /// Softmax over per-pillar confidence: a pillar whose candidate
    /// passed contributes its confidence, a pillar whose candidate failed
    /// or is missing contributes 0.0. Failures never boost a pillar. The
    /// exponents are max-shifted so an extreme temperature cannot
    /// overflow the distribution.
    pub fn rebalance(&mut self, round: &DebateRound) -> WeightVector {
        let confidences: Vec<(String, f64)> = self
            .base
            .pillars()
            .iter()
            .map(|&pillar| {
                let confidence = round
                    .passed()
                    .find(|(candidate, _)| candidate.pillar == pillar)
                    .map(|(candidate, _)| candidate.confidence.value())
                    .unwrap_or(0.0);
                (pillar.to_string(), confidence)
            })
            .collect();

        let peak = confidences.iter().map(|(_, c)| *c).fold(0.0, f64::max);
        let scores: Vec<(String, f64)> = confidences
            .into_iter()
            .map(|(pillar, c)| (pillar, ((c - peak) / self.temperature).exp()))
            .collect();

        let total: f64 = scores.iter().map(|(_, s)| s).sum();
        let map = scores
            .into_iter()
            .map(|(pillar, s)| (pillar, s / total))
            .collect();
        // Softmax output always satisfies the vector invariants.
        let proposal = WeightVector::from_map(map)
            .expect("softmax over a non-empty pillar set is a valid distribution");

        let rebalanced = self.enforce_entropy_floor(proposal);
        self.current = rebalanced.clone();
        rebalanced
    }

    /// Applies the entropy guard to an unconstrained proposal.
    ///
    /// If the proposal's entropy already meets the floor it is returned
    /// untouched. Otherwise the minimal blend toward uniform with
    /// `H(w(α)) == floor` is found by binary search; entropy is concave
    /// with its maximum at uniform, so H is monotone along the segment.
    fn enforce_entropy_floor(&self, proposal: WeightVector) -> WeightVector {
        let entropy = proposal.normalized_entropy();
        if entropy >= self.entropy_floor {
            return proposal;
        }

        debug!(
            entropy,
            floor = self.entropy_floor,
            "entropy guard active, blending toward uniform"
        );
        let mut lo = 0.0_f64;
        let mut hi = 1.0_f64;
        for _ in 0..BLEND_ITERATIONS {
            let mid = (lo + hi) / 2.0;
            if proposal.blended_toward_uniform(mid).normalized_entropy() < self.entropy_floor {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        // hi is the smallest α found with H(w(α)) >= floor.
        proposal.blended_toward_uniform(hi)
    }
}
