//! The pillar weight vector.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{DebateError, Result};

/// Tolerance on the unit-sum invariant.
pub const SUM_EPSILON: f64 = 1e-6;

/// A distribution of weight over pillars.
///
/// Weights are non-negative and sum to 1 ± 1e-6. Exactly one instance is
/// active per debate session; only the weight controller replaces it
/// between rounds. Iteration order is the pillar name order, so every
/// derived computation is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightVector {
    weights: BTreeMap<String, f64>,
}

impl WeightVector {
    /// Creates a uniform distribution over the given pillars.
    ///
    /// # Errors
    /// Returns [`DebateError::EmptyPillarSet`] for an empty pillar list.
    pub fn uniform(pillars: &[String]) -> Result<Self> {
        if pillars.is_empty() {
            return Err(DebateError::EmptyPillarSet);
        }
        let share = 1.0 / pillars.len() as f64;
        Ok(Self {
            weights: pillars.iter().map(|p| (p.clone(), share)).collect(),
        })
    }

    /// Creates a weight vector from an explicit mapping, validating the
    /// invariants.
    ///
    /// # Errors
    /// Rejects empty maps, negative or non-finite weights, and sums
    /// outside 1 ± 1e-6.
    pub fn from_map(weights: BTreeMap<String, f64>) -> Result<Self> {
        if weights.is_empty() {
            return Err(DebateError::EmptyPillarSet);
        }
        for (pillar, &weight) in &weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(DebateError::InvalidWeights(format!(
                    "pillar '{pillar}' has weight {weight}"
                )));
            }
        }
        let sum: f64 = weights.values().sum();
        if (sum - 1.0).abs() > SUM_EPSILON {
            return Err(DebateError::InvalidWeights(format!(
                "weights sum to {sum}, expected 1.0"
            )));
        }
        Ok(Self { weights })
    }

    /// Returns the weight for a pillar, or 0.0 if absent.
    pub fn share(&self, pillar: &str) -> f64 {
        self.weights.get(pillar).copied().unwrap_or(0.0)
    }

    /// Returns the number of pillars.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Returns true if the vector is empty (never true for a validated
    /// instance).
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Returns the pillar names in order.
    pub fn pillars(&self) -> Vec<&str> {
        self.weights.keys().map(String::as_str).collect()
    }

    /// Iterates over (pillar, weight) pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Clones the underlying mapping.
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.weights.clone()
    }

    /// Normalized Shannon entropy of the distribution.
    ///
    /// `H(w) = −Σ w_i·ln(w_i) / ln(N)`, in [0, 1]. Defined as 1.0 for a
    /// single pillar, making the entropy guard vacuous there.
    pub fn normalized_entropy(&self) -> f64 {
        let n = self.weights.len();
        if n <= 1 {
            return 1.0;
        }
        let raw: f64 = self
            .weights
            .values()
            .filter(|&&w| w > 0.0)
            .map(|&w| -w * w.ln())
            .sum();
        raw / (n as f64).ln()
    }

    /// Blends this vector toward the uniform distribution.
    ///
    /// `w(α) = (1−α)·w + α·u`; α = 0 returns self, α = 1 returns uniform.
    pub fn blended_toward_uniform(&self, alpha: f64) -> Self {
        let uniform = 1.0 / self.weights.len() as f64;
        let weights = self
            .weights
            .iter()
            .map(|(pillar, &w)| (pillar.clone(), (1.0 - alpha) * w + alpha * uniform))
            .collect();
        Self { weights }
    }
}
