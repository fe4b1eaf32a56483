//! Configuration types for the virtue orchestrator.
//!
//! Configuration is loaded once and treated as immutable afterwards;
//! switching domain templates means constructing a new engine from the
//! chosen template, never patching shared state.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::{Result, VirtueError};

/// Tolerance on a template's unit-sum weight invariant.
const WEIGHT_SUM_EPSILON: f64 = 1e-6;

/// Top-level orchestrator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Debate loop limits.
    pub debate: DebateLimits,

    /// Watchdog screening thresholds.
    pub watchdog: WatchdogThresholds,

    /// Weight controller settings.
    pub weights: WeightSettings,

    /// Available domain templates.
    pub templates: Vec<DomainTemplate>,

    /// Template used when a query names none.
    pub default_template: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            debate: DebateLimits::default(),
            watchdog: WatchdogThresholds::default(),
            weights: WeightSettings::default(),
            templates: vec![DomainTemplate::general()],
            default_template: "general".to_string(),
        }
    }
}

impl OrchestratorConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| VirtueError::Config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Looks up a template by name.
    pub fn template(&self, name: &str) -> Option<&DomainTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// Validates the configuration, failing fast before any session.
    ///
    /// # Errors
    /// Returns [`VirtueError::Config`] on the first violated invariant.
    pub fn validate(&self) -> Result<()> {
        if self.debate.max_rounds == 0 {
            return Err(VirtueError::Config("max_rounds must be at least 1".to_string()));
        }
        if self.debate.scorer_timeout_ms == 0 {
            return Err(VirtueError::Config("scorer_timeout_ms must be non-zero".to_string()));
        }
        if !self.debate.convergence_threshold.is_finite() || self.debate.convergence_threshold < 0.0
        {
            return Err(VirtueError::Config(
                "convergence_threshold must be a non-negative number".to_string(),
            ));
        }
        for &(name, value) in &[
            ("hallucination_threshold", self.watchdog.hallucination_threshold),
            ("bias_sensitivity", self.watchdog.bias_sensitivity),
            ("entropy_floor", self.weights.entropy_floor),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(VirtueError::Config(format!(
                    "{name} must be within [0.0, 1.0], got {value}"
                )));
            }
        }
        if !self.weights.temperature.is_finite() || self.weights.temperature <= 0.0 {
            return Err(VirtueError::Config(format!(
                "temperature must be positive, got {}",
                self.weights.temperature
            )));
        }

        if self.templates.is_empty() {
            return Err(VirtueError::Config("no domain templates configured".to_string()));
        }
        let mut names = BTreeSet::new();
        for template in &self.templates {
            if !names.insert(template.name.as_str()) {
                return Err(VirtueError::Config(format!(
                    "duplicate template '{}'",
                    template.name
                )));
            }
            template.validate()?;
        }
        if self.template(&self.default_template).is_none() {
            return Err(VirtueError::Config(format!(
                "default template '{}' is not defined",
                self.default_template
            )));
        }
        Ok(())
    }
}

/// Debate loop limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateLimits {
    /// Hard upper bound on debate rounds per session.
    pub max_rounds: usize,

    /// Disagreement at or below this converges the session.
    pub convergence_threshold: f64,

    /// Per-adapter deadline in milliseconds.
    pub scorer_timeout_ms: u64,
}

impl Default for DebateLimits {
    fn default() -> Self {
        Self {
            max_rounds: 10,
            convergence_threshold: 0.05,
            scorer_timeout_ms: 30_000,
        }
    }
}

/// Watchdog screening thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchdogThresholds {
    /// Candidates above this hallucination score fail screening.
    pub hallucination_threshold: f64,

    /// Candidates above this bias score fail screening.
    pub bias_sensitivity: f64,
}

impl Default for WatchdogThresholds {
    fn default() -> Self {
        Self {
            hallucination_threshold: 0.35,
            bias_sensitivity: 0.35,
        }
    }
}

/// Weight controller settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightSettings {
    /// Minimum normalized entropy of the weight vector (0.0 to 1.0).
    pub entropy_floor: f64,

    /// Softmax temperature for confidence-weighted rebalancing; lower
    /// concentrates weight faster.
    pub temperature: f64,
}

impl Default for WeightSettings {
    fn default() -> Self {
        Self {
            entropy_floor: 0.8,
            temperature: 0.25,
        }
    }
}

/// An immutable per-vertical specialization.
///
/// A template fixes the pillar set, its base weights, and an optional
/// prompt preamble for the scorers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainTemplate {
    /// Template name (e.g., "general", "medical").
    pub name: String,

    /// Base weights per pillar; must sum to 1.
    pub virtue_weights: BTreeMap<String, f64>,

    /// Optional preamble prepended to scorer prompts.
    pub prompt_preamble: Option<String>,
}

impl DomainTemplate {
    /// The built-in general-purpose template.
    pub fn general() -> Self {
        let mut virtue_weights = BTreeMap::new();
        virtue_weights.insert("Logic".to_string(), 0.34);
        virtue_weights.insert("Empathy".to_string(), 0.33);
        virtue_weights.insert("Authenticity".to_string(), 0.33);
        Self {
            name: "general".to_string(),
            virtue_weights,
            prompt_preamble: None,
        }
    }

    /// Returns the pillar names in order.
    pub fn pillars(&self) -> Vec<String> {
        self.virtue_weights.keys().cloned().collect()
    }

    fn validate(&self) -> Result<()> {
        if self.virtue_weights.is_empty() {
            return Err(VirtueError::Config(format!(
                "template '{}' has an empty pillar set",
                self.name
            )));
        }
        for (pillar, &weight) in &self.virtue_weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(VirtueError::Config(format!(
                    "template '{}': pillar '{pillar}' has weight {weight}",
                    self.name
                )));
            }
        }
        let sum: f64 = self.virtue_weights.values().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(VirtueError::Config(format!(
                "template '{}': weights sum to {sum}, expected 1.0",
                self.name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = OrchestratorConfig::default();
        config.validate().unwrap();
        assert_eq!(config.debate.max_rounds, 10);
        assert_eq!(config.default_template, "general");
        assert!((config.weights.entropy_floor - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_general_template_sums_to_one() {
        let template = DomainTemplate::general();
        let sum: f64 = template.virtue_weights.values().sum();
        assert!((sum - 1.0).abs() < WEIGHT_SUM_EPSILON);
        assert_eq!(template.pillars(), vec!["Authenticity", "Empathy", "Logic"]);
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let mut config = OrchestratorConfig::default();
        config.debate.max_rounds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_threshold_rejected() {
        let mut config = OrchestratorConfig::default();
        config.watchdog.hallucination_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_entropy_floor_rejected() {
        let mut config = OrchestratorConfig::default();
        config.weights.entropy_floor = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_template_list_rejected() {
        let mut config = OrchestratorConfig::default();
        config.templates.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_pillar_set_rejected() {
        let mut config = OrchestratorConfig::default();
        config.templates[0].virtue_weights.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("empty pillar set"));
    }

    #[test]
    fn test_non_unit_weight_sum_rejected() {
        let mut config = OrchestratorConfig::default();
        config.templates[0]
            .virtue_weights
            .insert("Logic".to_string(), 0.9);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sum"));
    }

    #[test]
    fn test_unknown_default_template_rejected() {
        let mut config = OrchestratorConfig::default();
        config.default_template = "missing".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_template_rejected() {
        let mut config = OrchestratorConfig::default();
        config.templates.push(DomainTemplate::general());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_from_json_round_trip() {
        let config = OrchestratorConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed = OrchestratorConfig::from_json(&json).unwrap();
        assert_eq!(parsed.default_template, "general");
        assert_eq!(parsed.templates.len(), 1);
    }

    #[test]
    fn test_from_json_invalid_document() {
        let err = OrchestratorConfig::from_json("{not json").unwrap_err();
        assert!(err.to_string().contains("parse"));
    }
}
