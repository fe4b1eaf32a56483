//! Error types for the debate engine.

use thiserror::Error;

/// Errors raised while constructing debate components.
///
/// All of these are configuration faults detected before any adapter
/// call. Runtime conditions (adapter timeouts, failed screening,
/// cancellation) are recorded in the session instead, never raised.
#[derive(Debug, Error)]
pub enum DebateError {
    /// No pillars were configured.
    #[error("no pillars configured for the debate")]
    EmptyPillarSet,

    /// A weight vector violates its invariants.
    #[error("invalid weight vector: {0}")]
    InvalidWeights(String),

    /// A debate setting is out of range.
    #[error("invalid {name}: {reason}")]
    InvalidSetting {
        /// Name of the offending setting.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The scorer set and the base weights name different pillars.
    #[error("pillar set mismatch: {0}")]
    PillarMismatch(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pillar_set_display() {
        assert!(DebateError::EmptyPillarSet.to_string().contains("no pillars"));
    }

    #[test]
    fn test_invalid_setting_display() {
        let err = DebateError::InvalidSetting {
            name: "entropy_floor".to_string(),
            reason: "1.5 is outside [0.0, 1.0]".to_string(),
        };
        assert!(err.to_string().contains("entropy_floor"));
        assert!(err.to_string().contains("1.5"));
    }
}
