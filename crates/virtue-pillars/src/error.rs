//! Error types for pillar scorer adapters.

use thiserror::Error;

/// Errors produced by pillar scorers and their backends.
///
/// Scorer errors are absorbed by the debate engine into sentinel
/// candidates; only registry misconfiguration surfaces before a session
/// starts.
#[derive(Debug, Error)]
pub enum ScorerError {
    /// The inference backend failed.
    #[error("inference backend error: {0}")]
    Backend(String),

    /// Knowledge retrieval failed.
    #[error("knowledge retrieval error: {0}")]
    Retrieval(String),

    /// A pillar name was registered twice.
    #[error("pillar '{0}' is already registered")]
    DuplicatePillar(String),

    /// A configured pillar has no registered implementation.
    #[error("no scorer registered for pillar '{0}'")]
    UnknownPillar(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        let err = ScorerError::Backend("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_unknown_pillar_display() {
        let err = ScorerError::UnknownPillar("Logic".to_string());
        assert!(err.to_string().contains("Logic"));
    }
}
