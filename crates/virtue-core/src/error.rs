//! Unified error type for the orchestrator facade.

use thiserror::Error;

/// Errors surfaced to orchestrator callers.
///
/// Runtime degradations (adapter timeouts, failed screening,
/// cancellation) never appear here; they are recorded in the session and
/// reflected in the response's termination reason. Only configuration
/// faults and component construction failures err.
#[derive(Debug, Error)]
pub enum VirtueError {
    /// The configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A pillar scorer or registry operation failed.
    #[error("scorer error: {0}")]
    Scorer(#[from] virtue_pillars::ScorerError),

    /// Watchdog construction failed.
    #[error("watchdog error: {0}")]
    Watchdog(#[from] virtue_watchdog::WatchdogError),

    /// Debate engine construction failed.
    #[error("debate error: {0}")]
    Debate(#[from] virtue_debate::DebateError),
}
