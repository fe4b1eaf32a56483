//! Error types for the watchdog gate.

use thiserror::Error;

/// Errors raised while constructing watchdog components.
///
/// Evaluation itself is infallible; only misconfiguration errs, and it
/// errs before any candidate is screened.
#[derive(Debug, Error)]
pub enum WatchdogError {
    /// A screening threshold is outside [0.0, 1.0].
    #[error("invalid {name}: {value} is outside [0.0, 1.0]")]
    InvalidThreshold {
        /// Name of the offending threshold.
        name: String,
        /// The rejected value.
        value: f64,
    },
}
