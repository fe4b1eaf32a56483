//! # Virtue Watchdog
//!
//! Per-candidate screening for hallucination and bias signals.
//!
//! Every candidate a pillar proposes passes through the [`WatchdogGate`]
//! before it may influence the weight vector or the final answer:
//!
//! ```text
//! passed = hallucination_score <= hallucination_threshold
//!       && bias_score          <= bias_sensitivity
//! ```
//!
//! Failed candidates are kept in the round record for audit but excluded
//! from weighting. Scoring is pluggable through the [`SignalScorer`] trait;
//! the default scorers are deterministic weighted pattern tables, a
//! stand-in for whatever NLP/ML detector the deployment wires in.

mod error;
mod gate;
mod signals;
mod verdict;

pub use error::WatchdogError;
pub use gate::WatchdogGate;
pub use signals::{BiasScorer, HallucinationScorer, SignalPattern, SignalScorer};
pub use verdict::{SignalScore, WatchdogVerdict};

/// Result type for watchdog operations.
pub type Result<T> = std::result::Result<T, WatchdogError>;
