//! # Virtue Core
//!
//! Unified facade for virtue-weighted answer arbitration.
//! Orchestrates pillar scorers, the watchdog gate, and the debate engine.
//!
//! ## Pipeline
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                     VIRTUE ORCHESTRATOR                        │
//! ├────────────────────────────────────────────────────────────────┤
//! │                                                                │
//! │  query ──► Pillar Scorers (parallel fan-out, per-call timeout) │
//! │                 │                                              │
//! │                 ▼                                              │
//! │          Watchdog Gate (hallucination/bias screening)          │
//! │                 │                                              │
//! │                 ▼                                              │
//! │          Debate Engine (bounded rounds, entropy-guarded        │
//! │                 │       weight rebalancing)                    │
//! │                 ▼                                              │
//! │          Response Synthesizer ──► Response                     │
//! │                                                                │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use virtue_core::{OrchestratorConfig, QueryOptions, VirtueOrchestrator};
//! use virtue_pillars::PillarRegistry;
//!
//! let orchestrator = VirtueOrchestrator::new(OrchestratorConfig::default(), registry)?;
//! let response = orchestrator.query("Why is the sky blue?", QueryOptions::default()).await?;
//! match response.answer {
//!     Some(answer) => println!("{answer}"),
//!     None => println!("abstained: {}", response.termination),
//! }
//! ```
//!
//! ## Guarantees
//!
//! - Misconfiguration (empty pillar set, weights not summing to 1, bad
//!   thresholds) is rejected at construction, before any adapter call.
//! - Sessions are independent and may run fully in parallel; nothing
//!   mutable is shared between them.
//! - Every session terminates within `max_rounds`; abstention and
//!   cancellation are first-class outcomes, not errors.

mod config;
mod error;
mod orchestrator;

pub use config::{DebateLimits, DomainTemplate, OrchestratorConfig, WatchdogThresholds, WeightSettings};
pub use error::VirtueError;
pub use orchestrator::{QueryOptions, VirtueOrchestrator};

// Re-export component types for convenience
pub use virtue_debate::{
    DebateSession, Response, TerminationReason, VirtueWeightController, WeightVector,
};
pub use virtue_pillars::{
    BackendPillar, Candidate, Confidence, InferenceBackend, KnowledgeRetriever, PillarRegistry,
    PillarScorer, Query,
};
pub use virtue_watchdog::{WatchdogGate, WatchdogVerdict};

/// Core result type for orchestrator operations.
pub type Result<T> = std::result::Result<T, VirtueError>;
