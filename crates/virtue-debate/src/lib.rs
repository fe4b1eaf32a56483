//! # Virtue Debate
//!
//! The multi-round deliberation core of the virtue arbiter.
//!
//! A debate session walks an explicit state machine:
//!
//! ```text
//! COLLECTING ──► SCREENING ──► WEIGHING ──► { CONVERGED | MAX_ROUNDS }
//!     ▲              │             │
//!     │              ▼             │
//!     └───────── ESCALATING ◄──────┘
//!                    │
//!                    ▼
//!                ABSTAINED
//! ```
//!
//! - **COLLECTING** fans the query out to every pillar scorer
//!   concurrently, barrier-waiting with a per-adapter timeout.
//! - **SCREENING** runs the watchdog gate over each candidate.
//! - **WEIGHING** rebalances the virtue weight vector under the entropy
//!   guard and checks convergence.
//! - An all-fail round **escalates** (weights untouched); two all-fail
//!   rounds in a row **abstain** the session, a first-class outcome rather
//!   than an error.
//!
//! The engine always terminates within `max_rounds`, and a session may be
//! cancelled at the COLLECTING→SCREENING boundary. The
//! [`ResponseSynthesizer`] folds the surviving candidates of the winning
//! round into a single [`Response`] with full observability metadata.

mod controller;
mod engine;
mod error;
mod response;
mod session;
mod synthesizer;
mod weights;

pub use controller::VirtueWeightController;
pub use engine::{DebateEngine, DebateSettings};
pub use error::DebateError;
pub use response::{Alternative, Response};
pub use session::{DebateRound, DebateSession, TerminationReason};
pub use synthesizer::ResponseSynthesizer;
pub use weights::WeightVector;

/// Result type for debate operations.
pub type Result<T> = std::result::Result<T, DebateError>;
