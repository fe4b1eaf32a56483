//! The debate engine state machine.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use virtue_pillars::{Candidate, PillarScorer, Query, SessionContext};
use virtue_watchdog::WatchdogGate;

use crate::controller::VirtueWeightController;
use crate::session::{DebateRound, DebateSession, TerminationReason};
use crate::weights::WeightVector;
use crate::{DebateError, Result};

/// Round and timing limits for a debate.
#[derive(Debug, Clone)]
pub struct DebateSettings {
    /// Hard upper bound on debate rounds.
    pub max_rounds: usize,
    /// Disagreement at or below this converges the session.
    pub convergence_threshold: f64,
    /// Per-adapter deadline for one scoring call.
    pub scorer_timeout: Duration,
    /// Domain-template preamble handed to the scorers each round.
    pub prompt_preamble: Option<String>,
}

impl Default for DebateSettings {
    fn default() -> Self {
        Self {
            max_rounds: 10,
            convergence_threshold: 0.05,
            scorer_timeout: Duration::from_secs(30),
            prompt_preamble: None,
        }
    }
}

/// Consecutive all-fail rounds that abstain a session.
const ABSTAIN_AFTER_FAILED_ROUNDS: usize = 2;

/// Drives one debate session through its state machine:
///
/// `COLLECTING → SCREENING → WEIGHING → {CONVERGED | ESCALATING | ABSTAINED}`
///
/// The engine owns session-scoped state (the weight controller) and is
/// built fresh per query; nothing here is shared across sessions.
/// Termination within `max_rounds` is guaranteed by construction.
pub struct DebateEngine {
    scorers: Vec<Arc<dyn PillarScorer>>,
    gate: WatchdogGate,
    controller: VirtueWeightController,
    settings: DebateSettings,
}

impl DebateEngine {
    /// Creates an engine for one session.
    ///
    /// # Errors
    /// Fails fast, before any adapter call, on an empty scorer set, a
    /// scorer set that does not match the base weight vector's pillars,
    /// or degenerate settings.
    pub fn new(
        scorers: Vec<Arc<dyn PillarScorer>>,
        gate: WatchdogGate,
        controller: VirtueWeightController,
        settings: DebateSettings,
    ) -> Result<Self> {
        if scorers.is_empty() {
            return Err(DebateError::EmptyPillarSet);
        }
        if settings.max_rounds == 0 {
            return Err(DebateError::InvalidSetting {
                name: "max_rounds".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if !settings.convergence_threshold.is_finite() || settings.convergence_threshold < 0.0 {
            return Err(DebateError::InvalidSetting {
                name: "convergence_threshold".to_string(),
                reason: format!("{} is not a non-negative number", settings.convergence_threshold),
            });
        }
        if settings.scorer_timeout.is_zero() {
            return Err(DebateError::InvalidSetting {
                name: "scorer_timeout".to_string(),
                reason: "must be non-zero".to_string(),
            });
        }

        let weighted = controller.initial();
        for scorer in &scorers {
            if !weighted.pillars().contains(&scorer.name()) {
                return Err(DebateError::PillarMismatch(format!(
                    "scorer '{}' has no base weight",
                    scorer.name()
                )));
            }
        }
        if weighted.len() != scorers.len() {
            return Err(DebateError::PillarMismatch(format!(
                "{} base weights for {} scorers",
                weighted.len(),
                scorers.len()
            )));
        }

        Ok(Self {
            scorers,
            gate,
            controller,
            settings,
        })
    }

    /// Returns the weight vector after the most recent rebalance.
    pub fn current_weights(&self) -> &WeightVector {
        self.controller.current()
    }

    /// Runs a debate to termination.
    pub async fn run(&mut self, query: Query) -> DebateSession {
        // A session without a caller-held cancel handle can never cancel.
        let (_tx, rx) = watch::channel(false);
        self.run_cancellable(query, rx).await
    }

    /// Runs a debate that the caller may cancel.
    ///
    /// Cancellation is honored at the COLLECTING→SCREENING boundary:
    /// in-flight adapter results are discarded and the session terminates
    /// with [`TerminationReason::Cancelled`], never merged into Abstained.
    pub async fn run_cancellable(
        &mut self,
        query: Query,
        cancel: watch::Receiver<bool>,
    ) -> DebateSession {
        let mut session = DebateSession::new(query);
        let mut weights = self.controller.initial();
        let mut consecutive_failed_rounds = 0;

        info!(session = %session.id, pillars = self.scorers.len(), "debate session started");

        for round_index in 0..self.settings.max_rounds {
            // COLLECTING
            debug!(session = %session.id, round = round_index, "collecting candidates");
            let mut ctx = SessionContext::new(round_index, weights.to_map());
            ctx.preamble = self.settings.prompt_preamble.clone();
            let candidates = self.collect(&session.query, &ctx).await;

            if *cancel.borrow() {
                info!(session = %session.id, round = round_index, "session cancelled; discarding round");
                session.terminate(TerminationReason::Cancelled);
                return session;
            }

            // SCREENING
            let verdicts: Vec<_> = candidates
                .iter()
                .map(|candidate| self.gate.evaluate(candidate))
                .collect();
            let round = DebateRound::new(round_index, candidates, verdicts, weights.clone());

            if round.all_failed() {
                // ESCALATING: weights untouched, next round proceeds.
                consecutive_failed_rounds += 1;
                warn!(
                    session = %session.id,
                    round = round_index,
                    strikes = consecutive_failed_rounds,
                    "all candidates failed screening, escalating"
                );
                session.push_round(round);
                if consecutive_failed_rounds >= ABSTAIN_AFTER_FAILED_ROUNDS {
                    info!(session = %session.id, "abstaining: no reliable answer");
                    session.terminate(TerminationReason::Abstained);
                    return session;
                }
                continue;
            }
            consecutive_failed_rounds = 0;

            // WEIGHING
            weights = self.controller.rebalance(&round);
            let disagreement = round.disagreement;
            debug!(
                session = %session.id,
                round = round_index,
                passed = round.passed_count(),
                ?disagreement,
                "round weighed"
            );
            session.push_round(round);

            if let Some(d) = disagreement {
                if d <= self.settings.convergence_threshold {
                    info!(session = %session.id, round = round_index, disagreement = d, "converged");
                    session.terminate(TerminationReason::Converged);
                    return session;
                }
            }
        }

        // Round budget exhausted.
        if session.last_surviving_round().is_some() {
            info!(session = %session.id, "round budget exhausted without convergence");
            session.terminate(TerminationReason::MaxRounds);
        } else {
            info!(session = %session.id, "round budget exhausted with no surviving candidates");
            session.terminate(TerminationReason::Abstained);
        }
        session
    }

    /// Fans the query out to all scorers and barrier-waits.
    ///
    /// Each adapter gets its own deadline; a timeout or error is absorbed
    /// into a sentinel candidate so one slow pillar can never stall or
    /// abort the session. Candidate order follows scorer order regardless
    /// of completion order.
    async fn collect(&self, query: &Query, ctx: &SessionContext) -> Vec<Candidate> {
        let mut tasks = JoinSet::new();
        for (slot, scorer) in self.scorers.iter().enumerate() {
            let scorer = Arc::clone(scorer);
            let query = query.clone();
            let ctx = ctx.clone();
            let deadline = self.settings.scorer_timeout;
            tasks.spawn(async move {
                let candidate = match tokio::time::timeout(deadline, scorer.score(&query, &ctx)).await
                {
                    Ok(Ok(candidate)) => candidate,
                    Ok(Err(err)) => {
                        warn!(pillar = scorer.name(), %err, "scorer failed");
                        Candidate::sentinel(scorer.name(), format!("scorer error: {err}"))
                    }
                    Err(_) => {
                        warn!(pillar = scorer.name(), ?deadline, "scorer timed out");
                        Candidate::timed_out(scorer.name())
                    }
                };
                (slot, candidate)
            });
        }

        let mut slots: Vec<Option<Candidate>> = vec![None; self.scorers.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((slot, candidate)) => slots[slot] = Some(candidate),
                Err(err) => warn!(%err, "scorer task aborted"),
            }
        }
        slots
            .into_iter()
            .enumerate()
            .map(|(slot, candidate)| {
                candidate.unwrap_or_else(|| {
                    Candidate::sentinel(self.scorers[slot].name(), "scorer task aborted")
                })
            })
            .collect()
    }
}
