//! Debate session and round records.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use virtue_pillars::{Candidate, Query};
use virtue_watchdog::WatchdogVerdict;

use crate::weights::WeightVector;

/// Why a debate session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    /// Passed candidates agreed within the convergence threshold.
    Converged,
    /// No candidate met the safety/quality bar; the response is a refusal.
    Abstained,
    /// The round budget was exhausted before convergence.
    MaxRounds,
    /// The caller cancelled the session between rounds.
    Cancelled,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReason::Converged => write!(f, "CONVERGED"),
            TerminationReason::Abstained => write!(f, "ABSTAINED"),
            TerminationReason::MaxRounds => write!(f, "MAX_ROUNDS"),
            TerminationReason::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// One collect→screen→reweigh iteration.
///
/// Candidates and verdicts are parallel vectors: `verdicts[i]` judges
/// `candidates[i]`. The stored weight vector is the one in force when the
/// round was collected (the hint the scorers saw).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateRound {
    /// Zero-based round index.
    pub index: usize,
    /// All candidates collected this round, sentinels included.
    pub candidates: Vec<Candidate>,
    /// One verdict per candidate, same order.
    pub verdicts: Vec<WatchdogVerdict>,
    /// Weight vector in force during collection.
    pub weights: WeightVector,
    /// Max − min confidence among passed candidates; `None` below two
    /// passed candidates, which never converges.
    pub disagreement: Option<f64>,
}

impl DebateRound {
    /// Creates a round record, computing the disagreement metric.
    ///
    /// # Panics
    /// Panics if candidates and verdicts differ in length; the engine
    /// always produces them pairwise.
    pub fn new(
        index: usize,
        candidates: Vec<Candidate>,
        verdicts: Vec<WatchdogVerdict>,
        weights: WeightVector,
    ) -> Self {
        assert_eq!(
            candidates.len(),
            verdicts.len(),
            "every candidate needs exactly one verdict"
        );
        let mut round = Self {
            index,
            candidates,
            verdicts,
            weights,
            disagreement: None,
        };
        round.disagreement = round.compute_disagreement();
        round
    }

    fn compute_disagreement(&self) -> Option<f64> {
        let confidences: Vec<f64> = self
            .passed()
            .map(|(candidate, _)| candidate.confidence.value())
            .collect();
        if confidences.len() < 2 {
            return None;
        }
        let max = confidences.iter().cloned().fold(f64::MIN, f64::max);
        let min = confidences.iter().cloned().fold(f64::MAX, f64::min);
        Some(max - min)
    }

    /// Iterates over candidates that passed screening, with their verdicts.
    pub fn passed(&self) -> impl Iterator<Item = (&Candidate, &WatchdogVerdict)> {
        self.candidates
            .iter()
            .zip(self.verdicts.iter())
            .filter(|(_, verdict)| verdict.passed)
    }

    /// Returns the number of candidates that passed screening.
    pub fn passed_count(&self) -> usize {
        self.passed().count()
    }

    /// Returns true if every candidate failed screening.
    pub fn all_failed(&self) -> bool {
        self.passed_count() == 0
    }
}

/// A complete debate over one query.
///
/// Rounds are append-only and chronological; the session is terminated
/// exactly once. Sessions are independent: nothing in here is shared
/// across concurrent queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateSession {
    /// Unique session identifier (for audit logs).
    pub id: Uuid,
    /// The immutable query under debate.
    pub query: Query,
    /// Chronological round records.
    pub rounds: Vec<DebateRound>,
    /// Set once when the session ends.
    pub termination: Option<TerminationReason>,
}

impl DebateSession {
    /// Opens a session for a query.
    pub fn new(query: Query) -> Self {
        Self {
            id: Uuid::new_v4(),
            query,
            rounds: Vec::new(),
            termination: None,
        }
    }

    /// Appends a completed round.
    pub fn push_round(&mut self, round: DebateRound) {
        self.rounds.push(round);
    }

    /// Returns the number of rounds recorded so far.
    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    /// Returns the latest round in which at least one candidate passed
    /// screening, the round a response is synthesized from.
    pub fn last_surviving_round(&self) -> Option<&DebateRound> {
        self.rounds.iter().rev().find(|round| !round.all_failed())
    }

    /// Marks the session terminated.
    ///
    /// # Panics
    /// Panics if the session was already terminated; the engine
    /// terminates each session exactly once.
    pub fn terminate(&mut self, reason: TerminationReason) {
        assert!(
            self.termination.is_none(),
            "session terminated twice: {:?} then {:?}",
            self.termination,
            reason
        );
        self.termination = Some(reason);
    }
}
