//! Response synthesis from a terminated session.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::debug;
use virtue_pillars::Candidate;

use crate::response::{Alternative, Response};
use crate::session::{DebateSession, TerminationReason};
use crate::weights::WeightVector;

/// Merges a terminated session's surviving candidates into one response.
///
/// The primary answer is the passed candidate of the winning round that
/// maximizes `weight(pillar) × confidence` (ties broken by pillar name);
/// the rest become ordered alternatives. Abstained and cancelled sessions
/// pass their refusal through untouched; the synthesizer never invents
/// an answer.
#[derive(Debug, Default)]
pub struct ResponseSynthesizer;

impl ResponseSynthesizer {
    /// Creates a synthesizer.
    pub fn new() -> Self {
        Self
    }

    /// Synthesizes the response for a terminated session.
    ///
    /// `final_weights` is the vector produced by the last rebalance (the
    /// base weights when no round ever survived).
    pub fn synthesize(&self, session: &DebateSession, final_weights: &WeightVector) -> Response {
        let termination = session.termination.unwrap_or(TerminationReason::Abstained);
        let rounds = session.round_count();
        let scores = final_weights.to_map();

        match termination {
            TerminationReason::Abstained | TerminationReason::Cancelled => {
                debug!(session = %session.id, %termination, "passing refusal through");
                Response::refusal(termination, scores, rounds)
            }
            TerminationReason::Converged | TerminationReason::MaxRounds => {
                let Some(winning) = session.last_surviving_round() else {
                    // A converged/max-rounds session always has a
                    // surviving round; refuse rather than fabricate if a
                    // caller hands us one that does not.
                    return Response::refusal(termination, scores, rounds);
                };

                let mut ranked: Vec<(f64, &Candidate)> = winning
                    .passed()
                    .map(|(candidate, _)| {
                        let score =
                            final_weights.share(&candidate.pillar) * candidate.confidence.value();
                        (score, candidate)
                    })
                    .collect();
                ranked.sort_by(|a, b| {
                    b.0.partial_cmp(&a.0)
                        .unwrap_or(Ordering::Equal)
                        .then_with(|| a.1.pillar.cmp(&b.1.pillar))
                });

                let (_, primary) = ranked[0];
                let alternatives = ranked[1..]
                    .iter()
                    .map(|(score, candidate)| Alternative {
                        pillar: candidate.pillar.clone(),
                        answer: candidate.answer.clone(),
                        confidence: candidate.confidence.value(),
                        score: *score,
                    })
                    .collect();

                Response {
                    answer: Some(primary.answer.clone()),
                    primary_pillar: Some(primary.pillar.clone()),
                    alternatives,
                    virtue_scores: scores,
                    safety_flags: Self::collect_flags(winning.verdicts.iter().flat_map(|v| &v.reasons)),
                    debate_rounds: rounds,
                    termination,
                }
            }
        }
    }

    /// Deduplicates reasons while preserving first-seen order.
    fn collect_flags<'a>(reasons: impl Iterator<Item = &'a String>) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut flags = Vec::new();
        for reason in reasons {
            if seen.insert(reason.clone()) {
                flags.push(reason.clone());
            }
        }
        flags
    }
}
