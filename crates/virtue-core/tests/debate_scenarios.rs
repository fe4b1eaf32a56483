//! Debate scenarios: entropy guarding, escalation, recovery, determinism.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use virtue_debate::{
    DebateEngine, DebateSession, DebateSettings, ResponseSynthesizer, TerminationReason,
    VirtueWeightController, WeightVector,
};
use virtue_pillars::{Candidate, Confidence, PillarScorer, Query, SessionContext};
use virtue_watchdog::WatchdogGate;

/// Scorer with a per-round script of (answer, confidence) pairs.
///
/// The last entry repeats once the script runs out.
struct RoundScript {
    name: String,
    script: Vec<(&'static str, f64)>,
}

impl RoundScript {
    fn new(name: &str, script: Vec<(&'static str, f64)>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            script,
        })
    }
}

#[async_trait]
impl PillarScorer for RoundScript {
    fn name(&self) -> &str {
        &self.name
    }

    fn perspective(&self) -> &str {
        "scripted"
    }

    async fn score(&self, _query: &Query, ctx: &SessionContext) -> virtue_pillars::Result<Candidate> {
        let (answer, confidence) = self
            .script
            .get(ctx.round)
            .copied()
            .unwrap_or_else(|| *self.script.last().unwrap());
        Ok(Candidate::new(&self.name, answer, Confidence::new(confidence))
            .with_citation("kg://fixture/1"))
    }
}

fn engine_for(
    scorers: Vec<Arc<dyn PillarScorer>>,
    pillars: &[&str],
    settings: DebateSettings,
) -> DebateEngine {
    let names: Vec<String> = pillars.iter().map(|s| s.to_string()).collect();
    let controller =
        VirtueWeightController::new(WeightVector::uniform(&names).unwrap(), 0.8, 0.25).unwrap();
    let gate = WatchdogGate::new(0.35, 0.35).unwrap();
    DebateEngine::new(scorers, gate, controller, settings).unwrap()
}

fn fast_settings(max_rounds: usize, convergence: f64) -> DebateSettings {
    DebateSettings {
        max_rounds,
        convergence_threshold: convergence,
        scorer_timeout: Duration::from_millis(200),
        prompt_preamble: None,
    }
}

async fn run(engine: &mut DebateEngine, query: &str) -> DebateSession {
    engine.run(Query::new(query)).await
}

#[tokio::test]
async fn test_entropy_floor_holds_under_skewed_confidence() {
    let scorers: Vec<Arc<dyn PillarScorer>> = vec![
        RoundScript::new("Logic", vec![("strong answer", 0.9)]),
        RoundScript::new("Empathy", vec![("weak answer", 0.1)]),
        RoundScript::new("Authenticity", vec![("weak answer", 0.1)]),
    ];
    let mut engine = engine_for(
        scorers,
        &["Logic", "Empathy", "Authenticity"],
        fast_settings(3, 0.01),
    );

    let session = run(&mut engine, "q").await;
    assert_eq!(session.termination, Some(TerminationReason::MaxRounds));

    let weights = engine.current_weights();
    assert!(weights.normalized_entropy() >= 0.8 - 1e-6);
    let sum: f64 = weights.iter().map(|(_, w)| w).sum();
    assert!((sum - 1.0).abs() < 1e-6);
    for (_, weight) in weights.iter() {
        assert!(weight > 0.0);
    }
    // The floor flattens but does not erase the confidence ordering.
    assert!(weights.share("Logic") > weights.share("Empathy"));
}

#[tokio::test]
async fn test_debates_are_replay_deterministic() {
    let build = || {
        let scorers: Vec<Arc<dyn PillarScorer>> = vec![
            RoundScript::new("Logic", vec![("a", 0.9), ("a", 0.85)]),
            RoundScript::new("Empathy", vec![("b", 0.4), ("b", 0.8)]),
        ];
        engine_for(scorers, &["Logic", "Empathy"], fast_settings(5, 0.05))
    };

    let mut first = build();
    let mut second = build();
    let session_a = run(&mut first, "same query").await;
    let session_b = run(&mut second, "same query").await;

    assert_eq!(session_a.termination, session_b.termination);
    assert_eq!(session_a.round_count(), session_b.round_count());
    for (ra, rb) in session_a.rounds.iter().zip(&session_b.rounds) {
        assert_eq!(ra.weights.to_map(), rb.weights.to_map());
        assert_eq!(ra.disagreement, rb.disagreement);
    }
    assert_eq!(
        first.current_weights().to_map(),
        second.current_weights().to_map()
    );
}

#[tokio::test]
async fn test_disagreement_narrows_to_convergence() {
    let scorers: Vec<Arc<dyn PillarScorer>> = vec![
        RoundScript::new("Logic", vec![("a", 0.9), ("a", 0.9), ("a", 0.85)]),
        RoundScript::new("Empathy", vec![("b", 0.3), ("b", 0.6), ("b", 0.82)]),
    ];
    let mut engine = engine_for(scorers, &["Logic", "Empathy"], fast_settings(10, 0.05));

    let session = run(&mut engine, "q").await;
    assert_eq!(session.termination, Some(TerminationReason::Converged));
    assert_eq!(session.round_count(), 3);

    let gaps: Vec<f64> = session
        .rounds
        .iter()
        .map(|round| round.disagreement.unwrap())
        .collect();
    assert!(gaps.windows(2).all(|pair| pair[1] < pair[0]));
    assert!(*gaps.last().unwrap() <= 0.05);
}

#[tokio::test]
async fn test_single_failed_round_escalates_without_touching_weights() {
    // Round 0 trips the watchdog everywhere; round 1 is clean.
    let bad = "Studies show it is definitively proven, there is no doubt.";
    let scorers: Vec<Arc<dyn PillarScorer>> = vec![
        RoundScript::new("Logic", vec![(bad, 0.9), ("clean answer", 0.8)]),
        RoundScript::new("Empathy", vec![(bad, 0.9), ("clean answer", 0.78)]),
    ];
    let mut engine = engine_for(scorers, &["Logic", "Empathy"], fast_settings(10, 0.05));

    let session = run(&mut engine, "q").await;
    assert_eq!(session.termination, Some(TerminationReason::Converged));
    assert_eq!(session.round_count(), 2);

    assert!(session.rounds[0].all_failed());
    // The escalated round left the uniform base weights in place.
    let round1_hints: BTreeMap<String, f64> = session.rounds[1].weights.to_map();
    assert!((round1_hints["Logic"] - 0.5).abs() < 1e-9);
    assert!((round1_hints["Empathy"] - 0.5).abs() < 1e-9);
}

#[tokio::test]
async fn test_failed_pillar_never_gains_weight() {
    let scorers: Vec<Arc<dyn PillarScorer>> = vec![
        RoundScript::new("Logic", vec![("a", 0.9)]),
        RoundScript::new("Empathy", vec![("b", 0.7)]),
        RoundScript::new(
            "Authenticity",
            // Screened out every round.
            vec![("Everyone knows those people are never right.", 0.9)],
        ),
    ];
    let mut engine = engine_for(
        scorers,
        &["Logic", "Empathy", "Authenticity"],
        fast_settings(2, 0.01),
    );

    let session = run(&mut engine, "q").await;
    assert_eq!(session.termination, Some(TerminationReason::MaxRounds));

    let weights = engine.current_weights();
    assert!(weights.share("Authenticity") > 0.0);
    assert!(weights.share("Authenticity") < weights.share("Empathy"));
    assert!(weights.share("Authenticity") < weights.share("Logic"));
}

#[tokio::test]
async fn test_synthesis_ranks_by_weighted_confidence() {
    let scorers: Vec<Arc<dyn PillarScorer>> = vec![
        RoundScript::new("Logic", vec![("logical answer", 0.9), ("logical answer", 0.86)]),
        RoundScript::new("Empathy", vec![("warm answer", 0.5), ("warm answer", 0.88)]),
    ];
    let mut engine = engine_for(scorers, &["Logic", "Empathy"], fast_settings(10, 0.05));

    let session = run(&mut engine, "q").await;
    assert_eq!(session.termination, Some(TerminationReason::Converged));
    assert_eq!(session.round_count(), 2);

    let response = ResponseSynthesizer::new().synthesize(&session, engine.current_weights());
    // The final rebalance tracks the converged round, where Empathy edged
    // Logic out on both weight and confidence.
    assert_eq!(response.primary_pillar.as_deref(), Some("Empathy"));
    assert_eq!(response.answer.as_deref(), Some("warm answer"));
    assert_eq!(response.alternatives.len(), 1);
    assert_eq!(response.alternatives[0].pillar, "Logic");
    assert!(response.alternatives[0].score < engine.current_weights().share("Empathy") * 0.88);
}

#[tokio::test]
async fn test_abstained_session_synthesizes_refusal() {
    let bad = "Everyone knows those people are obviously inferior.";
    let scorers: Vec<Arc<dyn PillarScorer>> = vec![
        RoundScript::new("Logic", vec![(bad, 0.9)]),
        RoundScript::new("Empathy", vec![(bad, 0.9)]),
    ];
    let mut engine = engine_for(scorers, &["Logic", "Empathy"], fast_settings(10, 0.05));

    let session = run(&mut engine, "q").await;
    assert_eq!(session.termination, Some(TerminationReason::Abstained));

    let response = ResponseSynthesizer::new().synthesize(&session, engine.current_weights());
    assert!(response.is_refusal());
    assert!(response.answer.is_none());
    assert!(response.alternatives.is_empty());
    assert_eq!(response.termination, TerminationReason::Abstained);
}

#[tokio::test]
async fn test_safety_flags_surface_failed_screenings() {
    let scorers: Vec<Arc<dyn PillarScorer>> = vec![
        RoundScript::new("Logic", vec![("grounded answer", 0.85)]),
        RoundScript::new("Empathy", vec![("grounded reply", 0.83)]),
        RoundScript::new(
            "Authenticity",
            vec![("Studies show this, guaranteed.", 0.9)],
        ),
    ];
    let mut engine = engine_for(
        scorers,
        &["Logic", "Empathy", "Authenticity"],
        fast_settings(10, 0.05),
    );

    let session = run(&mut engine, "q").await;
    assert_eq!(session.termination, Some(TerminationReason::Converged));

    let response = ResponseSynthesizer::new().synthesize(&session, engine.current_weights());
    assert!(response.answer.is_some());
    assert!(response
        .safety_flags
        .iter()
        .any(|flag| flag.contains("fabricated_certainty")));
}
