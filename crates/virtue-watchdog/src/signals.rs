//! Pluggable signal scorers and the default lexical detectors.
//!
//! The default scorers are weighted pattern tables over the candidate's
//! answer text. They are deliberately simple: the gate's contract is the
//! control logic around the scores, not a concrete NLP algorithm, and a
//! deployment is expected to swap in its own detectors behind
//! [`SignalScorer`].

use regex::{Regex, RegexBuilder};
use virtue_pillars::Candidate;

/// Penalty applied to a long, factual-sounding answer with no citations.
const UNGROUNDED_PENALTY: f64 = 0.25;
/// Answer length (chars) above which the ungrounded penalty applies.
const UNGROUNDED_MIN_LEN: usize = 80;

/// A deterministic scorer for one screening signal.
///
/// Must be a pure function of the candidate: the same candidate and
/// configuration always produce the same score and reasons.
pub trait SignalScorer: Send + Sync {
    /// Returns the signal name (e.g., "hallucination").
    fn name(&self) -> &str;

    /// Scores a candidate, returning the signal strength in [0, 1] and
    /// the matched reasons.
    fn score(&self, candidate: &Candidate) -> (f64, Vec<String>);
}

/// A named, weighted trigger-phrase pattern.
#[derive(Debug, Clone)]
pub struct SignalPattern {
    /// Pattern name, reported as a reason when matched.
    pub name: String,
    /// Trigger phrases; any match activates the pattern.
    pub triggers: Vec<String>,
    /// Contribution to the signal score when matched.
    pub weight: f64,
}

impl SignalPattern {
    /// Creates a new pattern.
    pub fn new(name: impl Into<String>, triggers: Vec<&str>, weight: f64) -> Self {
        Self {
            name: name.into(),
            triggers: triggers.into_iter().map(String::from).collect(),
            weight,
        }
    }
}

/// A pattern compiled to case-insensitive word-boundary regexes.
struct CompiledPattern {
    name: String,
    regexes: Vec<Regex>,
    weight: f64,
}

impl CompiledPattern {
    fn compile(pattern: &SignalPattern) -> Self {
        let regexes = pattern
            .triggers
            .iter()
            .map(|trigger| {
                RegexBuilder::new(&format!(r"\b{}\b", regex::escape(trigger)))
                    .case_insensitive(true)
                    .build()
                    .expect("escaped trigger phrase always compiles")
            })
            .collect();
        Self {
            name: pattern.name.clone(),
            regexes,
            weight: pattern.weight,
        }
    }

    fn matches(&self, text: &str) -> bool {
        self.regexes.iter().any(|re| re.is_match(text))
    }
}

/// Scores matched pattern weights against text, capped at 1.0.
fn score_patterns(patterns: &[CompiledPattern], text: &str) -> (f64, Vec<String>) {
    let mut score = 0.0;
    let mut matched = Vec::new();
    for pattern in patterns {
        if pattern.matches(text) {
            score += pattern.weight;
            matched.push(pattern.name.clone());
        }
    }
    (score.min(1.0), matched)
}

/// Default hallucination detector.
///
/// Flags fabricated-certainty phrasing and penalizes long answers that
/// cite no knowledge-graph nodes at all.
pub struct HallucinationScorer {
    patterns: Vec<CompiledPattern>,
}

impl Default for HallucinationScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl HallucinationScorer {
    /// Creates the detector with its default pattern table.
    pub fn new() -> Self {
        Self::with_patterns(Self::default_patterns())
    }

    /// Creates the detector with a custom pattern table.
    pub fn with_patterns(patterns: Vec<SignalPattern>) -> Self {
        Self {
            patterns: patterns.iter().map(CompiledPattern::compile).collect(),
        }
    }

    fn default_patterns() -> Vec<SignalPattern> {
        vec![
            SignalPattern::new(
                "fabricated_certainty",
                vec![
                    "studies show",
                    "research proves",
                    "it is a well-known fact",
                    "experts agree",
                    "definitively proven",
                ],
                0.4,
            ),
            SignalPattern::new(
                "invented_attribution",
                vec![
                    "according to the report",
                    "as documented in",
                    "the official figures",
                ],
                0.35,
            ),
            SignalPattern::new(
                "overclaimed_precision",
                vec!["guaranteed", "with absolute certainty", "there is no doubt"],
                0.3,
            ),
        ]
    }
}

impl SignalScorer for HallucinationScorer {
    fn name(&self) -> &str {
        "hallucination"
    }

    fn score(&self, candidate: &Candidate) -> (f64, Vec<String>) {
        let (mut score, mut reasons) = score_patterns(&self.patterns, &candidate.answer);
        if !candidate.is_grounded() && candidate.answer.len() > UNGROUNDED_MIN_LEN {
            score = (score + UNGROUNDED_PENALTY).min(1.0);
            reasons.push("ungrounded_claim".to_string());
        }
        (score, reasons)
    }
}

/// Default bias detector.
///
/// Flags sweeping generalizations, absolutes, and loaded language.
pub struct BiasScorer {
    patterns: Vec<CompiledPattern>,
}

impl Default for BiasScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl BiasScorer {
    /// Creates the detector with its default pattern table.
    pub fn new() -> Self {
        Self::with_patterns(Self::default_patterns())
    }

    /// Creates the detector with a custom pattern table.
    pub fn with_patterns(patterns: Vec<SignalPattern>) -> Self {
        Self {
            patterns: patterns.iter().map(CompiledPattern::compile).collect(),
        }
    }

    fn default_patterns() -> Vec<SignalPattern> {
        vec![
            SignalPattern::new(
                "sweeping_generalization",
                vec![
                    "everyone knows",
                    "all of them are",
                    "people like that",
                    "those people",
                ],
                0.5,
            ),
            SignalPattern::new(
                "absolutes",
                vec!["always the case", "never true", "without exception"],
                0.3,
            ),
            SignalPattern::new(
                "loaded_language",
                vec!["obviously inferior", "clearly superior", "any sensible person"],
                0.4,
            ),
        ]
    }
}

impl SignalScorer for BiasScorer {
    fn name(&self) -> &str {
        "bias"
    }

    fn score(&self, candidate: &Candidate) -> (f64, Vec<String>) {
        score_patterns(&self.patterns, &candidate.answer)
    }
}
