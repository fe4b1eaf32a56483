//! External collaborator interfaces and the generic backend adapter.
//!
//! The inference backend and knowledge retriever are external subsystems
//! (quantized models, Neo4j/FAISS). Only their data contracts are defined
//! here; [`BackendPillar`] adapts any pair of them into a [`PillarScorer`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::{Candidate, Confidence, PillarScorer, Query, Result, SessionContext};

/// Maximum retrieved nodes folded into a prompt.
const MAX_GROUNDING_NODES: usize = 5;

/// Output of a model inference call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inference {
    /// Generated answer text.
    pub text: String,
    /// Backend-reported confidence; not trusted to stay in [0, 1].
    pub confidence: f64,
}

/// One node returned by knowledge-graph/vector retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedNode {
    /// Knowledge-graph node identifier.
    pub node_id: String,
    /// Node text used for grounding.
    pub text: String,
    /// Retrieval relevance score.
    pub score: f64,
}

/// Model inference backend interface.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Runs inference over a prompt with optional grounding context.
    async fn infer(&self, prompt: &str, context: &[RetrievedNode]) -> Result<Inference>;
}

/// Knowledge-graph/vector retrieval interface.
#[async_trait]
pub trait KnowledgeRetriever: Send + Sync {
    /// Retrieves grounding nodes for a query, best first.
    async fn retrieve(&self, query: &Query) -> Result<Vec<RetrievedNode>>;
}

/// Generic pillar adapter over an inference backend and optional retriever.
///
/// Builds a perspective-specific prompt, grounds it with retrieved nodes,
/// and maps the inference output onto a [`Candidate`] that cites the nodes
/// it was grounded on.
pub struct BackendPillar {
    name: String,
    perspective: String,
    /// Prompt template; `{query}` is substituted with the query text.
    prompt_template: String,
    backend: Arc<dyn InferenceBackend>,
    retriever: Option<Arc<dyn KnowledgeRetriever>>,
}

impl BackendPillar {
    /// Creates a pillar over an inference backend.
    pub fn new(
        name: impl Into<String>,
        perspective: impl Into<String>,
        backend: Arc<dyn InferenceBackend>,
    ) -> Self {
        let perspective = perspective.into();
        Self {
            name: name.into(),
            prompt_template: format!("From the {perspective} perspective, answer: {{query}}"),
            perspective,
            backend,
            retriever: None,
        }
    }

    /// Overrides the prompt template (`{query}` placeholder).
    pub fn with_prompt(mut self, template: impl Into<String>) -> Self {
        self.prompt_template = template.into();
        self
    }

    /// Attaches a knowledge retriever for grounding.
    pub fn with_retriever(mut self, retriever: Arc<dyn KnowledgeRetriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    fn build_prompt(&self, query: &Query, ctx: &SessionContext) -> String {
        let mut prompt = String::new();
        if let Some(preamble) = &ctx.preamble {
            prompt.push_str(preamble);
            prompt.push('\n');
        }
        prompt.push_str(&self.prompt_template.replace("{query}", &query.text));
        if let Some(domain) = &query.domain {
            prompt.push_str(&format!("\nDomain: {domain}"));
        }
        if ctx.round > 0 && ctx.is_underweighted(&self.name) {
            // Re-prompt hint: the debate has been discounting this pillar.
            prompt.push_str(&format!(
                "\nSharpen the {} perspective; prior rounds weighted it below average.",
                self.perspective
            ));
        }
        prompt
    }
}

#[async_trait]
impl PillarScorer for BackendPillar {
    fn name(&self) -> &str {
        &self.name
    }

    fn perspective(&self) -> &str {
        &self.perspective
    }

    async fn score(&self, query: &Query, ctx: &SessionContext) -> Result<Candidate> {
        let mut nodes = Vec::new();
        if let Some(retriever) = &self.retriever {
            nodes = retriever.retrieve(query).await?;
            nodes.truncate(MAX_GROUNDING_NODES);
            debug!(pillar = %self.name, nodes = nodes.len(), "retrieved grounding nodes");
        }

        let prompt = self.build_prompt(query, ctx);
        let inference = self.backend.infer(&prompt, &nodes).await?;

        let mut candidate = Candidate::new(
            &self.name,
            inference.text,
            Confidence::clamped(inference.confidence),
        )
        .with_rationale_step(format!("{} perspective, round {}", self.perspective, ctx.round));

        if !nodes.is_empty() {
            candidate = candidate
                .with_rationale_step(format!("grounded on {} retrieved nodes", nodes.len()));
        }
        for node in &nodes {
            candidate = candidate.with_citation(&node.node_id);
        }
        Ok(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScorerError;
    use std::collections::BTreeMap;

    struct FixedBackend {
        answer: &'static str,
        confidence: f64,
    }

    #[async_trait]
    impl InferenceBackend for FixedBackend {
        async fn infer(&self, _prompt: &str, _context: &[RetrievedNode]) -> Result<Inference> {
            Ok(Inference {
                text: self.answer.to_string(),
                confidence: self.confidence,
            })
        }
    }

    struct FixedRetriever;

    #[async_trait]
    impl KnowledgeRetriever for FixedRetriever {
        async fn retrieve(&self, _query: &Query) -> Result<Vec<RetrievedNode>> {
            Ok(vec![
                RetrievedNode {
                    node_id: "kg://rayleigh".to_string(),
                    text: "Rayleigh scattering".to_string(),
                    score: 0.95,
                },
                RetrievedNode {
                    node_id: "kg://atmosphere".to_string(),
                    text: "Atmospheric composition".to_string(),
                    score: 0.80,
                },
            ])
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl InferenceBackend for FailingBackend {
        async fn infer(&self, _prompt: &str, _context: &[RetrievedNode]) -> Result<Inference> {
            Err(ScorerError::Backend("model unavailable".to_string()))
        }
    }

    fn ctx(round: usize) -> SessionContext {
        SessionContext::new(round, BTreeMap::new())
    }

    #[tokio::test]
    async fn test_backend_pillar_scores() {
        let pillar = BackendPillar::new(
            "Logic",
            "logical",
            Arc::new(FixedBackend {
                answer: "Rayleigh scattering",
                confidence: 0.9,
            }),
        );
        let candidate = pillar.score(&Query::new("Why is the sky blue?"), &ctx(0)).await.unwrap();
        assert_eq!(candidate.pillar, "Logic");
        assert_eq!(candidate.answer, "Rayleigh scattering");
        assert!((candidate.confidence.value() - 0.9).abs() < f64::EPSILON);
        assert!(!candidate.timed_out);
    }

    #[tokio::test]
    async fn test_backend_pillar_clamps_confidence() {
        let pillar = BackendPillar::new(
            "Logic",
            "logical",
            Arc::new(FixedBackend {
                answer: "sure",
                confidence: 3.7,
            }),
        );
        let candidate = pillar.score(&Query::new("q"), &ctx(0)).await.unwrap();
        assert!((candidate.confidence.value() - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_backend_pillar_cites_retrieved_nodes() {
        let pillar = BackendPillar::new(
            "Authenticity",
            "evidence-grounded",
            Arc::new(FixedBackend {
                answer: "scattering",
                confidence: 0.8,
            }),
        )
        .with_retriever(Arc::new(FixedRetriever));

        let candidate = pillar.score(&Query::new("why blue"), &ctx(0)).await.unwrap();
        assert!(candidate.citations.contains("kg://rayleigh"));
        assert!(candidate.citations.contains("kg://atmosphere"));
        assert!(candidate.is_grounded());
    }

    #[tokio::test]
    async fn test_backend_pillar_propagates_backend_error() {
        let pillar = BackendPillar::new("Logic", "logical", Arc::new(FailingBackend));
        let result = pillar.score(&Query::new("q"), &ctx(0)).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_preamble_prepended_to_prompt() {
        let pillar = BackendPillar::new(
            "Logic",
            "logical",
            Arc::new(FixedBackend {
                answer: "a",
                confidence: 0.5,
            }),
        );
        let ctx = ctx(0).with_preamble("You are advising a clinician.");
        let prompt = pillar.build_prompt(&Query::new("q"), &ctx);
        assert!(prompt.starts_with("You are advising a clinician.\n"));
        assert!(prompt.contains("answer: q"));
    }

    #[test]
    fn test_underweight_reprompt_appended() {
        let pillar = BackendPillar::new(
            "Empathy",
            "empathic",
            Arc::new(FixedBackend {
                answer: "a",
                confidence: 0.5,
            }),
        );
        let mut hint = BTreeMap::new();
        hint.insert("Empathy".to_string(), 0.1);
        hint.insert("Logic".to_string(), 0.9);
        let ctx = SessionContext::new(1, hint);
        let prompt = pillar.build_prompt(&Query::new("q"), &ctx);
        assert!(prompt.contains("Sharpen the empathic perspective"));
    }
}
