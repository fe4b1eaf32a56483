//! Virtue CLI - Command-line interface for the virtue arbitration engine

use std::fs;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use clap::Parser;
use virtue_core::{
    BackendPillar, InferenceBackend, KnowledgeRetriever, OrchestratorConfig, PillarRegistry,
    QueryOptions, VirtueOrchestrator,
};
use virtue_pillars::{Inference, Query, RetrievedNode};

#[derive(Parser)]
#[command(name = "virtue")]
#[command(about = "Virtue Engine - Multi-pillar answer arbitration with bounded debate")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Arbitrate a query across the demo pillars
    Query {
        /// The question to arbitrate
        text: String,
        /// Domain template to arbitrate under
        #[arg(short, long)]
        template: Option<String>,
        /// Configuration file path (JSON); built-in defaults when omitted
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Check configuration validity
    Check {
        /// Configuration file path (JSON)
        #[arg(short, long, default_value = "config/virtue.json")]
        config: String,
    },
    /// List the configured domain templates
    Templates {
        /// Configuration file path (JSON); built-in defaults when omitted
        #[arg(short, long)]
        config: Option<String>,
    },
}

/// Deterministic demo backend: canned answers per perspective so the
/// full pipeline can run without a model server attached.
struct DemoBackend {
    perspective: &'static str,
    answer: &'static str,
    confidence: f64,
}

#[async_trait]
impl InferenceBackend for DemoBackend {
    async fn infer(
        &self,
        _prompt: &str,
        context: &[RetrievedNode],
    ) -> virtue_pillars::Result<Inference> {
        let text = if context.is_empty() {
            self.answer.to_string()
        } else {
            format!("{} ({} perspective)", self.answer, self.perspective)
        };
        Ok(Inference {
            text,
            confidence: self.confidence,
        })
    }
}

struct DemoRetriever;

#[async_trait]
impl KnowledgeRetriever for DemoRetriever {
    async fn retrieve(&self, query: &Query) -> virtue_pillars::Result<Vec<RetrievedNode>> {
        Ok(vec![RetrievedNode {
            node_id: format!("kg://demo/{}", query.text.len()),
            text: query.text.clone(),
            score: 0.9,
        }])
    }
}

fn demo_registry() -> anyhow::Result<PillarRegistry> {
    let retriever: Arc<dyn KnowledgeRetriever> = Arc::new(DemoRetriever);
    let pillars = [
        ("Logic", "logical", "The evidence points to a single consistent explanation.", 0.84),
        ("Empathy", "empathic", "Consider how the answer lands for the person asking.", 0.80),
        ("Authenticity", "evidence-grounded", "Here is what the available sources actually support.", 0.82),
    ];

    let mut registry = PillarRegistry::new();
    for (name, perspective, answer, confidence) in pillars {
        let pillar = BackendPillar::new(
            name,
            perspective,
            Arc::new(DemoBackend {
                perspective,
                answer,
                confidence,
            }),
        )
        .with_retriever(Arc::clone(&retriever));
        registry.register(Arc::new(pillar))?;
    }
    Ok(registry)
}

fn load_config(path: Option<&str>) -> anyhow::Result<OrchestratorConfig> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file: {path}"))?;
            Ok(OrchestratorConfig::from_json(&json)?)
        }
        None => Ok(OrchestratorConfig::default()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt::init();

    match cli.command {
        Some(Commands::Query {
            text,
            template,
            config,
        }) => {
            let config = load_config(config.as_deref())?;
            let orchestrator = VirtueOrchestrator::new(config, demo_registry()?)?;

            let mut options = QueryOptions::default();
            if let Some(template) = template {
                options = options.with_template(template);
            }
            let response = orchestrator.query(&text, options).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Some(Commands::Check { config }) => {
            let json = fs::read_to_string(&config)
                .with_context(|| format!("failed to read config file: {config}"))?;
            OrchestratorConfig::from_json(&json)?;
            println!("Config OK: {config}");
        }
        Some(Commands::Templates { config }) => {
            let config = load_config(config.as_deref())?;
            for template in &config.templates {
                let marker = if template.name == config.default_template {
                    " (default)"
                } else {
                    ""
                };
                println!("{}{marker}", template.name);
                for (pillar, weight) in &template.virtue_weights {
                    println!("  {pillar}: {weight:.2}");
                }
            }
        }
        None => {
            println!("Virtue Engine v0.1.0 - Use --help for commands");
        }
    }

    Ok(())
}
