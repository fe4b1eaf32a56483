//! The virtue orchestrator facade.
//!
//! One [`VirtueOrchestrator`] serves many concurrent queries; each query
//! gets its own debate session with session-scoped state, so sessions
//! share only the immutable configuration and the scorer registry.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info};
use virtue_debate::{
    DebateEngine, DebateSettings, Response, ResponseSynthesizer, VirtueWeightController,
    WeightVector,
};
use virtue_pillars::{PillarRegistry, Query};
use virtue_watchdog::WatchdogGate;

use crate::config::{DomainTemplate, OrchestratorConfig};
use crate::{Result, VirtueError};

/// Per-query options.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Domain template to arbitrate under; the configured default when
    /// `None`.
    pub template: Option<String>,
    /// Media references attached to the query.
    pub media: Vec<String>,
    /// Domain/specialty tag forwarded to the scorers.
    pub domain: Option<String>,
}

impl QueryOptions {
    /// Selects a domain template.
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Attaches a media reference.
    pub fn with_media(mut self, reference: impl Into<String>) -> Self {
        self.media.push(reference.into());
        self
    }
}

/// Arbitrates queries across pillar scorers under virtue weighting.
///
/// Construction fails fast on any misconfiguration: invalid thresholds or
/// weights, an empty pillar set, or a template naming a pillar with no
/// registered scorer. After construction, every query is guaranteed a
/// terminating debate.
pub struct VirtueOrchestrator {
    config: OrchestratorConfig,
    registry: PillarRegistry,
}

impl VirtueOrchestrator {
    /// Creates an orchestrator over a scorer registry.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or any template
    /// references an unregistered pillar.
    pub fn new(config: OrchestratorConfig, registry: PillarRegistry) -> Result<Self> {
        config.validate()?;
        for template in &config.templates {
            registry.resolve(&template.pillars())?;
        }
        info!(
            templates = config.templates.len(),
            pillars = registry.len(),
            "virtue orchestrator initialized"
        );
        Ok(Self { config, registry })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Arbitrates a query to a final response.
    pub async fn query(&self, text: &str, options: QueryOptions) -> Result<Response> {
        let (_cancel_tx, cancel_rx) = watch::channel(false);
        self.query_cancellable(text, options, cancel_rx).await
    }

    /// Arbitrates a query that the caller may cancel between rounds.
    ///
    /// Flip the watch channel to `true` to cancel; the response then
    /// carries the distinct `Cancelled` termination reason.
    pub async fn query_cancellable(
        &self,
        text: &str,
        options: QueryOptions,
        cancel: watch::Receiver<bool>,
    ) -> Result<Response> {
        let template = self.select_template(&options)?;
        debug!(template = %template.name, "starting debate session");

        let mut engine = self.build_engine(template)?;
        let mut query = Query::new(text);
        query.media = options.media;
        query.domain = options.domain;

        let session = engine.run_cancellable(query, cancel).await;
        let response = ResponseSynthesizer::new().synthesize(&session, engine.current_weights());
        info!(
            session = %session.id,
            rounds = response.debate_rounds,
            termination = %response.termination,
            "debate session finished"
        );
        Ok(response)
    }

    fn select_template(&self, options: &QueryOptions) -> Result<&DomainTemplate> {
        let name = options
            .template
            .as_deref()
            .unwrap_or(&self.config.default_template);
        self.config
            .template(name)
            .ok_or_else(|| VirtueError::Config(format!("unknown template '{name}'")))
    }

    /// Builds the session-scoped engine for a template.
    fn build_engine(&self, template: &DomainTemplate) -> Result<DebateEngine> {
        let scorers = self.registry.resolve(&template.pillars())?;
        let base = WeightVector::from_map(template.virtue_weights.clone())?;
        let controller = VirtueWeightController::new(
            base,
            self.config.weights.entropy_floor,
            self.config.weights.temperature,
        )?;
        let gate = WatchdogGate::new(
            self.config.watchdog.hallucination_threshold,
            self.config.watchdog.bias_sensitivity,
        )?;
        let settings = DebateSettings {
            max_rounds: self.config.debate.max_rounds,
            convergence_threshold: self.config.debate.convergence_threshold,
            scorer_timeout: Duration::from_millis(self.config.debate.scorer_timeout_ms),
            prompt_preamble: template.prompt_preamble.clone(),
        };
        Ok(DebateEngine::new(scorers, gate, controller, settings)?)
    }
}
