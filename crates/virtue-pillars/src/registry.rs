//! Pillar registry resolved at configuration load.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::{PillarScorer, Result, ScorerError};

/// Maps pillar names to scorer implementations.
///
/// Populated once when configuration is loaded; the debate engine resolves
/// the active template's pillar set against it before any adapter call, so
/// an unknown pillar fails the session at construction rather than
/// mid-debate.
#[derive(Default)]
pub struct PillarRegistry {
    scorers: BTreeMap<String, Arc<dyn PillarScorer>>,
}

impl PillarRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a scorer under its own name.
    ///
    /// # Errors
    /// Returns an error if a scorer with the same name is already present.
    pub fn register(&mut self, scorer: Arc<dyn PillarScorer>) -> Result<()> {
        let name = scorer.name().to_string();
        if self.scorers.contains_key(&name) {
            return Err(ScorerError::DuplicatePillar(name));
        }
        self.scorers.insert(name, scorer);
        Ok(())
    }

    /// Looks up a single scorer by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn PillarScorer>> {
        self.scorers.get(name).cloned()
    }

    /// Resolves an ordered pillar set into scorer handles.
    ///
    /// # Errors
    /// Returns [`ScorerError::UnknownPillar`] for the first name with no
    /// registered implementation.
    pub fn resolve(&self, names: &[String]) -> Result<Vec<Arc<dyn PillarScorer>>> {
        names
            .iter()
            .map(|name| {
                self.get(name)
                    .ok_or_else(|| ScorerError::UnknownPillar(name.clone()))
            })
            .collect()
    }

    /// Returns the registered pillar names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.scorers.keys().map(String::as_str).collect()
    }

    /// Returns the number of registered pillars.
    pub fn len(&self) -> usize {
        self.scorers.len()
    }

    /// Returns true if no pillar is registered.
    pub fn is_empty(&self) -> bool {
        self.scorers.is_empty()
    }
}
