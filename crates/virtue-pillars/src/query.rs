//! The immutable query record handed to every pillar.

use serde::{Deserialize, Serialize};

/// An incoming question to arbitrate.
///
/// Created once per request and read-only thereafter; every pillar in a
/// session sees the same query for every round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    /// The question text.
    pub text: String,
    /// References to attached media (URIs or opaque handles).
    pub media: Vec<String>,
    /// Optional domain/specialty tag (e.g., "medical", "legal").
    pub domain: Option<String>,
}

impl Query {
    /// Creates a new query from its text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            media: Vec::new(),
            domain: None,
        }
    }

    /// Attaches a media reference.
    pub fn with_media(mut self, reference: impl Into<String>) -> Self {
        self.media.push(reference.into());
        self
    }

    /// Tags the query with a domain.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}
