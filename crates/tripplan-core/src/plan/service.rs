//! Plan generation service.
//!
//! Validates criteria, builds the prompt, calls the responder once and parses
//! its trimmed text as JSON. No retries and no repair: text that is not JSON
//! comes back as [`ServiceFailure::ParseFailure`] with the raw output.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::criteria::{Criteria, ValidationError};
use super::prompt::{SYSTEM_PROMPT, build_prompt};
use crate::responder::{CompletionRequest, Responder, ResponderError};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Model parameters used for every generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Failures of a single generation call.
#[derive(Debug, Error)]
pub enum ServiceFailure {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("No response from AI")]
    EmptyResponse,

    #[error("Failed to parse AI response as JSON")]
    ParseFailure {
        raw_output: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Upstream(#[from] ResponderError),
}

/// Parse responder text as JSON after trimming surrounding whitespace.
pub fn parse_output(raw: &str) -> Result<Value, ServiceFailure> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ServiceFailure::EmptyResponse);
    }
    serde_json::from_str(trimmed).map_err(|source| ServiceFailure::ParseFailure {
        raw_output: trimmed.to_string(),
        source,
    })
}

/// Generates itineraries through a [`Responder`].
#[derive(Clone)]
pub struct PlanGenerator {
    responder: Arc<dyn Responder>,
    settings: GenerationSettings,
}

impl std::fmt::Debug for PlanGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanGenerator")
            .field("responder", &self.responder.name())
            .field("settings", &self.settings)
            .finish()
    }
}

impl PlanGenerator {
    pub fn new(responder: Arc<dyn Responder>, settings: GenerationSettings) -> Self {
        Self {
            responder,
            settings,
        }
    }

    /// Build the completion request for `criteria` without sending it.
    pub fn completion_request(&self, criteria: &Criteria) -> CompletionRequest {
        CompletionRequest {
            model: self.settings.model.clone(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_prompt: build_prompt(criteria),
            temperature: self.settings.temperature,
        }
    }

    /// Generate an itinerary for `criteria`.
    ///
    /// Returns the parsed JSON exactly as the responder produced it; shape
    /// checks belong to the generation client.
    pub async fn generate(&self, criteria: &Criteria) -> Result<Value, ServiceFailure> {
        criteria.validate()?;

        let request = self.completion_request(criteria);
        debug!(
            responder = self.responder.name(),
            kind = %criteria.plan_kind(),
            area = criteria.area(),
            "generate: calling responder"
        );

        let reply = self.responder.complete(&request).await.map_err(|e| {
            warn!(status = ?e.status(), error = %e, "generate: responder failed");
            ServiceFailure::Upstream(e)
        })?;
        let Some(raw) = reply else {
            warn!("generate: responder returned no text");
            return Err(ServiceFailure::EmptyResponse);
        };

        match parse_output(&raw) {
            Ok(value) => {
                info!(kind = %criteria.plan_kind(), "plan generated");
                Ok(value)
            }
            Err(e) => {
                warn!(error = %e, "generate: responder output rejected");
                Err(e)
            }
        }
    }
}
