//! ---
//! tfy_section: "04-insight"
//! tfy_subsection: "module"
//! tfy_type: "source"
//! tfy_scope: "code"
//! tfy_description: "Advisory-text adapter and request sequencing."
//! tfy_version: "v0.1.0"
//! tfy_owner: "tbd"
//! ---
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, warn};
use trackify_common::config::InsightConfig;
use trackify_core::FleetSnapshot;

use crate::prompt::{build_request, GenerateContentResponse};

/// Fixed user-visible text substituted for every failure class.
pub const FALLBACK_TEXT: &str = "Could not connect to AI advisor. Please check connectivity.";

/// Failure taxonomy of the one-shot advisory call. None of these variants
/// escape the adapter; they are logged and folded into [`FALLBACK_TEXT`].
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("api key environment variable {0} is not set")]
    MissingApiKey(String),
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service responded with status {0}")]
    Status(StatusCode),
    #[error("response carried no candidate text")]
    EmptyResponse,
}

/// One-shot client for the external advisory-text service.
///
/// No retries, no caching, no timeout beyond the transport default; a second
/// in-flight request is legal and sequencing is resolved by
/// [`crate::InsightSession`].
#[derive(Debug, Clone)]
pub struct InsightAdvisor {
    client: reqwest::Client,
    config: InsightConfig,
}

impl InsightAdvisor {
    pub fn new(config: InsightConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Request advisory text for the snapshot. Always returns displayable
    /// text: every failure is recovered here into the fixed fallback.
    pub async fn advise(&self, snapshot: &FleetSnapshot) -> String {
        match self.request(snapshot).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "insight request failed; serving fallback text");
                FALLBACK_TEXT.to_owned()
            }
        }
    }

    async fn request(&self, snapshot: &FleetSnapshot) -> Result<String, InsightError> {
        let key = std::env::var(&self.config.api_key_env)
            .map_err(|_| InsightError::MissingApiKey(self.config.api_key_env.clone()))?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        );
        let body = build_request(snapshot, self.config.temperature);
        debug!(model = %self.config.model, "requesting fleet insight");
        let response = self
            .client
            .post(&url)
            .query(&[("key", key.as_str())])
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(InsightError::Status(response.status()));
        }
        let parsed: GenerateContentResponse = response.json().await?;
        let text = parsed.text();
        if text.trim().is_empty() {
            return Err(InsightError::EmptyResponse);
        }
        Ok(text)
    }
}
