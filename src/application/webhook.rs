//! Outbound build-hook dispatch.

use async_trait::async_trait;
use metrics::counter;
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

const SOURCE: &str = "application::webhook::WebhookDispatcher";

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("build hook request failed: {0}")]
    Transport(String),
    #[error("build hook returned HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The endpoint accepted the trigger with a 2xx response.
    Triggered,
    /// No endpoint is configured for this deployment; nothing was sent.
    Skipped,
}

/// Seam between the publish orchestrator and the outbound HTTP call, so the
/// transition logic is testable without a network.
#[async_trait]
pub trait BuildTrigger: Send + Sync {
    async fn dispatch(&self, trigger: &str) -> Result<DispatchOutcome, WebhookError>;
}

/// Posts `{"trigger": <label>}` to the configured build endpoint.
///
/// An unconfigured endpoint is a successful no-op: the rebuild hook is
/// optional per deployment. No retry happens here; endpoints are expected
/// to be idempotent and callers own any backoff policy.
#[derive(Debug, Clone)]
pub struct WebhookDispatcher {
    endpoint: Option<Url>,
    client: reqwest::Client,
}

impl WebhookDispatcher {
    pub fn new(endpoint: Option<Url>) -> Self {
        Self {
            endpoint,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl BuildTrigger for WebhookDispatcher {
    async fn dispatch(&self, trigger: &str) -> Result<DispatchOutcome, WebhookError> {
        let Some(endpoint) = self.endpoint.as_ref() else {
            info!(target = SOURCE, trigger, "no build hook configured, skipping dispatch");
            return Ok(DispatchOutcome::Skipped);
        };

        let response = self
            .client
            .post(endpoint.clone())
            .json(&json!({ "trigger": trigger }))
            .send()
            .await
            .map_err(|err| WebhookError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            counter!("foglio_webhook_dispatch_total", "outcome" => "rejected").increment(1);
            warn!(
                target = SOURCE,
                trigger,
                status = status.as_u16(),
                "build hook rejected dispatch"
            );
            return Err(WebhookError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        counter!("foglio_webhook_dispatch_total", "outcome" => "triggered").increment(1);
        info!(
            target = SOURCE,
            trigger,
            status = status.as_u16(),
            "build hook triggered"
        );
        Ok(DispatchOutcome::Triggered)
    }
}
