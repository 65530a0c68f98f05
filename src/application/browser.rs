//! Remote template fetching through a headless browser.
//!
//! Client template pages build their final markup with client-side script,
//! so a plain HTTP fetch returns the wrong document. A real engine drives
//! the navigation to network quiescence and serializes the resulting DOM.
//!
//! The engine sits behind a trait for two reasons: sessions are expensive
//! processes whose teardown discipline must be provable in tests, and a
//! pool can later replace per-call launches without touching callers.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use metrics::{counter, histogram};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::application::error::AppError;

const SOURCE: &str = "application::browser::RemoteTemplateFetcher";

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("failed to launch browser: {0}")]
    Launch(String),
    #[error("navigation failed: {0}")]
    Navigation(String),
    #[error("failed to serialize document: {0}")]
    Serialize(String),
    #[error("failed to close session: {0}")]
    Teardown(String),
}

#[async_trait]
pub trait BrowserEngine: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, BrowserError>;
}

/// One scoped headless session. `close` consumes the session; callers must
/// invoke it on every exit path, with the implementation's `Drop` as the
/// backstop for cancellation.
#[async_trait]
pub trait BrowserSession: Send {
    /// Navigate to `url`, wait for network quiescence, and return the
    /// serialized post-script document.
    async fn render(&mut self, url: &str) -> Result<String, BrowserError>;

    async fn close(self: Box<Self>) -> Result<(), BrowserError>;
}

/// Fetches fully rendered HTML for a remote URL. Each call launches and
/// tears down its own session; calls are independent and may run
/// concurrently. No retry happens here.
#[derive(Clone)]
pub struct RemoteTemplateFetcher {
    engine: Arc<dyn BrowserEngine>,
}

impl RemoteTemplateFetcher {
    pub fn new(engine: Arc<dyn BrowserEngine>) -> Self {
        Self { engine }
    }

    pub async fn fetch_rendered_html(&self, url: &Url) -> Result<String, AppError> {
        let start = Instant::now();

        let session = self
            .engine
            .launch()
            .await
            .map_err(|cause| self.failed(url, cause))?;

        let rendered = self.drive(session, url).await;
        histogram!("foglio_remote_render_ms").record(start.elapsed().as_millis() as f64);

        match rendered {
            Ok(html) => {
                counter!("foglio_remote_render_total", "outcome" => "ok").increment(1);
                debug!(
                    target = SOURCE,
                    url = url.as_str(),
                    bytes = html.len(),
                    "remote template rendered"
                );
                Ok(html)
            }
            Err(cause) => Err(self.failed(url, cause)),
        }
    }

    /// Runs the navigation and guarantees the session is closed before the
    /// outcome propagates, on the success and every failure path.
    async fn drive(
        &self,
        mut session: Box<dyn BrowserSession>,
        url: &Url,
    ) -> Result<String, BrowserError> {
        let outcome = session.render(url.as_str()).await;

        if let Err(err) = session.close().await {
            warn!(
                target = SOURCE,
                url = url.as_str(),
                error = %err,
                "browser session teardown failed"
            );
        }

        outcome
    }

    fn failed(&self, url: &Url, cause: BrowserError) -> AppError {
        counter!("foglio_remote_render_total", "outcome" => "error").increment(1);
        AppError::render_fetch(url.as_str(), cause)
    }
}
