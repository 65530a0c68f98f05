//! Chromium-backed implementation of the headless browser seam.
//!
//! Each session owns one browser process plus the task driving its CDP
//! event loop. `close` shuts both down explicitly; dropping the session
//! (cancellation path) still kills the child process and aborts the event
//! task, so no session can outlive its call.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::{
    EventLifecycleEvent, NavigateParams, SetLifecycleEventsEnabledParams,
};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::application::browser::{BrowserEngine, BrowserError, BrowserSession};
use crate::config::BrowserSettings;

const SOURCE: &str = "infra::chromium::ChromiumEngine";

/// Lifecycle event names that mark network quiescence. A bare `load` is not
/// enough: client scripts keep fetching data after it fires.
const QUIESCENT_LIFECYCLE_EVENTS: [&str; 2] = ["networkAlmostIdle", "networkIdle"];

#[derive(Debug, Clone)]
pub struct ChromiumEngine {
    settings: BrowserSettings,
}

impl ChromiumEngine {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl BrowserEngine for ChromiumEngine {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, BrowserError> {
        let mut builder = BrowserConfig::builder();
        if let Some(path) = self.settings.chrome_executable.as_ref() {
            builder = builder.chrome_executable(path);
        }
        if self.settings.no_sandbox {
            builder = builder.no_sandbox();
        }
        let config = builder.build().map_err(BrowserError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|err| BrowserError::Launch(err.to_string()))?;

        // The handler future must be polled for the whole session lifetime,
        // or every CDP call stalls.
        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Box::new(ChromiumSession {
            browser,
            _handler: HandlerGuard(events),
        }))
    }
}

struct HandlerGuard(JoinHandle<()>);

impl Drop for HandlerGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

pub struct ChromiumSession {
    browser: Browser,
    _handler: HandlerGuard,
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn render(&mut self, url: &str) -> Result<String, BrowserError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|err| BrowserError::Navigation(err.to_string()))?;

        page.execute(SetLifecycleEventsEnabledParams::new(true))
            .await
            .map_err(|err| BrowserError::Navigation(err.to_string()))?;

        // Subscribe before navigating so no lifecycle event can be missed.
        let mut lifecycle = page
            .event_listener::<EventLifecycleEvent>()
            .await
            .map_err(|err| BrowserError::Navigation(err.to_string()))?;

        let navigation = page
            .execute(NavigateParams::new(url))
            .await
            .map_err(|err| BrowserError::Navigation(err.to_string()))?;

        if let Some(error_text) = navigation.result.error_text.as_ref() {
            return Err(BrowserError::Navigation(error_text.clone()));
        }
        let loader_id = navigation.result.loader_id.clone();

        // Chrome re-emits lifecycle state on enable, so events from the
        // initial about:blank loader must be ignored; only idle events for
        // this navigation's loader complete the wait.
        while let Some(event) = lifecycle.next().await {
            trace!(target = SOURCE, name = event.name, "lifecycle event");
            if !QUIESCENT_LIFECYCLE_EVENTS.contains(&event.name.as_str()) {
                continue;
            }
            match loader_id.as_ref() {
                Some(loader) if &event.loader_id != loader => continue,
                _ => break,
            }
        }

        page.content()
            .await
            .map_err(|err| BrowserError::Serialize(err.to_string()))
    }

    async fn close(mut self: Box<Self>) -> Result<(), BrowserError> {
        let closed = self.browser.close().await;
        let _ = self.browser.wait().await;
        closed
            .map(|_| ())
            .map_err(|err| BrowserError::Teardown(err.to_string()))
    }
}
