//! Headless-browser render fallback
//!
//! Pages whose direct HTML looks client-rendered are re-requested through a
//! shared Chromium session. The session is launched on first use and lives
//! until `shutdown`. A failed launch marks the renderer unavailable for the
//! rest of the run so later pages degrade without retrying.

use crate::config::RenderConfig;
use crate::crawler::fetcher::ACCEPT_LANGUAGE_VALUE;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::error::CdpError;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use url::Url;

/// Errors raised while rendering a page
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Browser launch failed: {0}")]
    Launch(String),

    #[error("Browser protocol error: {0}")]
    Cdp(#[from] CdpError),

    #[error("Render timed out after {secs}s for {url}")]
    Timeout { url: String, secs: u64 },

    #[error("No browser available")]
    Unavailable,
}

/// Strategy for obtaining rendered HTML
#[async_trait]
pub trait RenderStrategy: Send {
    /// Returns the rendered HTML for `url`
    async fn render(&mut self, url: &Url) -> Result<String, RenderError>;

    /// Releases any browser resources; safe to call more than once
    async fn shutdown(&mut self);
}

/// Renderer used when browser fallback is disabled
#[derive(Debug, Default)]
pub struct NoopRenderer;

#[async_trait]
impl RenderStrategy for NoopRenderer {
    async fn render(&mut self, _url: &Url) -> Result<String, RenderError> {
        Err(RenderError::Unavailable)
    }

    async fn shutdown(&mut self) {}
}

/// A running browser with its CDP event loop
struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

enum Session {
    NotStarted,
    Running(BrowserSession),
    Unavailable,
}

/// Chromium-backed renderer
pub struct BrowserRenderer {
    user_agent: String,
    chrome_path: Option<PathBuf>,
    timeout: Duration,
    settle: Duration,
    session: Session,
}

impl BrowserRenderer {
    /// Creates a renderer; no browser is launched until the first render
    pub fn new(config: &RenderConfig, user_agent: String) -> Self {
        Self {
            user_agent,
            chrome_path: config.chrome_path.as_ref().map(PathBuf::from),
            timeout: Duration::from_secs(config.timeout_secs),
            settle: Duration::from_millis(config.settle_ms),
            session: Session::NotStarted,
        }
    }

    async fn launch(&self) -> Result<BrowserSession, RenderError> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg(format!("--user-agent={}", self.user_agent))
            .arg(format!("--accept-lang={}", ACCEPT_LANGUAGE_VALUE))
            .window_size(1920, 1080)
            .request_timeout(self.timeout);
        if let Some(path) = &self.chrome_path {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(RenderError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| RenderError::Launch(e.to_string()))?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(BrowserSession { browser, handler })
    }

    async fn ensure_session(&mut self) -> Result<&BrowserSession, RenderError> {
        if matches!(self.session, Session::NotStarted) {
            tracing::info!("Launching headless browser for render fallback");
            self.session = match self.launch().await {
                Ok(session) => Session::Running(session),
                Err(e) => {
                    tracing::warn!("{}; pages needing render will degrade", e);
                    Session::Unavailable
                }
            };
        }

        match &self.session {
            Session::Running(session) => Ok(session),
            _ => Err(RenderError::Unavailable),
        }
    }
}

#[async_trait]
impl RenderStrategy for BrowserRenderer {
    async fn render(&mut self, url: &Url) -> Result<String, RenderError> {
        let settle = self.settle;
        let timeout = self.timeout;
        let session = self.ensure_session().await?;

        let page = session.browser.new_page("about:blank").await?;
        let rendered = tokio::time::timeout(timeout, async {
            page.goto(url.as_str()).await?;
            page.wait_for_navigation().await?;
            tokio::time::sleep(settle).await;
            page.content().await
        })
        .await;

        if let Err(e) = page.close().await {
            tracing::debug!("Failed to close page for {}: {}", url, e);
        }

        match rendered {
            Ok(html) => Ok(html?),
            Err(_) => Err(RenderError::Timeout {
                url: url.to_string(),
                secs: timeout.as_secs(),
            }),
        }
    }

    async fn shutdown(&mut self) {
        if let Session::Running(mut session) =
            std::mem::replace(&mut self.session, Session::Unavailable)
        {
            tracing::info!("Closing headless browser");
            if let Err(e) = session.browser.close().await {
                tracing::debug!("Browser close failed: {}", e);
            }
            if let Err(e) = session.browser.wait().await {
                tracing::debug!("Browser wait failed: {}", e);
            }
        }
    }
}

/// Builds the renderer for a run
pub fn renderer_for(config: &RenderConfig, user_agent: String) -> Box<dyn RenderStrategy> {
    if config.enabled {
        Box::new(BrowserRenderer::new(config, user_agent))
    } else {
        Box::new(NoopRenderer)
    }
}
