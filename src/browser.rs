//! Rendered-DOM acquisition via headless Chromium
//!
//! Some sites inject their theme asset links only after scripts run; the
//! direct fetch misses those, a rendered fetch catches them at the cost of
//! a much heavier acquisition path. The browser session is scoped to one
//! [`acquire`](crate::acquire::HtmlSource::acquire) call and torn down on
//! every exit path so no Chromium process outlives the fetch.

use crate::acquire::HtmlSource;
use crate::error::{Error, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use std::time::Duration;
use url::Url;

/// Acquisition strategy that renders the page in headless Chromium and
/// returns the serialized DOM
#[derive(Debug, Clone)]
pub struct RenderedSource {
    timeout: Duration,
}

impl RenderedSource {
    /// Bound the whole render (launch, navigate, serialize) by `timeout`
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn render(&self, target: &Url) -> Result<String> {
        let config = BrowserConfig::builder()
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .request_timeout(self.timeout)
            .build()
            .map_err(Error::Browser)?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| Error::Browser(e.to_string()))?;

        // The handler must be polled for the CDP connection to make progress
        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let html = match tokio::time::timeout(self.timeout, render_page(&browser, target)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Browser(format!(
                "rendering timed out after {:?}",
                self.timeout
            ))),
        };

        // Teardown happens whether or not navigation succeeded
        let _ = browser.close().await;
        let _ = browser.wait().await;
        events.abort();

        html
    }
}

async fn render_page(browser: &Browser, target: &Url) -> Result<String> {
    let page = browser
        .new_page(target.as_str())
        .await
        .map_err(|e| Error::Browser(e.to_string()))?;

    page.wait_for_navigation()
        .await
        .map_err(|e| Error::Browser(e.to_string()))?;

    page.content()
        .await
        .map_err(|e| Error::Browser(e.to_string()))
}

impl HtmlSource for RenderedSource {
    async fn acquire(&self, target: &Url) -> Result<String> {
        self.render(target).await
    }
}
