//! HTML acquisition strategies
//!
//! The theme extractor does not care where the page HTML came from; every
//! strategy answers the same question through [`HtmlSource`]. The rendered
//! strategy lives in [`crate::browser`] behind the `browser` feature so the
//! core engine never links a browser-automation library.

use crate::error::{Error, Result};
use reqwest::Client;
use std::future::Future;
use url::Url;

/// Supplier of the target's page HTML
pub trait HtmlSource {
    /// Acquire the HTML for the target root.
    ///
    /// Failure here is fatal to a run: without HTML there is no baseline
    /// to fingerprint.
    fn acquire(&self, target: &Url) -> impl Future<Output = Result<String>> + Send;
}

/// Plain HTTP GET of the target root
#[derive(Debug, Clone)]
pub struct DirectSource {
    client: Client,
}

impl DirectSource {
    /// Wrap an existing client so User-Agent and timeout settings carry over
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl HtmlSource for DirectSource {
    async fn acquire(&self, target: &Url) -> Result<String> {
        let response = self
            .client
            .get(target.as_str())
            .send()
            .await
            .map_err(|e| Error::Acquisition(e.to_string()))?;

        // An error page is not baseline HTML; without a readable root
        // there is nothing to fingerprint
        if !response.status().is_success() {
            return Err(Error::Acquisition(format!(
                "root page returned status {}",
                response.status().as_u16()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| Error::Acquisition(e.to_string()))
    }
}

/// Canned HTML - a test double, also useful for offline re-analysis of a
/// previously captured page
#[derive(Debug, Clone)]
pub struct FixedSource {
    html: String,
}

impl FixedSource {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }
}

impl HtmlSource for FixedSource {
    async fn acquire(&self, _target: &Url) -> Result<String> {
        Ok(self.html.clone())
    }
}
