//! Fingerprint orchestrator
//!
//! Sequences acquisition, decoding, and extraction into a
//! [`FingerprintReport`]. The engine is stateless between runs; repeated
//! runs against an unchanged target yield identical reports.

use crate::acquire::{DirectSource, HtmlSource};
use crate::decode::decode_body;
use crate::error::{Error, Result};
use crate::extract::{extract_theme, extract_version};
use crate::probes::{CATALOG, ProbeKind, ProbeSpec};
use crate::report::{FingerprintReport, ProbeOutcome, ProbeReport, VersionSignal};
use reqwest::header::CONTENT_ENCODING;
use reqwest::{Client, Response};
use std::collections::BTreeMap;
use std::net::{IpAddr, ToSocketAddrs};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use url::Url;

/// Default User-Agent (standard Chrome on Windows, to avoid trivial
/// bot-blocking on unauthenticated probes)
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Default per-request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Allowed URL schemes
const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// Cooperative cancellation for a fingerprint run.
///
/// Once cancelled, no new probe is dispatched; the probe in flight is
/// allowed to finish, and the partial report comes back with
/// `complete == false` instead of an error.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// WordPress fingerprinter for a single target
#[derive(Debug)]
pub struct Fingerprinter {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

/// Builder for configuring a Fingerprinter with options
#[derive(Debug)]
pub struct FingerprinterBuilder {
    url: String,
    allow_private: bool,
    user_agent: String,
    timeout: Duration,
}

impl FingerprinterBuilder {
    /// Create a new builder for the given URL or domain
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            allow_private: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Allow probing private/internal IP addresses (localhost, 192.168.x.x, etc.)
    ///
    /// By default, SSRF protection blocks requests to internal networks.
    /// Enable this to fingerprint local WordPress installations.
    pub fn allow_private(mut self, allow: bool) -> Self {
        self.allow_private = allow;
        self
    }

    /// Override the User-Agent header sent with every request
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Per-request timeout; a slow probe fails on its own, it never hangs
    /// the run
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the Fingerprinter with the configured options
    pub fn build(self) -> Result<Fingerprinter> {
        Fingerprinter::build_internal(self)
    }
}

impl Fingerprinter {
    /// Create a new fingerprinter for the given URL or domain
    ///
    /// Uses default settings with SSRF protection enabled.
    /// For more options, use [`Fingerprinter::builder()`].
    pub fn new(url: &str) -> Result<Self> {
        FingerprinterBuilder::new(url).build()
    }

    /// Create a builder for configuring fingerprinter options
    ///
    /// # Example
    ///
    /// ```no_run
    /// use wp_fingerprint::Fingerprinter;
    ///
    /// let fingerprinter = Fingerprinter::builder("localhost:8080")
    ///     .allow_private(true)
    ///     .build()?;
    /// # Ok::<(), wp_fingerprint::Error>(())
    /// ```
    pub fn builder(url: &str) -> FingerprinterBuilder {
        FingerprinterBuilder::new(url)
    }

    fn build_internal(options: FingerprinterBuilder) -> Result<Self> {
        // Auto-add https:// if no scheme provided
        let url_with_scheme = if !options.url.contains("://") {
            format!("https://{}", options.url)
        } else {
            options.url.clone()
        };

        let base_url =
            Url::parse(&url_with_scheme).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        // Validate URL scheme (SSRF protection)
        if !ALLOWED_SCHEMES.contains(&base_url.scheme()) {
            return Err(Error::InvalidUrl(format!(
                "scheme '{}' not allowed (use http or https)",
                base_url.scheme()
            )));
        }

        // Validate host is not internal/private (SSRF protection)
        if !options.allow_private {
            Self::validate_host(&base_url)?;
        }

        let client = Client::builder()
            .user_agent(&options.user_agent)
            .timeout(options.timeout)
            .build()
            .map_err(|e| Error::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            timeout: options.timeout,
        })
    }

    /// The target base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The configured per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// A direct acquisition strategy sharing this fingerprinter's client
    pub fn direct_source(&self) -> DirectSource {
        DirectSource::new(self.client.clone())
    }

    /// Validate that the host is not an internal/private address
    fn validate_host(url: &Url) -> Result<()> {
        let host = url
            .host_str()
            .ok_or_else(|| Error::InvalidUrl("missing host".to_string()))?;

        if host == "localhost" || host.ends_with(".localhost") {
            return Err(Error::InvalidUrl("localhost not allowed".to_string()));
        }

        let port = url
            .port()
            .unwrap_or(if url.scheme() == "https" { 443 } else { 80 });

        if let Ok(addrs) = (host, port).to_socket_addrs() {
            for addr in addrs {
                if Self::is_internal_ip(addr.ip()) {
                    return Err(Error::InvalidUrl(format!(
                        "internal/private IP address not allowed: {}",
                        addr.ip()
                    )));
                }
            }
        }

        Ok(())
    }

    /// Check if an IP address is internal/private (RFC 1918, link-local,
    /// loopback, etc.)
    fn is_internal_ip(ip: IpAddr) -> bool {
        match ip {
            IpAddr::V4(v4) => {
                let octets = v4.octets();
                v4.is_loopback()
                    || v4.is_private()
                    || v4.is_link_local()
                    || v4.is_broadcast()
                    || v4.is_unspecified()
                    // Shared address space (100.64.0.0/10)
                    || (octets[0] == 100 && (64..=127).contains(&octets[1]))
                    // Cloud metadata endpoint
                    || octets == [169, 254, 169, 254]
                    // Documentation/test ranges (192.0.x.x)
                    || octets[..2] == [192, 0]
            }
            IpAddr::V6(v6) => {
                v6.is_loopback()
                    || v6.is_unspecified()
                    // Unique local (fc00::/7)
                    || (v6.segments()[0] & 0xfe00) == 0xfc00
                    // Link-local (fe80::/10)
                    || (v6.segments()[0] & 0xffc0) == 0xfe80
            }
        }
    }

    /// Run the full probe catalog against the target.
    ///
    /// The acquisition strategy supplies the page HTML; headers are always
    /// taken from a direct fetch of the root. Failure to acquire the HTML
    /// is fatal; every other fault is recorded against its probe.
    pub async fn run<S: HtmlSource>(&self, source: &S) -> Result<FingerprintReport> {
        self.run_cancellable(source, &CancelFlag::new()).await
    }

    /// Like [`run`](Self::run), but honoring a cancellation signal at probe
    /// granularity. A cancelled run returns a partial report marked
    /// `complete == false`.
    pub async fn run_cancellable<S: HtmlSource>(
        &self,
        source: &S,
        cancel: &CancelFlag,
    ) -> Result<FingerprintReport> {
        // Best-effort header snapshot. In direct mode a failure here will
        // also fail the HTML acquisition below, which is the fatal signal;
        // in rendered mode the headers are simply reported empty.
        let headers = self.fetch_root_headers().await.unwrap_or_default();

        let html = source.acquire(&self.base_url).await?;
        let theme = extract_theme(&html);

        let mut probes = Vec::with_capacity(CATALOG.len());
        let mut complete = true;
        for spec in CATALOG {
            if cancel.is_cancelled() {
                complete = false;
                break;
            }
            probes.push(self.probe(spec).await);
        }

        let feeds_reachable = probes
            .iter()
            .any(|p| p.kind == ProbeKind::Feed && p.outcome == ProbeOutcome::Present);

        Ok(FingerprintReport {
            url: self.base_url.to_string(),
            headers,
            theme,
            probes,
            feeds_reachable,
            complete,
        })
    }

    /// Snapshot the root response headers via a direct fetch
    async fn fetch_root_headers(&self) -> Result<BTreeMap<String, String>> {
        let response = self
            .client
            .get(self.base_url.as_str())
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        // Lowercased names into a sorted map: header keys are
        // case-insensitive and the report must serialize deterministically.
        let mut headers: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in response.headers() {
            let value = String::from_utf8_lossy(value.as_bytes());
            headers
                .entry(name.as_str().to_string())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(&value);
                })
                .or_insert_with(|| value.into_owned());
        }

        Ok(headers)
    }

    /// Execute a single catalog probe; all faults end up in the record
    async fn probe(&self, spec: &ProbeSpec) -> ProbeReport {
        let path = spec.path.to_string();

        let url = match self.base_url.join(spec.path) {
            Ok(url) => url,
            Err(e) => return Self::unreachable(path, spec.kind, e.to_string()),
        };

        let response = match self.client.get(url.as_str()).send().await {
            Ok(response) => response,
            Err(e) => return Self::unreachable(path, spec.kind, e.to_string()),
        };

        let status = response.status().as_u16();
        if status != 200 {
            return ProbeReport {
                path,
                kind: spec.kind,
                outcome: ProbeOutcome::Absent(status),
                version: None,
            };
        }

        match spec.kind {
            ProbeKind::Marker => ProbeReport {
                path,
                kind: spec.kind,
                outcome: ProbeOutcome::Present,
                version: None,
            },
            ProbeKind::Feed => self.feed_probe(path, response).await,
        }
    }

    /// Classify a feed body that answered 200. The version signal is
    /// recorded even when absent - absence is a reportable fact.
    async fn feed_probe(&self, path: String, response: Response) -> ProbeReport {
        let encoding = response
            .headers()
            .get(CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = match response.bytes().await {
            Ok(body) => body,
            // Stream died after the status line: a transport fault, not a
            // decode fault
            Err(e) => return Self::unreachable(path, ProbeKind::Feed, e.to_string()),
        };

        let version = match decode_body(&body, encoding.as_deref()) {
            Ok(text) => match extract_version(&text) {
                Some(version) => VersionSignal::Found(version),
                None => VersionSignal::Absent,
            },
            Err(e) => VersionSignal::Undecodable(e.to_string()),
        };

        ProbeReport {
            path,
            kind: ProbeKind::Feed,
            outcome: ProbeOutcome::Present,
            version: Some(version),
        }
    }

    fn unreachable(path: String, kind: ProbeKind, detail: String) -> ProbeReport {
        ProbeReport {
            path,
            kind,
            outcome: ProbeOutcome::Unreachable(detail),
            version: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_url() {
        // Note: This may fail if example.com resolves to an internal IP in
        // the test environment
        let fingerprinter = Fingerprinter::new("https://example.com");
        assert!(fingerprinter.is_ok());
    }

    #[test]
    fn parse_invalid_url() {
        let fingerprinter = Fingerprinter::new("not a url");
        assert!(fingerprinter.is_err());
    }

    #[test]
    fn scheme_is_added_when_missing() {
        let fingerprinter = Fingerprinter::new("example.com").unwrap();
        assert_eq!(fingerprinter.base_url().scheme(), "https");
    }

    #[test]
    fn reject_localhost() {
        let result = Fingerprinter::new("http://localhost");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("localhost"));
    }

    #[test]
    fn reject_localhost_subdomain() {
        let result = Fingerprinter::new("http://foo.localhost");
        assert!(result.is_err());
    }

    #[test]
    fn allow_private_admits_loopback() {
        let result = Fingerprinter::builder("http://127.0.0.1:8080")
            .allow_private(true)
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn reject_file_scheme() {
        let result = Fingerprinter::new("file:///etc/passwd");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("scheme"));
    }

    #[test]
    fn reject_ftp_scheme() {
        let result = Fingerprinter::new("ftp://example.com");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("scheme"));
    }

    #[test]
    fn internal_ip_detection() {
        use std::net::Ipv4Addr;

        assert!(Fingerprinter::is_internal_ip(IpAddr::V4(Ipv4Addr::new(
            10, 0, 0, 1
        ))));
        assert!(Fingerprinter::is_internal_ip(IpAddr::V4(Ipv4Addr::new(
            172, 16, 0, 1
        ))));
        assert!(Fingerprinter::is_internal_ip(IpAddr::V4(Ipv4Addr::new(
            192, 168, 1, 1
        ))));
        assert!(Fingerprinter::is_internal_ip(IpAddr::V4(Ipv4Addr::new(
            127, 0, 0, 1
        ))));
        assert!(Fingerprinter::is_internal_ip(IpAddr::V4(Ipv4Addr::new(
            169, 254, 1, 1
        ))));

        // Public addresses pass
        assert!(!Fingerprinter::is_internal_ip(IpAddr::V4(Ipv4Addr::new(
            8, 8, 8, 8
        ))));
    }

    #[test]
    fn shared_and_reserved_ranges_are_internal() {
        use std::net::Ipv4Addr;

        // Shared address space 100.64.0.0/10
        assert!(Fingerprinter::is_internal_ip(IpAddr::V4(Ipv4Addr::new(
            100, 64, 0, 1
        ))));
        assert!(Fingerprinter::is_internal_ip(IpAddr::V4(Ipv4Addr::new(
            100, 127, 255, 255
        ))));
        // Public neighbors of that range pass
        assert!(!Fingerprinter::is_internal_ip(IpAddr::V4(Ipv4Addr::new(
            100, 63, 255, 255
        ))));
        assert!(!Fingerprinter::is_internal_ip(IpAddr::V4(Ipv4Addr::new(
            100, 128, 0, 0
        ))));

        // Cloud metadata endpoint
        assert!(Fingerprinter::is_internal_ip(IpAddr::V4(Ipv4Addr::new(
            169, 254, 169, 254
        ))));

        // Documentation/test ranges
        assert!(Fingerprinter::is_internal_ip(IpAddr::V4(Ipv4Addr::new(
            192, 0, 2, 1
        ))));
    }

    #[test]
    fn cancel_flag_round_trip() {
        let flag = CancelFlag::new();
        assert!(!flag.is_cancelled());
        let clone = flag.clone();
        clone.cancel();
        assert!(flag.is_cancelled());
    }

    #[test]
    fn probe_paths_resolve_relative_to_target() {
        let base = Url::parse("https://example.com/").unwrap();
        let feed = base.join("index.php/comments/feed").unwrap();
        assert_eq!(feed.as_str(), "https://example.com/index.php/comments/feed");
    }
}
