//! Probe catalog
//!
//! The fixed set of well-known paths checked against a target, in probe
//! order. These are static, unauthenticated, low-noise signals; the feed
//! endpoints double as version disclosure channels.

use serde::Serialize;

/// How a probe's response is classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
    /// Present iff the path answers 200
    Marker,
    /// Present iff the path answers 200; the body is additionally scanned
    /// for the version marker
    Feed,
}

/// A single well-known resource to check, resolved relative to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSpec {
    /// Relative path under the target root
    pub path: &'static str,
    /// Classification rule for the response
    pub kind: ProbeKind,
}

/// The probe catalog. Fixed and ordered; not user-configurable.
pub const CATALOG: &[ProbeSpec] = &[
    ProbeSpec {
        path: "readme.html",
        kind: ProbeKind::Marker,
    },
    ProbeSpec {
        path: "wp-cron.php",
        kind: ProbeKind::Marker,
    },
    ProbeSpec {
        path: "feed",
        kind: ProbeKind::Feed,
    },
    ProbeSpec {
        path: "index.php/feed",
        kind: ProbeKind::Feed,
    },
    ProbeSpec {
        path: "index.php/comments/feed",
        kind: ProbeKind::Feed,
    },
    ProbeSpec {
        path: "comments/feed",
        kind: ProbeKind::Feed,
    },
];
