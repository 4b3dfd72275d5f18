//! Structured fingerprint report
//!
//! The terminal artifact of a run. Assembled once by the orchestrator and
//! never mutated afterwards; every signal is present, absent, or an error,
//! never silently omitted.

use crate::probes::ProbeKind;
use serde::Serialize;
use std::collections::BTreeMap;

/// Classification of one probe's response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeOutcome {
    /// The path answered 200
    Present,
    /// The path answered with the given non-200 status
    Absent(u16),
    /// The fetch itself failed (network fault or timeout)
    Unreachable(String),
}

/// Version disclosure signal from a feed body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionSignal {
    /// The generator marker disclosed this version
    Found(String),
    /// The body decoded cleanly but carried no marker
    Absent,
    /// The body could not be decoded (corrupt gzip or non-UTF-8)
    Undecodable(String),
}

/// Record for a single catalog probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    /// Relative path that was probed
    pub path: String,
    /// Classification rule the probe was checked under
    pub kind: ProbeKind,
    /// Presence classification
    pub outcome: ProbeOutcome,
    /// Version signal; populated only for feed probes that answered 200
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionSignal>,
}

/// Aggregate fingerprint of a target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FingerprintReport {
    /// Target base URL
    pub url: String,
    /// Header snapshot from the root fetch, lowercased names, sorted.
    /// Empty when the header fetch itself failed.
    pub headers: BTreeMap<String, String>,
    /// Active theme slug, if disclosed by a stylesheet link
    pub theme: Option<String>,
    /// One record per catalog probe, in catalog order
    pub probes: Vec<ProbeReport>,
    /// False when no feed probe answered 200 - the explicit
    /// "no feeds reachable" condition
    pub feeds_reachable: bool,
    /// False when the run was cancelled before all probes were dispatched
    pub complete: bool,
}

impl FingerprintReport {
    /// First version disclosed by any feed probe, if any
    pub fn version(&self) -> Option<&str> {
        self.probes.iter().find_map(|probe| match &probe.version {
            Some(VersionSignal::Found(v)) => Some(v.as_str()),
            _ => None,
        })
    }
}
