//! Output formatting for fingerprint reports
//!
//! The engine produces a pure [`FingerprintReport`] value; everything here
//! is a consumer of that value, so the engine stays testable without
//! capturing console output.

use crate::error::{Error, Result};
use crate::report::{FingerprintReport, ProbeOutcome, VersionSignal};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ContentArrangement, Table, presets::UTF8_FULL,
};
use std::io::Write;
use std::str::FromStr;

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable table output
    #[default]
    Human,
    /// JSON output
    Json,
    /// No output (silent mode)
    None,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "none" => Ok(Self::None),
            _ => Err(Error::InvalidOutputFormat(s.to_string())),
        }
    }
}

/// Configuration for output formatting
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormat,
    /// Include the full header snapshot in human output
    pub show_headers: bool,
}

impl OutputConfig {
    /// Create a new output config
    pub fn new(format: OutputFormat, show_headers: bool) -> Self {
        Self {
            format,
            show_headers,
        }
    }
}

/// Output a fingerprint report
pub fn output_report<W: Write>(
    report: &FingerprintReport,
    config: &OutputConfig,
    writer: &mut W,
) -> Result<()> {
    match config.format {
        OutputFormat::Human => output_human(report, config, writer),
        OutputFormat::Json => output_json(report, writer),
        OutputFormat::None => Ok(()),
    }
}

/// Output JSON format
fn output_json<W: Write>(report: &FingerprintReport, writer: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer).map_err(Error::OutputFailed)?;
    Ok(())
}

/// Output human-readable table format
fn output_human<W: Write>(
    report: &FingerprintReport,
    config: &OutputConfig,
    writer: &mut W,
) -> Result<()> {
    writeln!(writer, "Target:  {}", report.url).map_err(Error::OutputFailed)?;
    writeln!(
        writer,
        "Theme:   {}",
        report.theme.as_deref().unwrap_or("not detected")
    )
    .map_err(Error::OutputFailed)?;
    writeln!(
        writer,
        "Version: {}",
        report.version().unwrap_or("not disclosed")
    )
    .map_err(Error::OutputFailed)?;
    writeln!(writer).map_err(Error::OutputFailed)?;

    if config.show_headers {
        output_headers_table(report, writer)?;
    }

    output_probe_table(report, writer)?;

    if !report.feeds_reachable {
        writeln!(writer, "No feeds reachable.").map_err(Error::OutputFailed)?;
    }
    if !report.complete {
        writeln!(writer, "Run was cancelled; report is partial.").map_err(Error::OutputFailed)?;
    }

    Ok(())
}

fn output_headers_table<W: Write>(report: &FingerprintReport, writer: &mut W) -> Result<()> {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Header").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

    if report.headers.is_empty() {
        table.add_row(vec![Cell::new("-"), Cell::new("(root fetch failed)")]);
    } else {
        for (name, value) in &report.headers {
            table.add_row(vec![Cell::new(name), Cell::new(value)]);
        }
    }

    writeln!(writer, "{}", table).map_err(Error::OutputFailed)
}

fn output_probe_table<W: Write>(report: &FingerprintReport, writer: &mut W) -> Result<()> {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Probe").add_attribute(Attribute::Bold),
            Cell::new("Result").add_attribute(Attribute::Bold),
            Cell::new("Version").add_attribute(Attribute::Bold),
        ]);

    for probe in &report.probes {
        let result_cell = match &probe.outcome {
            ProbeOutcome::Present => Cell::new("Present")
                .fg(Color::Green)
                .set_alignment(CellAlignment::Center),
            ProbeOutcome::Absent(status) => Cell::new(format!("Absent ({})", status))
                .fg(Color::DarkGrey)
                .set_alignment(CellAlignment::Center),
            ProbeOutcome::Unreachable(_) => Cell::new("Unreachable")
                .fg(Color::Red)
                .set_alignment(CellAlignment::Center),
        };

        let version_cell = match &probe.version {
            Some(VersionSignal::Found(version)) => Cell::new(version).fg(Color::Green),
            Some(VersionSignal::Absent) => Cell::new("not disclosed").fg(Color::DarkGrey),
            Some(VersionSignal::Undecodable(_)) => Cell::new("undecodable").fg(Color::Yellow),
            None => Cell::new("-"),
        };

        table.add_row(vec![Cell::new(&probe.path), result_cell, version_cell]);
    }

    writeln!(writer, "{}", table).map_err(Error::OutputFailed)
}
