//! wp-fingerprint - WordPress fingerprinting from unauthenticated HTTP observation
//!
//! Probes a target site for version, theme, and feed exposure without
//! credentials, producing a structured [`FingerprintReport`].
//!
//! # Example
//!
//! ```no_run
//! use wp_fingerprint::Fingerprinter;
//!
//! #[tokio::main]
//! async fn main() -> wp_fingerprint::Result<()> {
//!     let fingerprinter = Fingerprinter::new("https://example.com")?;
//!     let report = fingerprinter.run(&fingerprinter.direct_source()).await?;
//!     println!("theme: {:?}", report.theme);
//!     println!("version: {:?}", report.version());
//!     Ok(())
//! }
//! ```

pub mod acquire;
#[cfg(feature = "browser")]
pub mod browser;
pub mod decode;
pub mod error;
pub mod extract;
pub mod fingerprint;
pub mod output;
pub mod probes;
pub mod report;

pub use acquire::{DirectSource, FixedSource, HtmlSource};
#[cfg(feature = "browser")]
pub use browser::RenderedSource;
pub use error::{Error, Result};
pub use fingerprint::{CancelFlag, Fingerprinter, FingerprinterBuilder};
pub use output::{OutputConfig, OutputFormat, output_report};
pub use probes::{CATALOG, ProbeKind, ProbeSpec};
pub use report::{FingerprintReport, ProbeOutcome, ProbeReport, VersionSignal};
