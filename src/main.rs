//! wp-fingerprint CLI - fingerprint a WordPress site from the outside

use clap::{Parser, ValueEnum};
use std::process::ExitCode;
use std::time::Duration;

use wp_fingerprint::{
    Fingerprinter, FingerprintReport,
    output::{OutputConfig, OutputFormat, output_report},
};

/// WordPress fingerprinting tool - detects version, theme, and feed exposure
#[derive(Parser, Debug)]
#[command(name = "wp-fingerprint")]
#[command(version, about, long_about = None)]
struct Args {
    /// URL of the site to fingerprint
    url: String,

    /// Acquire page HTML through a headless browser instead of a plain GET
    /// (catches script-injected theme links; requires the `browser` feature)
    #[arg(long)]
    rendered: bool,

    /// Output format
    #[arg(short = 'o', long = "output", default_value = "human", value_enum)]
    output_format: OutputFormatArg,

    /// Omit the response header table from human output
    #[arg(long = "no-headers")]
    no_headers: bool,

    /// Allow probing private/internal IP addresses (localhost, 192.168.x.x, etc.)
    #[arg(long = "allow-private")]
    allow_private: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Override the User-Agent header
    #[arg(long = "user-agent")]
    user_agent: Option<String>,
}

/// Output format argument
#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormatArg {
    Human,
    Json,
    None,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::None => OutputFormat::None,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let output_config = OutputConfig::new(args.output_format.into(), !args.no_headers);

    match run(&args, &output_config).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args, output_config: &OutputConfig) -> wp_fingerprint::Result<()> {
    let mut builder = Fingerprinter::builder(&args.url)
        .allow_private(args.allow_private)
        .timeout(Duration::from_secs(args.timeout));
    if let Some(user_agent) = &args.user_agent {
        builder = builder.user_agent(user_agent);
    }
    let fingerprinter = builder.build()?;

    let report = if args.rendered {
        rendered_run(&fingerprinter).await?
    } else {
        fingerprinter.run(&fingerprinter.direct_source()).await?
    };

    let stdout = std::io::stdout();
    let mut writer = stdout.lock();
    output_report(&report, output_config, &mut writer)?;

    Ok(())
}

#[cfg(feature = "browser")]
async fn rendered_run(
    fingerprinter: &Fingerprinter,
) -> wp_fingerprint::Result<FingerprintReport> {
    use wp_fingerprint::RenderedSource;

    let source = RenderedSource::new(fingerprinter.timeout());
    fingerprinter.run(&source).await
}

#[cfg(not(feature = "browser"))]
async fn rendered_run(
    _fingerprinter: &Fingerprinter,
) -> wp_fingerprint::Result<FingerprintReport> {
    Err(wp_fingerprint::Error::Browser(
        "this build has no browser support; rebuild with `--features browser`".to_string(),
    ))
}
