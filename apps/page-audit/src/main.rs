//! Page audit CLI
//!
//! Audits a captured page state, optionally with a recorded performance
//! trace, and prints the report. Exit status: 0 on success, 1 when the score
//! is below the configured floor, 2 when inputs or outputs fail.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use audit_engine::{OutputFormat, Reporter, StaticPage};
use clap::Parser;
use page_audit::{run_audit, AuditConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "page-audit")]
#[command(version, about = "Audit a captured page state against its Web Vitals")]
struct Args {
    /// Captured page state (JSON)
    #[arg(short, long)]
    page: PathBuf,

    /// Recorded performance events (NDJSON)
    #[arg(short, long)]
    trace: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report format: console, json, json-pretty or markdown
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Site domain used to classify external links
    #[arg(long)]
    site: Option<String>,

    /// Exit with status 1 when the score is below this
    #[arg(long)]
    fail_under: Option<u32>,

    /// Trace collector updates and print the metrics snapshot
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // stdout carries only the report
    let level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match execute(args).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}

async fn execute(args: Args) -> anyhow::Result<ExitCode> {
    let mut config = match &args.config {
        Some(path) => AuditConfig::from_file(path)?,
        None => AuditConfig::default(),
    };
    if let Some(format) = args.format {
        config.report.format = format;
    }
    if let Some(site) = args.site {
        config.site.domain = site;
    }
    if args.fail_under.is_some() {
        config.report.fail_under = args.fail_under;
    }
    config.collector.debug |= args.debug;

    let page = StaticPage::from_json_file(&args.page)?;
    let trace = match &args.trace {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read trace file: {}", path.display()))?,
        ),
        None => None,
    };

    tracing::info!("Auditing {} for {}", args.page.display(), config.site.domain);
    let run = run_audit(&page, trace.as_deref(), &config).await?;

    if args.debug {
        eprintln!("{}", vitals_collector::format_snapshot_report(&run.snapshot)?);
    }

    let reporter = Reporter::new(config.report.format);
    match &args.output {
        Some(path) => {
            reporter
                .write_to_file(&run.result, path)
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            tracing::info!("Report written to {}", path.display());
        }
        None => reporter.report(&run.result)?,
    }

    if run.below(config.report.fail_under) {
        tracing::warn!(
            score = run.result.score,
            fail_under = config.report.fail_under,
            "Score below configured floor"
        );
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}
