//! # filetally CLI
//!
//! Validates file-observation logs and prints extension and hourly-hash
//! reports.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `filetally extensions <FILE>` | Distinct filename stems per extension |
//! | `filetally hourly <FILE>` | Content-hash counts per hour of day |
//! | `filetally run --extensions <FILE> --hourly <FILE>` | Both reports, one source each |
//! | `filetally validate <FILE>` | List every rejected line and why |
//!
//! ## Examples
//!
//! ```bash
//! filetally extensions ./logs/agent.log
//! filetally hourly ./logs/agent.log --zone utc --format json
//! filetally run --extensions a.log --hourly b.log --config ./filetally.toml
//! FILETALLY_LOG=debug filetally validate ./logs/agent.log
//! ```

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::error;

use filetally::clock::Clock;
use filetally::config::{self, Config};
use filetally::ingest;
use filetally::logging::{self, Verbosity};
use filetally::report::{OutputFormat, ReportRenderer};

/// filetally: validate file-observation logs and tally extensions and
/// hourly content hashes.
///
/// Input files hold one JSON object per line. Lines that fail validation are
/// skipped with a warning on stderr; reports are printed on stdout.
#[derive(Parser)]
#[command(
    name = "filetally",
    about = "Validate file-observation logs and tally extensions and hourly content hashes",
    version
)]
struct Cli {
    /// Path to an optional configuration file (TOML).
    ///
    /// Without it, hours are read in the local time zone, output is human
    /// text, and the log filter is `warn`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format; overrides `output.format` from the config file.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Log debug detail, including tokenizer errors.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Count distinct filename stems per file extension.
    Extensions {
        /// Log file with one JSON record per line.
        file: PathBuf,
    },

    /// Count each content hash per hour of day.
    Hourly {
        /// Log file with one JSON record per line.
        file: PathBuf,

        /// Calendar to read hours in; overrides `clock.zone`.
        #[arg(long, value_enum)]
        zone: Option<Clock>,
    },

    /// Produce both reports, each from its own source.
    ///
    /// A source that cannot be read is logged and skipped; the other report
    /// is still produced.
    Run {
        /// Source for the extension report.
        #[arg(long)]
        extensions: Option<PathBuf>,

        /// Source for the hourly-hash report.
        #[arg(long)]
        hourly: Option<PathBuf>,

        /// Calendar to read hours in; overrides `clock.zone`.
        #[arg(long, value_enum)]
        zone: Option<Clock>,
    },

    /// Check every line and list the rejected ones.
    ///
    /// Exits with status 1 when any line is rejected.
    Validate {
        /// Log file with one JSON record per line.
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => Config::minimal(),
    };

    logging::init_subscriber(Verbosity::from_flags(cli.verbose, cli.quiet), &cfg.log.filter);

    let renderer = cli.format.unwrap_or(cfg.output.format).renderer();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Extensions { file } => {
            report_extensions(renderer.as_ref(), &mut out, &file)?;
        }
        Commands::Hourly { file, zone } => {
            let clock = zone.unwrap_or(cfg.clock.zone);
            report_hourly(renderer.as_ref(), &mut out, &file, clock)?;
        }
        Commands::Run {
            extensions,
            hourly,
            zone,
        } => {
            if extensions.is_none() && hourly.is_none() {
                anyhow::bail!("run needs at least one of --extensions or --hourly");
            }
            if let Some(path) = extensions {
                report_extensions(renderer.as_ref(), &mut out, &path)?;
            }
            if let Some(path) = hourly {
                let clock = zone.unwrap_or(cfg.clock.zone);
                report_hourly(renderer.as_ref(), &mut out, &path, clock)?;
            }
        }
        Commands::Validate { file } => {
            let report = ingest::lint_file(&file)?;
            renderer
                .lint(&mut out, &file.display().to_string(), &report)
                .context("Failed to write report")?;
            if report.stats.rejected > 0 {
                out.flush()?;
                std::process::exit(1);
            }
        }
    }

    out.flush()?;
    Ok(())
}

/// Run one source into the extension report. A source that cannot be read
/// is logged and does not fail the process.
fn report_extensions(
    renderer: &dyn ReportRenderer,
    out: &mut dyn Write,
    path: &Path,
) -> anyhow::Result<()> {
    match ingest::run_extensions(path) {
        Ok(tally) => renderer
            .extensions(out, &tally)
            .context("Failed to write report")?,
        Err(e) => error!(error = %e, "skipping source"),
    }
    Ok(())
}

fn report_hourly(
    renderer: &dyn ReportRenderer,
    out: &mut dyn Write,
    path: &Path,
    clock: Clock,
) -> anyhow::Result<()> {
    match ingest::run_hourly(path, clock) {
        Ok(tally) => renderer.hourly(out, &tally).context("Failed to write report")?,
        Err(e) => error!(error = %e, "skipping source"),
    }
    Ok(())
}
