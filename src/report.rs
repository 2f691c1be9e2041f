//! Report presentation.
//!
//! Renders finished tallies either as human-readable text or as one JSON
//! document per report. Reports go to stdout; logs stay on stderr so the
//! output remains parseable for scripts. Entries are sorted so output is
//! stable across runs even though the indexes themselves are unordered.

use std::collections::BTreeMap;
use std::io::{self, Write};

use serde::Deserialize;

use crate::error::LineError;
use crate::extensions::ExtensionIndex;
use crate::hourly::HourlyHashIndex;
use crate::ingest::{LintReport, RunStats, Tally};

/// Output mode for the CLI: human text or JSON.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

impl OutputFormat {
    /// Build a renderer for this format.
    pub fn renderer(&self) -> Box<dyn ReportRenderer> {
        match self {
            OutputFormat::Human => Box::new(HumanReport),
            OutputFormat::Json => Box::new(JsonReport),
        }
    }
}

/// Writes finished reports.
pub trait ReportRenderer {
    fn extensions(&self, out: &mut dyn Write, tally: &Tally<ExtensionIndex>) -> io::Result<()>;
    fn hourly(&self, out: &mut dyn Write, tally: &Tally<HourlyHashIndex>) -> io::Result<()>;
    fn lint(&self, out: &mut dyn Write, label: &str, report: &LintReport) -> io::Result<()>;
}

/// Extension counts sorted by extension.
pub fn sorted_extension_counts(index: &ExtensionIndex) -> BTreeMap<&str, usize> {
    index.counts().collect()
}

/// Hash counts sorted by hour, then by hash.
pub fn sorted_hourly_counts(index: &HourlyHashIndex) -> BTreeMap<u32, BTreeMap<&str, u64>> {
    index
        .counts()
        .map(|(hour, hashes)| {
            let hashes = hashes
                .iter()
                .map(|(sha, count)| (sha.as_str(), *count))
                .collect();
            (hour, hashes)
        })
        .collect()
}

/// `ext: count` lines, one hour block per hour.
pub struct HumanReport;

impl HumanReport {
    fn summary(out: &mut dyn Write, stats: &RunStats) -> io::Result<()> {
        writeln!(
            out,
            "  lines: {}  accepted: {}  rejected: {}",
            format_number(stats.lines),
            format_number(stats.accepted),
            format_number(stats.rejected)
        )
    }
}

impl ReportRenderer for HumanReport {
    fn extensions(&self, out: &mut dyn Write, tally: &Tally<ExtensionIndex>) -> io::Result<()> {
        writeln!(out, "extensions {}", tally.source.display())?;
        Self::summary(out, &tally.stats)?;
        for (ext, count) in sorted_extension_counts(&tally.index) {
            writeln!(out, "{}: {}", ext, format_number(count as u64))?;
        }
        Ok(())
    }

    fn hourly(&self, out: &mut dyn Write, tally: &Tally<HourlyHashIndex>) -> io::Result<()> {
        writeln!(
            out,
            "hourly {} ({})",
            tally.source.display(),
            tally.index.clock().name()
        )?;
        Self::summary(out, &tally.stats)?;
        for (hour, hashes) in sorted_hourly_counts(&tally.index) {
            writeln!(out, "{:02}:00", hour)?;
            for (sha, count) in hashes {
                writeln!(out, "  {}: {}", sha, format_number(count))?;
            }
        }
        Ok(())
    }

    fn lint(&self, out: &mut dyn Write, label: &str, report: &LintReport) -> io::Result<()> {
        writeln!(out, "validate {}", label)?;
        for (line, reason) in &report.rejections {
            writeln!(out, "  line {}: {}", line, reason)?;
        }
        Self::summary(out, &report.stats)
    }
}

/// Machine-readable output: one JSON object per report.
pub struct JsonReport;

impl JsonReport {
    fn write(out: &mut dyn Write, value: &serde_json::Value) -> io::Result<()> {
        serde_json::to_writer(&mut *out, value)?;
        writeln!(out)
    }
}

impl ReportRenderer for JsonReport {
    fn extensions(&self, out: &mut dyn Write, tally: &Tally<ExtensionIndex>) -> io::Result<()> {
        Self::write(
            out,
            &serde_json::json!({
                "report": "extensions",
                "source": tally.source.display().to_string(),
                "stats": tally.stats,
                "extensions": sorted_extension_counts(&tally.index),
            }),
        )
    }

    fn hourly(&self, out: &mut dyn Write, tally: &Tally<HourlyHashIndex>) -> io::Result<()> {
        Self::write(
            out,
            &serde_json::json!({
                "report": "hourly",
                "source": tally.source.display().to_string(),
                "zone": tally.index.clock().name(),
                "stats": tally.stats,
                "hours": sorted_hourly_counts(&tally.index),
            }),
        )
    }

    fn lint(&self, out: &mut dyn Write, label: &str, report: &LintReport) -> io::Result<()> {
        let rejections: Vec<serde_json::Value> = report
            .rejections
            .iter()
            .map(|(line, reason)| {
                serde_json::json!({
                    "line": line,
                    "kind": rejection_kind(reason),
                    "reason": reason.to_string(),
                })
            })
            .collect();
        Self::write(
            out,
            &serde_json::json!({
                "report": "validate",
                "source": label,
                "stats": report.stats,
                "rejections": rejections,
            }),
        )
    }
}

fn rejection_kind(reason: &LineError) -> &'static str {
    match reason {
        LineError::Shape(_) => "shape",
        LineError::Contract(_) => "contract",
    }
}

fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    let chars: Vec<char> = s.chars().rev().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }
    result.chars().rev().collect()
}
