//! Ingestion driver.
//!
//! Pulls lines from a source, validates and decodes each one, and hands the
//! accepted records to a [`RecordSink`]. Rejected lines are logged and
//! counted; they never reach the sink. A source that cannot be opened or
//! read ends with a [`SourceError`] and leaves other sources unaffected.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::decode::decode_line;
use crate::error::{ContractError, LineError, SourceError};
use crate::extensions::ExtensionIndex;
use crate::hourly::HourlyHashIndex;
use crate::models::FileRecord;
use crate::validate::check_line;

/// Consumer of accepted records.
///
/// Implemented by [`ExtensionIndex`] and [`HourlyHashIndex`]. A sink only
/// ever sees records whose line passed validation.
pub trait RecordSink {
    fn accept(&mut self, record: &FileRecord) -> Result<(), ContractError>;
}

/// Sink that drops every record; used when only validation matters.
pub struct Discard;

impl RecordSink for Discard {
    fn accept(&mut self, _record: &FileRecord) -> Result<(), ContractError> {
        Ok(())
    }
}

/// Line counts for one pass over a source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub lines: u64,
    pub accepted: u64,
    pub rejected: u64,
}

/// Result of running one source into one aggregator.
#[derive(Debug, Clone)]
pub struct Tally<I> {
    pub source: PathBuf,
    pub index: I,
    pub stats: RunStats,
}

/// Every rejected line of a source, in order.
#[derive(Debug, Default)]
pub struct LintReport {
    pub stats: RunStats,
    pub rejections: Vec<(u64, LineError)>,
}

/// Open `path` for buffered line reading.
pub fn open_source(path: &Path) -> Result<BufReader<File>, SourceError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })
}

/// Feed every line of `reader` through validation into `sink`, logging a
/// warning for each rejected line.
pub fn ingest_lines<R, S>(reader: R, label: &str, sink: &mut S) -> Result<RunStats, SourceError>
where
    R: BufRead,
    S: RecordSink + ?Sized,
{
    let stats = walk_lines(reader, label, sink, |line, reason| {
        warn!(source = label, line, %reason, "skipping invalid log line");
    })?;
    info!(
        source = label,
        lines = stats.lines,
        accepted = stats.accepted,
        rejected = stats.rejected,
        "finished source"
    );
    Ok(stats)
}

/// Validate every line of `reader` without aggregating, collecting each
/// rejection with its 1-based line number.
pub fn lint_lines<R: BufRead>(reader: R, label: &str) -> Result<LintReport, SourceError> {
    let mut rejections = Vec::new();
    let stats = walk_lines(reader, label, &mut Discard, |line, reason| {
        rejections.push((line, reason));
    })?;
    Ok(LintReport { stats, rejections })
}

/// Accept a single line into `sink`.
pub fn route_line<S>(line: &str, sink: &mut S) -> Result<(), LineError>
where
    S: RecordSink + ?Sized,
{
    check_line(line)?;
    let record = decode_line(line)?;
    sink.accept(&record)?;
    Ok(())
}

fn walk_lines<R, S, F>(reader: R, label: &str, sink: &mut S, mut on_reject: F) -> Result<RunStats, SourceError>
where
    R: BufRead,
    S: RecordSink + ?Sized,
    F: FnMut(u64, LineError),
{
    let mut stats = RunStats::default();

    for line in reader.lines() {
        let line_no = stats.lines + 1;
        let line = line.map_err(|source| SourceError::Read {
            label: label.to_string(),
            line: line_no,
            source,
        })?;
        stats.lines = line_no;

        match route_line(&line, sink) {
            Ok(()) => stats.accepted += 1,
            Err(reason) => {
                stats.rejected += 1;
                on_reject(line_no, reason);
            }
        }
    }

    Ok(stats)
}

/// Run the file at `path` into `sink`.
pub fn tally_file<S>(path: &Path, sink: &mut S) -> Result<RunStats, SourceError>
where
    S: RecordSink + ?Sized,
{
    let reader = open_source(path)?;
    ingest_lines(reader, &path.display().to_string(), sink)
}

/// Build the extension report for one source.
pub fn run_extensions(path: &Path) -> Result<Tally<ExtensionIndex>, SourceError> {
    let mut index = ExtensionIndex::new();
    let stats = tally_file(path, &mut index)?;
    Ok(Tally {
        source: path.to_path_buf(),
        index,
        stats,
    })
}

/// Build the hourly-hash report for one source, reading hours in `clock`.
pub fn run_hourly(path: &Path, clock: Clock) -> Result<Tally<HourlyHashIndex>, SourceError> {
    let mut index = HourlyHashIndex::new(clock);
    let stats = tally_file(path, &mut index)?;
    Ok(Tally {
        source: path.to_path_buf(),
        index,
        stats,
    })
}

/// Validate every line of the file at `path`.
pub fn lint_file(path: &Path) -> Result<LintReport, SourceError> {
    let reader = open_source(path)?;
    lint_lines(reader, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::encode_record;
    use crate::error::ShapeError;
    use crate::models::Disposition;
    use std::io::Cursor;
    use uuid::Uuid;

    fn line(timestamp: i64, sha: &str, file_name: &str) -> String {
        encode_record(&FileRecord {
            timestamp,
            processing_time: 5,
            session_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            business_id: Uuid::new_v4(),
            sha: sha.to_string(),
            file_name: file_name.to_string(),
            file_path: format!("/srv/share/{}", file_name),
            disposition: Disposition::Clean,
        })
    }

    #[test]
    fn test_rejected_lines_do_not_reach_sink() {
        let input = [
            line(0, "a", "f1.ext1"),
            "{invalid}".to_string(),
            String::new(),
            line(0, "b", "f2.ext1"),
            line(0, "c", "f1.ext3"),
        ]
        .join("\n");

        let mut index = ExtensionIndex::new();
        let stats = ingest_lines(Cursor::new(input), "memory", &mut index).unwrap();

        assert_eq!(
            stats,
            RunStats {
                lines: 5,
                accepted: 3,
                rejected: 2
            }
        );
        assert_eq!(index.count("ext1"), Some(2));
        assert_eq!(index.count("ext3"), Some(1));
    }

    #[test]
    fn test_crlf_line_endings() {
        let input = format!("{}\r\n{}\r\n", line(0, "a", "x.pdf"), line(0, "a", "y.pdf"));
        let mut index = ExtensionIndex::new();
        let stats = ingest_lines(Cursor::new(input), "memory", &mut index).unwrap();
        assert_eq!(stats.accepted, 2);
        assert_eq!(index.count("pdf"), Some(2));
    }

    #[test]
    fn test_hourly_through_driver() {
        // 2020-06-05T14:xx:xxZ
        let input = [
            line(1_591_365_600, "a", "a.bin"),
            line(1_591_366_800, "a", "b.bin"),
            line(1_591_369_199, "b", "c.bin"),
        ]
        .join("\n");
        let mut index = HourlyHashIndex::new(Clock::Utc);
        ingest_lines(Cursor::new(input), "memory", &mut index).unwrap();

        assert_eq!(index.counts().count(), 1);
        assert_eq!(index.count(14, "a"), 2);
        assert_eq!(index.count(14, "b"), 1);
    }

    #[test]
    fn test_lint_collects_line_numbers() {
        let input = [
            line(0, "a", "ok.txt"),
            line(0, "a", ".."),
            line(0, "", "ok.txt"),
        ]
        .join("\n");
        let report = lint_lines(Cursor::new(input), "memory").unwrap();

        assert_eq!(report.stats.accepted, 1);
        assert_eq!(report.stats.rejected, 2);
        let lines: Vec<u64> = report.rejections.iter().map(|(n, _)| *n).collect();
        assert_eq!(lines, vec![2, 3]);
        assert!(matches!(
            report.rejections[1].1,
            LineError::Shape(ShapeError::BlankValue { .. })
        ));
    }

    #[test]
    fn test_negative_zero_is_a_shape_rejection() {
        let input = line(0, "a", "x.pdf").replacen("\"ts\":0", "\"ts\":-0", 1);
        let report = lint_lines(Cursor::new(input), "memory").unwrap();

        assert_eq!(report.stats.rejected, 1);
        assert!(matches!(
            report.rejections[0].1,
            LineError::Shape(ShapeError::NotWholeNumber { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let err = run_extensions(Path::new("/nonexistent/filetally/input.log")).unwrap_err();
        assert!(matches!(err, SourceError::Open { .. }));
        assert!(err.to_string().contains("input.log"));
    }

    #[test]
    fn test_invalid_utf8_ends_source() {
        let bytes = [line(0, "a", "x.pdf").into_bytes(), b"\n\xff\xfe\n".to_vec()].concat();
        let mut index = ExtensionIndex::new();
        let err = ingest_lines(Cursor::new(bytes), "memory", &mut index).unwrap_err();
        assert!(matches!(err, SourceError::Read { line: 2, .. }));
        assert_eq!(index.count("pdf"), Some(1));
    }
}
