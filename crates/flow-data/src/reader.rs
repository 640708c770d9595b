//! CSV loading for activity logs.
//!
//! Reads rows with the columns `Timestamp, Duration, Client, Project, Task,
//! Notes, Category` and converts them into [`LogRecord`]s for downstream
//! aggregation.

use std::io::Read;
use std::path::Path;

use flow_core::data_processors::{DurationParser, TimestampProcessor};
use flow_core::error::{FlowError, Result};
use flow_core::models::LogRecord;
use serde::Deserialize;
use tracing::{debug, warn};

// ── Public API ────────────────────────────────────────────────────────────────

/// Records read from one activity log.
#[derive(Debug, Clone, Default)]
pub struct ReadOutcome {
    /// Every data row, in file order.
    pub records: Vec<LogRecord>,
    /// Rows whose timestamp could not be parsed (kept with `timestamp: None`).
    pub invalid_timestamps: usize,
}

/// Read the activity log at `path`.
///
/// Unparseable timestamps are tolerated; an invalid duration aborts the read
/// with [`FlowError::DurationParse`].
pub fn read_activity_log(path: &Path) -> Result<ReadOutcome> {
    let file = std::fs::File::open(path).map_err(|source| FlowError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let outcome = parse_activity_log(file)?;
    debug!(
        "Read {} records from {} ({} invalid timestamps)",
        outcome.records.len(),
        path.display(),
        outcome.invalid_timestamps
    );
    Ok(outcome)
}

/// Parse an activity log from any reader. See [`read_activity_log`].
pub fn parse_activity_log<R: Read>(input: R) -> Result<ReadOutcome> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(input);
    let headers = rdr.headers()?.clone();

    let mut outcome = ReadOutcome::default();
    let mut record = csv::StringRecord::new();

    while rdr.read_record(&mut record)? {
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let raw: RawLogRow = record.deserialize(Some(&headers))?;
        let log_record = map_to_log_record(raw, line)?;
        if log_record.timestamp.is_none() {
            outcome.invalid_timestamps += 1;
        }
        outcome.records.push(log_record);
    }

    if outcome.invalid_timestamps > 0 {
        warn!(
            "{} of {} rows have an unparseable timestamp",
            outcome.invalid_timestamps,
            outcome.records.len()
        );
    }

    Ok(outcome)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// One CSV row before typing.
#[derive(Debug, Deserialize)]
struct RawLogRow {
    #[serde(rename = "Timestamp")]
    timestamp: String,
    #[serde(rename = "Duration")]
    duration: String,
    #[serde(rename = "Client")]
    client: String,
    #[serde(rename = "Project")]
    project: String,
    #[serde(rename = "Task")]
    task: String,
    #[serde(rename = "Notes", default)]
    notes: Option<String>,
    #[serde(rename = "Category")]
    category: String,
}

fn map_to_log_record(raw: RawLogRow, line: u64) -> Result<LogRecord> {
    let timestamp = TimestampProcessor::parse(&raw.timestamp);
    if timestamp.is_none() {
        debug!("Line {}: unparseable timestamp {:?}", line, raw.timestamp);
    }

    let duration =
        DurationParser::parse(&raw.duration).map_err(|reason| FlowError::DurationParse {
            line,
            value: raw.duration.clone(),
            reason,
        })?;

    Ok(LogRecord {
        timestamp,
        duration,
        client: raw.client,
        project: raw.project,
        task: raw.task,
        category: raw.category,
        notes: raw.notes.unwrap_or_default(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const HEADER: &str = "Timestamp,Duration,Client,Project,Task,Notes,Category";

    fn write_log(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    fn parse(lines: &[&str]) -> Result<ReadOutcome> {
        let mut text = String::from(HEADER);
        for line in lines {
            text.push('\n');
            text.push_str(line);
        }
        parse_activity_log(text.as_bytes())
    }

    // ── read_activity_log ─────────────────────────────────────────────────────

    #[test]
    fn test_read_activity_log_basic() {
        let dir = TempDir::new().unwrap();
        let path = write_log(
            dir.path(),
            "activity-log.csv",
            &["2024-01-01T09:00:00Z,PT1H30M,ACME,Website,Login,First draft,Dev"],
        );

        let outcome = read_activity_log(&path).unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.invalid_timestamps, 0);

        let record = &outcome.records[0];
        assert_eq!(record.duration.num_seconds(), 5_400);
        assert_eq!(record.client, "ACME");
        assert_eq!(record.project, "Website");
        assert_eq!(record.task, "Login");
        assert_eq!(record.notes, "First draft");
        assert_eq!(record.category, "Dev");
        assert_eq!(
            record.timestamp.unwrap().to_rfc3339(),
            "2024-01-01T09:00:00+00:00"
        );
    }

    #[test]
    fn test_read_activity_log_missing_file() {
        let err = read_activity_log(Path::new("/tmp/does-not-exist-flow-test.csv")).unwrap_err();
        assert!(matches!(err, FlowError::FileRead { .. }));
    }

    #[test]
    fn test_read_activity_log_header_only() {
        let dir = TempDir::new().unwrap();
        let path = write_log(dir.path(), "empty.csv", &[]);
        let outcome = read_activity_log(&path).unwrap();
        assert!(outcome.records.is_empty());
    }

    // ── parse_activity_log ────────────────────────────────────────────────────

    #[test]
    fn test_missing_notes_become_empty_string() {
        let outcome = parse(&["2024-01-01T09:00:00Z,PT30M,ACME,Website,Login,,Dev"]).unwrap();
        assert_eq!(outcome.records[0].notes, "");
    }

    #[test]
    fn test_quoted_fields_with_commas() {
        let outcome = parse(&[
            "2024-01-01T09:00:00Z,PT30M,\"ACME, Inc.\",Website,Login,\"a, b\",Dev",
        ])
        .unwrap();
        assert_eq!(outcome.records[0].client, "ACME, Inc.");
        assert_eq!(outcome.records[0].notes, "a, b");
    }

    #[test]
    fn test_invalid_timestamp_is_tolerated() {
        let outcome = parse(&[
            "not a timestamp,PT30M,ACME,Website,Login,,Dev",
            "2024-01-01T09:00:00Z,PT30M,ACME,Website,Login,,Dev",
        ])
        .unwrap();
        assert_eq!(outcome.records.len(), 2);
        assert!(outcome.records[0].timestamp.is_none());
        assert!(outcome.records[1].timestamp.is_some());
        assert_eq!(outcome.invalid_timestamps, 1);
    }

    /// Shared buffer the fmt layer writes into.
    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_invalid_timestamps_warn_once_per_file() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let outcome = tracing::subscriber::with_default(subscriber, || {
            parse(&[
                "bad one,PT30M,ACME,Website,Login,,Dev",
                "bad two,PT30M,ACME,Website,Login,,Dev",
                "bad three,PT30M,ACME,Website,Login,,Dev",
            ])
            .unwrap()
        });
        assert_eq!(outcome.invalid_timestamps, 3);

        let logged = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        let warnings: Vec<&str> = logged.lines().filter(|l| l.contains("WARN")).collect();
        assert_eq!(warnings.len(), 1, "{logged}");
        assert!(warnings[0].contains("3 of 3 rows"), "{logged}");
    }

    #[test]
    fn test_invalid_duration_is_fatal_and_located() {
        let err = parse(&[
            "2024-01-01T09:00:00Z,PT30M,ACME,Website,Login,,Dev",
            "2024-01-01T10:00:00Z,90 minutes,ACME,Website,Login,,Dev",
        ])
        .unwrap_err();

        match err {
            FlowError::DurationParse { line, value, .. } => {
                assert_eq!(line, 3);
                assert_eq!(value, "90 minutes");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_columns_matched_by_name() {
        let text = "Client,Project,Task,Category,Notes,Duration,Timestamp\n\
                    ACME,Website,Login,Dev,,PT1H,2024-01-01T09:00:00Z\n";
        let outcome = parse_activity_log(text.as_bytes()).unwrap();
        assert_eq!(outcome.records[0].duration.num_hours(), 1);
        assert_eq!(outcome.records[0].category, "Dev");
    }

    #[test]
    fn test_header_whitespace_is_trimmed() {
        let text = "Timestamp, Duration, Client, Project, Task, Notes, Category\n\
                    2024-01-01T09:00:00Z,PT1H,ACME,Website,Login,,Dev\n";
        let outcome = parse_activity_log(text.as_bytes()).unwrap();
        assert_eq!(outcome.records.len(), 1);
    }

    #[test]
    fn test_missing_required_column_is_csv_error() {
        let text = "Timestamp,Duration,Client,Project,Notes,Category\n\
                    2024-01-01T09:00:00Z,PT1H,ACME,Website,,Dev\n";
        let err = parse_activity_log(text.as_bytes()).unwrap_err();
        assert!(matches!(err, FlowError::Csv(_)));
    }

    #[test]
    fn test_timestamps_with_offsets_normalised() {
        let outcome = parse(&["2024-01-01T23:30:00-02:00,PT30M,ACME,Website,Login,,Dev"]).unwrap();
        assert_eq!(
            outcome.records[0].date(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        );
    }
}
