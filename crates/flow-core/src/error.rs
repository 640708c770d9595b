use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// All errors produced by flow-metrics.
#[derive(Error, Debug)]
pub enum FlowError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The activity log is not structurally valid CSV (missing columns,
    /// ragged rows, undecodable bytes).
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A duration cell is not a valid ISO-8601 elapsed time.
    #[error("Invalid duration {value:?} on line {line}: {reason}")]
    DurationParse {
        line: u64,
        value: String,
        reason: String,
    },

    /// Summed durations of one timesheet row exceed the representable range.
    #[error("Total duration overflows on {date} for {label}")]
    DurationOverflow { date: NaiveDate, label: String },

    /// A calendar date argument could not be parsed.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// A span ends before it starts.
    #[error("Invalid span {label}: start {start} is after end {end}")]
    InvalidSpan {
        label: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    /// A JSON document could not be parsed or produced.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the flow crates.
pub type Result<T> = std::result::Result<T, FlowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = FlowError::FileRead {
            path: PathBuf::from("/some/activity-log.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/some/activity-log.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_duration_parse() {
        let err = FlowError::DurationParse {
            line: 7,
            value: "1h30".to_string(),
            reason: "missing 'P' designator".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid duration \"1h30\" on line 7: missing 'P' designator"
        );
    }

    #[test]
    fn test_error_display_invalid_date() {
        let err = FlowError::InvalidDate("2024-13-01".to_string());
        assert_eq!(err.to_string(), "Invalid date: 2024-13-01");
    }

    #[test]
    fn test_error_display_invalid_span() {
        let err = FlowError::InvalidSpan {
            label: "ACME / Website / Login".to_string(),
            start: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid span ACME / Website / Login: start 2024-01-03 is after end 2024-01-01"
        );
    }

    #[test]
    fn test_error_display_config() {
        let err = FlowError::Config("no activity log given".to_string());
        assert_eq!(err.to_string(), "Configuration error: no activity log given");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: FlowError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: FlowError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }

    #[test]
    fn test_error_from_csv() {
        let data = "a,b\n1,2,3\n";
        let mut rdr = csv::Reader::from_reader(data.as_bytes());
        let csv_err = rdr
            .records()
            .find_map(|r| r.err())
            .expect("ragged row must fail");
        let err: FlowError = csv_err.into();
        assert!(err.to_string().starts_with("Failed to parse CSV"));
    }
}
