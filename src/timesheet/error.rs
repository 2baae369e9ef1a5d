use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while classifying shifts or summarizing timesheets.
#[derive(Error, Debug)]
pub enum TimesheetError {
    /// A wall-clock value was not `HH:MM` with hours 0-23 and minutes 0-59.
    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(String),

    /// The next-day flag was set on a shift whose end is already after its start,
    /// which would make a single day's record longer than 24 hours.
    #[error("Shift {start}-{end} is marked as next day but ends after it starts")]
    InconsistentSpan { start: String, end: String },

    #[error("Invalid month {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("Unknown sort field: {0}")]
    UnknownSortField(String),

    #[error("Unknown sort order: {0}")]
    UnknownSortOrder(String),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TimesheetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_time_format() {
        let err = TimesheetError::InvalidTimeFormat("25:00".to_string());
        assert_eq!(err.to_string(), "Invalid time format: 25:00");
    }

    #[test]
    fn test_error_display_inconsistent_span() {
        let err = TimesheetError::InconsistentSpan {
            start: "09:00".to_string(),
            end: "17:00".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Shift 09:00-17:00 is marked as next day but ends after it starts"
        );
    }

    #[test]
    fn test_error_display_file_read() {
        let err = TimesheetError::FileRead {
            path: PathBuf::from("/missing/timesheets.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/missing/timesheets.json"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops}").unwrap_err();
        let err: TimesheetError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }
}
