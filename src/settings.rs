use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Classify work shifts and total them per month
#[derive(Parser, Debug, Clone)]
#[command(name = "timesheet_totals", version)]
pub struct Settings {
    /// Logging level
    #[arg(long, global = true, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Write monthly totals for every employee in a timesheet export
    Summarize {
        /// Exported employees and timesheets (JSON)
        timesheet: PathBuf,

        /// Defaults to the year of --today
        #[arg(long)]
        year: Option<i32>,

        /// Defaults to the month of --today
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// Last day counted towards worked and expected hours (YYYY-MM-DD, defaults to the local date)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Monthly total to sort employees by
        #[arg(long, default_value = "totalTime", value_parser = ["normalTime", "nightShift", "overTime", "holidayTime", "totalTime"])]
        sort_by: String,

        /// Sort order
        #[arg(long, default_value = "asc", value_parser = ["asc", "desc"])]
        order: String,

        /// Only summarize employees in this group
        #[arg(long)]
        group: Option<String>,

        /// Roster rows (JSON) to classify and merge before summarizing
        #[arg(long)]
        import: Option<PathBuf>,

        #[arg(long, default_value = "./employee_summaries.json")]
        output: PathBuf,
    },

    /// Classify a single shift and print the result
    Classify {
        /// Start time, HH:MM
        start: String,

        /// End time, HH:MM
        end: String,

        /// The shift ends on the following day
        #[arg(long)]
        next_day: bool,

        /// The whole shift counts as holiday time
        #[arg(long)]
        holiday: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_defaults() {
        let settings = Settings::parse_from(["timesheet_totals", "summarize", "hours.json"]);
        assert_eq!(settings.log_level, "INFO");

        let Command::Summarize {
            timesheet,
            year,
            month,
            today,
            sort_by,
            order,
            group,
            import,
            output,
        } = settings.command
        else {
            panic!("expected summarize");
        };
        assert_eq!(timesheet, PathBuf::from("hours.json"));
        assert_eq!((year, month, today), (None, None, None));
        assert_eq!(sort_by, "totalTime");
        assert_eq!(order, "asc");
        assert_eq!(group, None);
        assert_eq!(import, None);
        assert_eq!(output, PathBuf::from("./employee_summaries.json"));
    }

    #[test]
    fn test_summarize_options() {
        let settings = Settings::parse_from([
            "timesheet_totals",
            "--log-level",
            "DEBUG",
            "summarize",
            "hours.json",
            "--month",
            "10",
            "--today",
            "2026-10-16",
            "--sort-by",
            "nightShift",
            "--order",
            "desc",
        ]);
        assert_eq!(settings.log_level, "DEBUG");

        let Command::Summarize {
            month,
            today,
            sort_by,
            order,
            ..
        } = settings.command
        else {
            panic!("expected summarize");
        };
        assert_eq!(month, Some(10));
        assert_eq!(today, NaiveDate::from_ymd_opt(2026, 10, 16));
        assert_eq!(sort_by, "nightShift");
        assert_eq!(order, "desc");
    }

    #[test]
    fn test_rejects_invalid_month() {
        let result = Settings::try_parse_from(["timesheet_totals", "summarize", "a.json", "--month", "13"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_classify_flags() {
        let settings = Settings::parse_from(["timesheet_totals", "classify", "22:00", "06:00", "--next-day"]);
        let Command::Classify {
            start,
            end,
            next_day,
            holiday,
        } = settings.command
        else {
            panic!("expected classify");
        };
        assert_eq!((start.as_str(), end.as_str()), ("22:00", "06:00"));
        assert!(next_day);
        assert!(!holiday);
    }
}
