use std::{fmt, str::FromStr};

use chrono::{NaiveTime, Timelike};

use crate::timesheet::error::TimesheetError;

pub const MINUTES_PER_HOUR: u32 = 60;
pub const MINUTES_PER_DAY: u32 = 24 * MINUTES_PER_HOUR;

/// A local wall-clock time in `[00:00, 24:00)`, kept as whole minutes past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    pub fn minutes(self) -> u32 {
        self.0
    }

    /// `hours + minutes / 60`
    pub fn hours(self) -> f64 {
        self.0 as f64 / MINUTES_PER_HOUR as f64
    }
}

impl FromStr for TimeOfDay {
    type Err = TimesheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let time = NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map_err(|_| TimesheetError::InvalidTimeFormat(s.to_string()))?;

        Ok(TimeOfDay(time.hour() * MINUTES_PER_HOUR + time.minute()))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}",
            self.0 / MINUTES_PER_HOUR,
            self.0 % MINUTES_PER_HOUR
        )
    }
}
