use serde::Serialize;
use tracing::debug;

use crate::timesheet::error::{Result, TimesheetError};
use crate::timesheet::time_of_day::{TimeOfDay, MINUTES_PER_DAY, MINUTES_PER_HOUR};

/// Hours worked in a day before the rest counts as overtime.
pub const REGULAR_DAY_HOURS: u32 = 8;

// Night zones on a 48 hour timeline starting at midnight of the shift's first day:
// [00:00, 06:00), [22:00, 06:00 next day) and [22:00 next day, 24:00 next day).
const NIGHT_ZONES: [(u32, u32); 3] = [
    (0, 6 * MINUTES_PER_HOUR),
    (22 * MINUTES_PER_HOUR, 30 * MINUTES_PER_HOUR),
    (46 * MINUTES_PER_HOUR, 48 * MINUTES_PER_HOUR),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftInput {
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub spans_midnight: bool,
    pub is_holiday: bool,
}

/// How many minutes of a shift fall in the night zone and in the day zone,
/// before any overtime is carved out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZoneSplit {
    pub night_minutes: u32,
    pub day_minutes: u32,
}

/// Hours of one day's shift split by category, each rounded to one decimal.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ShiftResult {
    pub total_time: f64,
    pub night_shift: f64,
    pub normal_time: f64,
    pub over_time: f64,
    pub holiday_time: f64,
}

impl ShiftInput {
    /// Length of the shift in minutes.
    ///
    /// The end is taken to be on the following day whenever it is not after the start,
    /// so `22:00-06:00` is eight hours and `02:00-02:00` is a full day. Setting
    /// `spans_midnight` on a shift that already ends after it starts is rejected.
    pub fn duration_minutes(&self) -> Result<u32> {
        let start = self.start_time.minutes();
        let end = self.end_time.minutes();

        if end > start {
            if self.spans_midnight {
                return Err(TimesheetError::InconsistentSpan {
                    start: self.start_time.to_string(),
                    end: self.end_time.to_string(),
                });
            }
            Ok(end - start)
        } else {
            Ok(end + MINUTES_PER_DAY - start)
        }
    }

    pub fn zone_split(&self) -> Result<ZoneSplit> {
        let duration = self.duration_minutes()?;
        let start = self.start_time.minutes();
        let end = start + duration;

        let night_minutes: u32 = NIGHT_ZONES
            .iter()
            .map(|&(zone_start, zone_end)| overlap(start, end, zone_start, zone_end))
            .sum();

        Ok(ZoneSplit {
            night_minutes,
            day_minutes: duration - night_minutes,
        })
    }

    pub fn classify(&self) -> Result<ShiftResult> {
        let total = self.duration_minutes()?;

        if self.is_holiday {
            return Ok(ShiftResult {
                total_time: tenths_of_hour(total),
                holiday_time: tenths_of_hour(total),
                ..ShiftResult::default()
            });
        }

        let split = self.zone_split()?;
        let overtime = total.saturating_sub(REGULAR_DAY_HOURS * MINUTES_PER_HOUR);
        // A shift of at most a day holds at most eight night hours, so this never underflows.
        let normal = total - split.night_minutes - overtime;

        let result = ShiftResult {
            total_time: tenths_of_hour(total),
            night_shift: tenths_of_hour(split.night_minutes),
            normal_time: tenths_of_hour(normal),
            over_time: tenths_of_hour(overtime),
            holiday_time: 0.,
        };
        debug!(
            "classified {}-{} next_day={}: {:?}",
            self.start_time, self.end_time, self.spans_midnight, result
        );

        Ok(result)
    }
}

/// Classify a shift given as wall-clock strings.
///
/// Returns `Ok(None)` when either time is blank, since an incomplete entry is not an error.
pub fn classify(
    start_time: &str,
    end_time: &str,
    spans_midnight: bool,
    is_holiday: bool,
) -> Result<Option<ShiftResult>> {
    if start_time.trim().is_empty() || end_time.trim().is_empty() {
        return Ok(None);
    }

    let input = ShiftInput {
        start_time: start_time.parse()?,
        end_time: end_time.parse()?,
        spans_midnight,
        is_holiday,
    };

    input.classify().map(Some)
}

fn overlap(start: u32, end: u32, zone_start: u32, zone_end: u32) -> u32 {
    end.min(zone_end).saturating_sub(start.max(zone_start))
}

// minutes / 6 is the value in tenths of an hour; adding 3 first rounds halves up.
fn tenths_of_hour(minutes: u32) -> f64 {
    ((minutes + 3) / 6) as f64 / 10.
}
