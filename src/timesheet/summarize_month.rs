use crate::timesheet::employee;
use crate::timesheet::error::{Result, TimesheetError};
use employee::{DailyRecord, DayRecord, EmployeeMonthSummary, TimesheetDocument};
use std::{collections::HashMap, fmt, io::BufReader, path::Path, str::FromStr};

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Serialize, Serializer};
use tracing::info;

/// Hours expected for every Monday to Friday of the month.
pub const WEEKDAY_EXPECTED_HOURS: f64 = 8.;

// Half-width of the green band, and how far past it the red and yellow bands keep brightening.
const GREEN_BAND_HOURS: f64 = 10.;
const RED_SATURATION_HOURS: f64 = 50.;
const YELLOW_SATURATION_HOURS: f64 = 40.;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotal {
    #[serde(serialize_with = "serialize_tenths")]
    pub normal_time: f64,
    #[serde(serialize_with = "serialize_tenths")]
    pub night_shift: f64,
    #[serde(serialize_with = "serialize_tenths")]
    pub over_time: f64,
    #[serde(serialize_with = "serialize_tenths")]
    pub holiday_time: f64,
    #[serde(serialize_with = "serialize_tenths")]
    pub total_time: f64,
}

impl MonthlyTotal {
    /// Absent hour fields count as zero.
    pub fn add_record(&mut self, record: &DayRecord) {
        self.normal_time += record.normal_time.unwrap_or(0.);
        self.night_shift += record.night_shift.unwrap_or(0.);
        self.over_time += record.over_time.unwrap_or(0.);
        self.holiday_time += record.holiday_time.unwrap_or(0.);
        self.total_time += record.total_time.unwrap_or(0.);
    }

    pub fn field(&self, field: SortField) -> f64 {
        match field {
            SortField::NormalTime => self.normal_time,
            SortField::NightShift => self.night_shift,
            SortField::OverTime => self.over_time,
            SortField::HolidayTime => self.holiday_time,
            SortField::TotalTime => self.total_time,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    NormalTime,
    NightShift,
    OverTime,
    HolidayTime,
    TotalTime,
}

impl FromStr for SortField {
    type Err = TimesheetError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "normalTime" => Ok(SortField::NormalTime),
            "nightShift" => Ok(SortField::NightShift),
            "overTime" => Ok(SortField::OverTime),
            "holidayTime" => Ok(SortField::HolidayTime),
            "totalTime" => Ok(SortField::TotalTime),
            other => Err(TimesheetError::UnknownSortField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl FromStr for SortOrder {
    type Err = TimesheetError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "asc" => Ok(SortOrder::Ascending),
            "desc" => Ok(SortOrder::Descending),
            other => Err(TimesheetError::UnknownSortOrder(other.to_string())),
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VarianceBand {
    Green,
    Red,
    Yellow,
}

/// How far worked hours are from expected hours, and the color it is shown in.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct VarianceStatus {
    pub difference: f64,
    pub band: VarianceBand,
    pub color: Rgb,
}

/// `"M-DD"` keys for every day of the month, in day order.
pub fn month_date_keys(year: i32, month: u32) -> Result<Vec<String>> {
    Ok(month_days(year, month)?.iter().map(date_key).collect())
}

pub fn date_key(date: &NaiveDate) -> String {
    format!("{}-{:02}", date.month(), date.day())
}

fn month_days(year: i32, month: u32) -> Result<Vec<NaiveDate>> {
    let first_day = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(TimesheetError::InvalidMonth { year, month })?;

    Ok(first_day
        .iter_days()
        .take_while(|day| day.month() == month)
        .collect())
}

/// Sum each category over `month_keys`. Days without a record contribute nothing.
pub fn aggregate_month(records: &HashMap<String, DayRecord>, month_keys: &[String]) -> MonthlyTotal {
    let mut total = MonthlyTotal::default();
    for record in month_keys.iter().filter_map(|key| records.get(key)) {
        total.add_record(record);
    }
    total
}

/// The stored days of the month that have a record, in day order.
pub fn month_records(records: &HashMap<String, DayRecord>, month_keys: &[String]) -> Vec<DailyRecord> {
    month_keys
        .iter()
        .filter_map(|key| {
            records.get(key).map(|record| DailyRecord {
                date_key: key.clone(),
                record: record.clone(),
            })
        })
        .collect()
}

/// Monday to Friday dates of the month up to and including `today`.
pub fn elapsed_weekdays(year: i32, month: u32, today: NaiveDate) -> Result<u32> {
    Ok(month_days(year, month)?
        .into_iter()
        .filter(|day| *day <= today && !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
        .count() as u32)
}

pub fn expected_hours(year: i32, month: u32, today: NaiveDate) -> Result<f64> {
    Ok(elapsed_weekdays(year, month, today)? as f64 * WEEKDAY_EXPECTED_HOURS)
}

/// Normal, night and holiday hours of the month's days up to and including `today`.
///
/// Overtime is reported on its own and does not count towards the expected hours.
pub fn worked_hours_through(
    records: &HashMap<String, DayRecord>,
    year: i32,
    month: u32,
    today: NaiveDate,
) -> Result<f64> {
    Ok(month_days(year, month)?
        .iter()
        .filter(|day| **day <= today)
        .filter_map(|day| records.get(&date_key(day)))
        .map(|record| {
            record.normal_time.unwrap_or(0.)
                + record.night_shift.unwrap_or(0.)
                + record.holiday_time.unwrap_or(0.)
        })
        .sum())
}

pub fn variance_status(worked_hours: f64, expected_hours: f64) -> VarianceStatus {
    let difference = worked_hours - expected_hours;
    let band = if difference.abs() <= GREEN_BAND_HOURS {
        VarianceBand::Green
    } else if difference < 0. {
        VarianceBand::Red
    } else {
        VarianceBand::Yellow
    };

    VarianceStatus {
        difference: round_tenths(difference),
        band,
        color: color_for(worked_hours, expected_hours),
    }
}

/// Green within ten hours of the target, brightest when on it. Red when further
/// under, yellow when further over, both brightening until they saturate.
pub fn color_for(worked_hours: f64, expected_hours: f64) -> Rgb {
    let difference = worked_hours - expected_hours;

    if difference.abs() <= GREEN_BAND_HOURS {
        let green = 155. + 100. * (GREEN_BAND_HOURS - difference.abs()) / GREEN_BAND_HOURS;
        Rgb {
            r: 0,
            g: channel(green),
            b: 0,
        }
    } else if difference < 0. {
        let excess = (difference.abs() - GREEN_BAND_HOURS).min(RED_SATURATION_HOURS);
        Rgb {
            r: channel(100. + 155. * excess / RED_SATURATION_HOURS),
            g: 0,
            b: 0,
        }
    } else {
        let excess = (difference - GREEN_BAND_HOURS).min(YELLOW_SATURATION_HOURS);
        let yellow = channel(155. + 100. * excess / YELLOW_SATURATION_HOURS);
        Rgb {
            r: yellow,
            g: yellow,
            b: 0,
        }
    }
}

fn channel(value: f64) -> u8 {
    value.round().clamp(0., 255.) as u8
}

fn round_tenths(hours: f64) -> f64 {
    (hours * 10.).round() / 10.
}

// Totals keep full precision for sorting and are only rounded on output.
fn serialize_tenths<S>(hours: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(round_tenths(*hours))
}

/// Summaries for every employee (optionally only one group), in the document's employee order.
pub fn summarize_month(
    document: &TimesheetDocument,
    year: i32,
    month: u32,
    today: NaiveDate,
    group: Option<&str>,
) -> Result<Vec<EmployeeMonthSummary>> {
    let month_keys = month_date_keys(year, month)?;
    let expected = expected_hours(year, month, today)?;
    let empty = HashMap::new();
    info!(
        "summarizing {}-{:02} through {} ({} expected hours)",
        year, month, today, expected
    );

    document
        .employees
        .iter()
        .filter(|employee| group.map_or(true, |group| employee.group == group))
        .map(|employee| -> Result<EmployeeMonthSummary> {
            let records = document
                .timesheets
                .get(&employee.id)
                .map_or(&empty, |timesheet| &timesheet.hours);
            let worked = worked_hours_through(records, year, month, today)?;

            Ok(EmployeeMonthSummary {
                employee_id: employee.id.clone(),
                name: employee.name.clone(),
                group: employee.group.clone(),
                month: format!("{:04}-{:02}", year, month),
                monthly_total: aggregate_month(records, &month_keys),
                worked_hours: round_tenths(worked),
                expected_hours: expected,
                variance: variance_status(worked, expected),
                days: month_records(records, &month_keys),
            })
        })
        .collect()
}

/// Stable sort, so employees with equal totals keep their relative order.
pub fn sort_summaries(summaries: &mut [EmployeeMonthSummary], field: SortField, order: SortOrder) {
    summaries.sort_by(|a, b| {
        let (a, b) = (a.monthly_total.field(field), b.monthly_total.field(field));
        match order {
            SortOrder::Ascending => a.total_cmp(&b),
            SortOrder::Descending => b.total_cmp(&a),
        }
    });
}

pub fn read_timesheets(path: &Path) -> Result<TimesheetDocument> {
    let file = std::fs::File::open(path).map_err(|source| TimesheetError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}
