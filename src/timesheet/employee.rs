use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::timesheet::classify::{classify, ShiftResult};
use crate::timesheet::error::Result;
use crate::timesheet::summarize_month::{MonthlyTotal, VarianceStatus};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub group: String,
}

/// One subject's shift for one calendar day, as stored under its `"M-DD"` key.
///
/// Numbers written by older clients may be strings, and `normalTime` may be blank,
/// so every hour field is optional and read leniently.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default, deserialize_with = "lenient_hours")]
    pub total_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient_hours")]
    pub night_shift: Option<f64>,
    #[serde(default, deserialize_with = "lenient_hours")]
    pub holiday_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient_hours")]
    pub over_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient_hours")]
    pub normal_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_holiday: bool,
}

impl DayRecord {
    pub fn from_shift(start_time: &str, end_time: &str, is_holiday: bool, shift: ShiftResult) -> Self {
        DayRecord {
            start_time: start_time.trim().to_string(),
            end_time: end_time.trim().to_string(),
            total_time: Some(shift.total_time),
            night_shift: Some(shift.night_shift),
            holiday_time: Some(shift.holiday_time),
            over_time: Some(shift.over_time),
            normal_time: Some(shift.normal_time),
            is_holiday,
        }
    }
}

/// All stored days for one employee, keyed by `"M-DD"`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct Timesheet {
    #[serde(default, deserialize_with = "skip_malformed_days")]
    pub hours: HashMap<String, DayRecord>,
}

impl Timesheet {
    /// Classify a shift and store it under `date_key`, replacing whatever was there.
    ///
    /// Blank times leave the timesheet untouched and return `Ok(None)`. A time that
    /// fails to parse returns the error and keeps the previous record for that day.
    pub fn record_shift(
        &mut self,
        date_key: &str,
        start_time: &str,
        end_time: &str,
        spans_midnight: bool,
        is_holiday: bool,
    ) -> Result<Option<&DayRecord>> {
        let Some(shift) = classify(start_time, end_time, spans_midnight, is_holiday)? else {
            return Ok(None);
        };

        self.upsert(
            date_key,
            DayRecord::from_shift(start_time, end_time, is_holiday, shift),
        );
        Ok(self.hours.get(date_key))
    }

    pub fn upsert(&mut self, date_key: &str, record: DayRecord) {
        self.hours.insert(date_key.to_string(), record);
    }

    /// Overwrite the days present in `imported`, keeping every other stored day.
    pub fn merge(&mut self, imported: HashMap<String, DayRecord>) {
        self.hours.extend(imported);
    }
}

/// The stored employees and their timesheets, keyed by employee id.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct TimesheetDocument {
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub timesheets: HashMap<String, Timesheet>,
}

/// A stored day paired with its `"M-DD"` key.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub date_key: String,
    #[serde(flatten)]
    pub record: DayRecord,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeMonthSummary {
    pub employee_id: String,
    pub name: String,
    pub group: String,
    /// `"YYYY-MM"`
    pub month: String,
    pub monthly_total: MonthlyTotal,
    pub worked_hours: f64,
    pub expected_hours: f64,
    pub variance: VarianceStatus,
    /// Recorded days of the month in day order.
    pub days: Vec<DailyRecord>,
}

fn lenient_hours<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let hours = match &value {
        Value::Null => return Ok(None),
        Value::String(text) if text.trim().is_empty() => return Ok(None),
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    match hours.filter(|hours| hours.is_finite()) {
        Some(hours) => Ok(Some(hours)),
        None => {
            warn!("ignoring unreadable hour value {}", value);
            Ok(None)
        }
    }
}

// Truthiness the way the browser client stored it: any non-empty, non-zero value counts.
fn lenient_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(flag) => flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0. && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

fn skip_malformed_days<'de, D>(
    deserializer: D,
) -> std::result::Result<HashMap<String, DayRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<HashMap<String, Value>> = Option::deserialize(deserializer)?;

    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(date_key, value)| match serde_json::from_value(value) {
            Ok(record) => Some((date_key, record)),
            Err(err) => {
                warn!("skipping malformed record for {}: {}", date_key, err);
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_day_record_with_string_numbers() {
        let record: DayRecord = serde_json::from_value(json!({
            "startTime": "22:00",
            "endTime": "06:00",
            "totalTime": "8.0",
            "nightShift": 8,
            "holidayTime": "0",
            "overTime": 0,
            "normalTime": "",
            "isHoliday": false
        }))
        .unwrap();

        assert_eq!(record.start_time, "22:00");
        assert_eq!(record.total_time, Some(8.0));
        assert_eq!(record.night_shift, Some(8.0));
        assert_eq!(record.holiday_time, Some(0.0));
        assert_eq!(record.normal_time, None);
        assert!(!record.is_holiday);
    }

    #[test]
    fn test_read_day_record_with_missing_and_unreadable_fields() {
        let record: DayRecord = serde_json::from_value(json!({
            "startTime": "08:00",
            "endTime": "16:00",
            "totalTime": "eight",
            "normalTime": null,
            "nightShift": "NaN",
            "isHoliday": "yes"
        }))
        .unwrap();

        assert_eq!(record.total_time, None);
        assert_eq!(record.normal_time, None);
        assert_eq!(record.night_shift, None);
        assert_eq!(record.over_time, None);
        assert!(record.is_holiday);
    }

    #[test]
    fn test_holiday_flag_truthiness() {
        let cases = [
            (json!(true), true),
            (json!(false), false),
            (json!(1), true),
            (json!(0), false),
            (json!("yes"), true),
            (json!(""), false),
            (json!(null), false),
        ];

        for (flag, expected) in cases {
            let record: DayRecord =
                serde_json::from_value(json!({"startTime": "08:00", "isHoliday": flag.clone()}))
                    .unwrap();
            assert_eq!(record.is_holiday, expected, "isHoliday = {flag}");
        }

        let record: DayRecord = serde_json::from_value(json!({"startTime": "08:00"})).unwrap();
        assert!(!record.is_holiday);
    }

    #[test]
    fn test_malformed_day_is_skipped() {
        let timesheet: Timesheet = serde_json::from_value(json!({
            "hours": {
                "10-01": {"startTime": "09:00", "endTime": "17:00", "totalTime": 8},
                "10-02": "not a record",
                "10-03": {"startTime": 9}
            }
        }))
        .unwrap();

        assert_eq!(timesheet.hours.len(), 1);
        assert_eq!(timesheet.hours["10-01"].total_time, Some(8.0));
    }

    #[test]
    fn test_record_shift_replaces_whole_day() {
        let mut timesheet = Timesheet::default();
        timesheet.upsert(
            "10-05",
            DayRecord {
                start_time: "06:00".to_string(),
                end_time: "18:00".to_string(),
                over_time: Some(4.0),
                ..DayRecord::default()
            },
        );
        timesheet.upsert("10-06", DayRecord::default());

        let record = timesheet
            .record_shift("10-05", "09:00", "17:00", false, false)
            .unwrap()
            .unwrap();
        assert_eq!(record.over_time, Some(0.0));
        assert_eq!(record.normal_time, Some(8.0));
        assert_eq!(record.start_time, "09:00");
        assert_eq!(timesheet.hours.len(), 2);
    }

    #[test]
    fn test_record_shift_keeps_previous_day_on_error() {
        let mut timesheet = Timesheet::default();
        timesheet
            .record_shift("10-05", "09:00", "17:00", false, false)
            .unwrap();
        let before = timesheet.clone();

        assert!(timesheet
            .record_shift("10-05", "09:00", "27:00", false, false)
            .is_err());
        assert_eq!(timesheet, before);

        assert!(timesheet
            .record_shift("10-05", "", "18:00", false, false)
            .unwrap()
            .is_none());
        assert_eq!(timesheet, before);
    }

    #[test]
    fn test_merge_only_touches_imported_days() {
        let mut timesheet = Timesheet::default();
        timesheet
            .record_shift("10-01", "09:00", "17:00", false, false)
            .unwrap();
        timesheet
            .record_shift("10-02", "09:00", "17:00", false, false)
            .unwrap();

        let mut imported = HashMap::new();
        imported.insert(
            "10-02".to_string(),
            DayRecord {
                total_time: Some(10.0),
                ..DayRecord::default()
            },
        );
        timesheet.merge(imported);

        assert_eq!(timesheet.hours["10-01"].total_time, Some(8.0));
        assert_eq!(timesheet.hours["10-02"].total_time, Some(10.0));
    }
}
