use std::{collections::HashMap, io::BufReader, path::Path};

use serde::Deserialize;
use tracing::warn;

use crate::timesheet::classify::classify;
use crate::timesheet::employee::{DayRecord, Employee, TimesheetDocument};
use crate::timesheet::error::{Result, TimesheetError};

/// One filled cell of an imported roster: who worked, which day, and `"HH:MM-HH:MM"`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImportRow {
    pub subject_name: String,
    pub date_key: String,
    pub time_range: String,
}

pub fn split_time_range(time_range: &str) -> Option<(&str, &str)> {
    let (start, end) = time_range.split_once('-')?;
    let (start, end) = (start.trim(), end.trim());

    if start.is_empty() || end.is_empty() {
        None
    } else {
        Some((start, end))
    }
}

/// Classify imported rows into day records grouped by employee id.
///
/// Rows for unknown employees or with unusable ranges are logged and skipped.
pub fn import_rows(
    rows: &[ImportRow],
    employees: &[Employee],
) -> HashMap<String, HashMap<String, DayRecord>> {
    let mut imported: HashMap<String, HashMap<String, DayRecord>> = HashMap::new();

    for row in rows {
        if row.time_range.trim().is_empty() {
            continue;
        }

        let Some(employee) = employees.iter().find(|e| e.name == row.subject_name) else {
            warn!("employee \"{}\" not found, skipping {}", row.subject_name, row.date_key);
            continue;
        };

        let Some((start, end)) = split_time_range(&row.time_range) else {
            warn!(
                "invalid time range \"{}\" for {} on {}",
                row.time_range, row.subject_name, row.date_key
            );
            continue;
        };

        match classify(start, end, false, false) {
            Ok(Some(shift)) => {
                imported
                    .entry(employee.id.clone())
                    .or_default()
                    .insert(row.date_key.clone(), DayRecord::from_shift(start, end, false, shift));
            }
            Ok(None) => {}
            Err(err) => warn!(
                "skipping {} on {}: {}",
                row.subject_name, row.date_key, err
            ),
        }
    }

    imported
}

/// Merge imported days into the document, leaving days that were not imported alone.
pub fn apply_import(
    document: &mut TimesheetDocument,
    imported: HashMap<String, HashMap<String, DayRecord>>,
) {
    for (employee_id, days) in imported {
        document
            .timesheets
            .entry(employee_id)
            .or_default()
            .merge(days);
    }
}

pub fn read_import_rows(path: &Path) -> Result<Vec<ImportRow>> {
    let file = std::fs::File::open(path).map_err(|source| TimesheetError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(serde_json::from_reader(BufReader::new(file))?)
}
