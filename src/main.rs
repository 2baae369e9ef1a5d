mod bootstrap;
mod settings;

use settings::{Command, Settings};
use std::{io::Write, str::FromStr};
use timesheet_totals::timesheet::{
    classify::classify,
    import::{apply_import, import_rows, read_import_rows},
    summarize_month::{read_timesheets, sort_summaries, summarize_month, SortField, SortOrder},
};

use anyhow::{Context, Error};
use chrono::{Datelike, Local};
use clap::Parser;
use tracing::info;

fn main() -> Result<(), Error> {
    let settings = Settings::parse();
    bootstrap::setup_logging(&settings.log_level)?;

    match settings.command {
        Command::Summarize {
            timesheet,
            year,
            month,
            today,
            sort_by,
            order,
            group,
            import,
            output,
        } => {
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            let year = year.unwrap_or(today.year());
            let month = month.unwrap_or(today.month());

            let mut document = read_timesheets(&timesheet)
                .with_context(|| format!("Failed to load timesheets: {}", timesheet.display()))?;

            if let Some(import) = import {
                let rows = read_import_rows(&import)
                    .with_context(|| format!("Failed to load import rows: {}", import.display()))?;
                let imported = import_rows(&rows, &document.employees);
                info!("imported {} rows for {} employees", rows.len(), imported.len());
                apply_import(&mut document, imported);
            }

            let mut summaries = summarize_month(&document, year, month, today, group.as_deref())?;
            sort_summaries(
                &mut summaries,
                SortField::from_str(&sort_by)?,
                SortOrder::from_str(&order)?,
            );

            let mut file = std::fs::File::create(&output)
                .with_context(|| format!("Failed to create file: {}", output.display()))?;
            file.write_all(serde_json::to_string_pretty(&summaries)?.as_bytes())?;
            info!("wrote {} summaries to {}", summaries.len(), output.display());
        }

        Command::Classify {
            start,
            end,
            next_day,
            holiday,
        } => {
            let shift = classify(&start, &end, next_day, holiday)?
                .context("both a start and an end time are needed")?;
            println!("{}", serde_json::to_string_pretty(&shift)?);
        }
    }

    Ok(())
}
