use chrono::NaiveDate;
use serde_json::Value;

use crate::error::GoalError;
use crate::model::failed_days::FailedDays;
use crate::model::record::ImportReport;
use crate::time::{format_date, is_valid_date_string};

const EXPORT_FILE_PREFIX: &str = "GoalTracker_FailedDays_";

/// Every failed day, sorted. Nothing else is exported.
pub fn export_failed_days(failed_days: &FailedDays) -> Vec<String> {
    failed_days.keys().map(str::to_string).collect()
}

/// Pretty printed JSON array of dates, the export file body.
pub fn export_json(failed_days: &FailedDays) -> Result<String, GoalError> {
    serde_json::to_string_pretty(&export_failed_days(failed_days))
        .map_err(|e| GoalError::format(e.to_string()))
}

pub fn export_file_name(today: NaiveDate) -> String {
    format!("{}{}.json", EXPORT_FILE_PREFIX, format_date(today))
}

/// Parses an import file body. Anything that is not JSON is a format error.
pub fn import_json(content: &str, today: NaiveDate) -> Result<(FailedDays, ImportReport), GoalError> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| GoalError::format(format!("could not parse JSON: {}", e)))?;
    import_failed_days(&value, today)
}

/// Builds a fresh failed-day set from an imported list.
///
/// The caller replaces its whole set with the result. Invalid and future
/// dates are counted and skipped, a non-array payload aborts the import.
pub fn import_failed_days(value: &Value, today: NaiveDate) -> Result<(FailedDays, ImportReport), GoalError> {
    let items = value
        .as_array()
        .ok_or_else(|| GoalError::format("the file must contain a JSON array of dates"))?;

    let today_key = format_date(today);
    let mut imported = FailedDays::new();
    let mut report = ImportReport::default();

    for item in items {
        report.total += 1;

        let text = match item {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let key = text.trim();

        if !is_valid_date_string(key) {
            report.invalid_count += 1;
        } else if key > today_key.as_str() {
            report.future_count += 1;
        } else {
            imported.insert_key(key)?;
        }
    }

    report.imported = imported.len();
    tracing::debug!(
        total = report.total,
        invalid = report.invalid_count,
        future = report.future_count,
        imported = report.imported,
        "import processed"
    );
    Ok((imported, report))
}
