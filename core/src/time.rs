use std::sync::LazyLock;

use chrono::{Datelike, Locale, Months, NaiveDate, NaiveTime};
use regex::Regex;

use crate::error::GoalError;

static DATE_KEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date key regex is valid"));

// 2023-01-02 is a Monday
const REFERENCE_MONDAY: NaiveDate = match NaiveDate::from_ymd_opt(2023, 1, 2) {
    Some(d) => d,
    None => panic!("reference monday is a valid date"),
};

/// Canonical `YYYY-MM-DD` key for a day. Every failed-day key is produced here.
pub fn format_date(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// True when `s` has the `YYYY-MM-DD` shape and names a day that exists,
/// so `2025-02-30` is rejected instead of rolling over into March.
pub fn is_valid_date_string(s: &str) -> bool {
    parse_date_key(s).is_ok()
}

/// Checked inverse of [`format_date`].
pub fn parse_date_key(s: &str) -> Result<NaiveDate, GoalError> {
    if !DATE_KEY_REGEX.is_match(s) {
        return Err(GoalError::validation(format!("'{}' is not a YYYY-MM-DD date", s)));
    }

    let mut parts = s.split('-');
    let (year, month, day) = match (parts.next(), parts.next(), parts.next()) {
        (Some(y), Some(m), Some(d)) => (y, m, d),
        _ => return Err(GoalError::validation(format!("'{}' is not a YYYY-MM-DD date", s))),
    };
    let year: i32 = year.parse().map_err(|_| GoalError::validation(format!("invalid year in '{}'", s)))?;
    let month: u32 = month.parse().map_err(|_| GoalError::validation(format!("invalid month in '{}'", s)))?;
    let day: u32 = day.parse().map_err(|_| GoalError::validation(format!("invalid day in '{}'", s)))?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| GoalError::validation(format!("'{}' is not a real calendar date", s)))
}

/// Parses a `YYYY-MM` month selector into the first day of that month.
pub fn parse_month(s: &str) -> Result<NaiveDate, GoalError> {
    parse_date_key(&format!("{}-01", s.trim()))
        .map_err(|_| GoalError::validation(format!("'{}' is not a YYYY-MM month", s)))
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Every day of the month containing `reference`, ascending.
pub fn days_in_month(reference: NaiveDate) -> Vec<NaiveDate> {
    let first = first_of_month(reference);
    first
        .iter_days()
        .take_while(|d| d.month() == first.month())
        .collect()
}

/// Number of blank cells before the 1st in a Monday-first grid.
pub fn month_start_offset(reference: NaiveDate) -> usize {
    first_of_month(reference).weekday().num_days_from_monday() as usize
}

/// First day of the month `delta` months away from `reference`.
pub fn shift_month(reference: NaiveDate, delta: i32) -> NaiveDate {
    let first = first_of_month(reference);
    let months = Months::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        first.checked_add_months(months)
    } else {
        first.checked_sub_months(months)
    };
    shifted.unwrap_or(first)
}

/// Accepts both `es-ES` and `es_ES`. Unknown names fall back to `en_US`.
pub fn resolve_locale(name: &str) -> Locale {
    let normalized = name.trim().replace('-', "_");
    match Locale::try_from(normalized.as_str()) {
        Ok(locale) => locale,
        Err(_) => {
            tracing::warn!(locale = name, "unknown locale, falling back to en_US");
            Locale::en_US
        }
    }
}

/// Short weekday names, Monday first, capitalized and cut to 3 characters.
pub fn weekday_labels(locale: &str) -> [String; 7] {
    let locale = resolve_locale(locale);
    std::array::from_fn(|i| {
        let day = REFERENCE_MONDAY + chrono::Days::new(i as u64);
        let name = localized(day, "%a", locale);
        capitalize(&name).chars().take(3).collect()
    })
}

/// Localized "Month Year" heading, e.g. `Octubre 2025`.
pub fn month_title(reference: NaiveDate, locale: &str) -> String {
    let locale = resolve_locale(locale);
    capitalize(&localized(reference, "%B %Y", locale))
}

fn localized(date: NaiveDate, fmt: &str, locale: Locale) -> String {
    date.and_time(NaiveTime::MIN)
        .and_utc()
        .format_localized(fmt, locale)
        .to_string()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
