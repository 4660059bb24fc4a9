use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::GoalError;
use crate::time::{format_date, is_valid_date_string, parse_date_key};

/// Days explicitly marked as failed, keyed by `YYYY-MM-DD`.
///
/// Stored as `{ "2025-10-08": true, ... }`. Only present `true` entries are
/// kept and every key is a real calendar date; anything else is dropped when
/// a stored record is read back.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(from = "BTreeMap<String, bool>")]
pub struct FailedDays(BTreeMap<String, bool>);

impl FailedDays {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, day: NaiveDate) {
        self.0.insert(format_date(day), true);
    }

    /// Inserts an already formatted key, rejecting anything that is not a real date.
    pub fn insert_key(&mut self, key: &str) -> Result<(), GoalError> {
        let day = parse_date_key(key)?;
        self.insert(day);
        Ok(())
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.contains_key(&format_date(day))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.get(key).copied().unwrap_or(false)
    }

    /// Flips a day between failed and not failed. Returns true when the day is now failed.
    pub fn toggle(&mut self, day: NaiveDate) -> bool {
        let key = format_date(day);
        if self.0.remove(&key).is_some() {
            false
        } else {
            self.0.insert(key, true);
            true
        }
    }

    /// Keys in ascending order. Lexicographic order of canonical keys is chronological.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, bool>> for FailedDays {
    fn from(raw: BTreeMap<String, bool>) -> Self {
        let mut days = BTreeMap::new();
        for (key, failed) in raw {
            if !failed {
                continue;
            }
            if !is_valid_date_string(&key) {
                tracing::warn!(key = %key, "dropping invalid failed-day key");
                continue;
            }
            days.insert(key, true);
        }
        FailedDays(days)
    }
}

impl FromIterator<NaiveDate> for FailedDays {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        let mut days = FailedDays::new();
        for day in iter {
            days.insert(day);
        }
        days
    }
}
