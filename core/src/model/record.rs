use serde::{Deserialize, Serialize};

use crate::model::failed_days::FailedDays;

/// Snapshot stored per user in the record store.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedRecord {
    #[serde(default)]
    pub failed_days: FailedDays,
    // Older documents were written without a start date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date_string: Option<String>,
}

/// Derived from the failed days, the start date and today. Never stored.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreStreak {
    /// In hundredths of the configured currency.
    pub score: u64,
    pub current_streak: u64,
}

/// Outcome of an import, reported back to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub total: usize,
    pub invalid_count: usize,
    pub future_count: usize,
    pub imported: usize,
}

impl ImportReport {
    pub fn ignored(&self) -> usize {
        self.invalid_count + self.future_count
    }

    pub fn summary(&self) -> String {
        let mut msg = format!("Import complete: {} failed days loaded.", self.imported);
        if self.ignored() > 0 {
            msg.push_str(&format!(" ({} dates ignored:", self.ignored()));
            if self.invalid_count > 0 {
                msg.push_str(&format!(" {} invalid format.", self.invalid_count));
            }
            if self.future_count > 0 {
                msg.push_str(&format!(" {} in the future.", self.future_count));
            }
            msg.push(')');
        } else {
            msg.push_str(&format!(" ({} dates processed.)", self.total));
        }
        msg
    }
}
