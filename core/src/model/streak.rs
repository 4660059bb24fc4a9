use chrono::NaiveDate;
use serde::Serialize;

use crate::model::failed_days::FailedDays;
use crate::model::record::ScoreStreak;

/// Walks every day from `start` to `today` inclusive.
///
/// A failed day resets the running streak and earns nothing. A successful day
/// earns the streak length *before* it, then extends the streak, so an unbroken
/// run of `k` successes is worth `0 + 1 + ... + (k - 1)`.
pub fn compute_score_and_streak(failed_days: &FailedDays, start: NaiveDate, today: NaiveDate) -> ScoreStreak {
    if start > today {
        return ScoreStreak::default();
    }

    let mut total_score = 0u64;
    let mut consecutive_days = 0u64;
    let mut current_streak = 0u64;

    for day in start.iter_days().take_while(|d| *d <= today) {
        if failed_days.contains(day) {
            consecutive_days = 0;
        } else {
            total_score += consecutive_days;
            consecutive_days += 1;
        }

        if day == today {
            current_streak = consecutive_days;
        }
    }

    ScoreStreak {
        score: total_score,
        current_streak,
    }
}

/// How a calendar cell is shown and whether it can be toggled.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DayStatus {
    Future,
    BeforeStart,
    Failed,
    Success,
}

impl DayStatus {
    pub fn is_editable(&self) -> bool {
        matches!(self, DayStatus::Failed | DayStatus::Success)
    }
}

pub fn day_status(failed_days: &FailedDays, day: NaiveDate, start: NaiveDate, today: NaiveDate) -> DayStatus {
    if day > today {
        DayStatus::Future
    } else if day < start {
        DayStatus::BeforeStart
    } else if failed_days.contains(day) {
        DayStatus::Failed
    } else {
        DayStatus::Success
    }
}

/// Renders a score held in hundredths with exactly two decimals.
pub fn format_money(score: u64, currency: &str) -> String {
    format!("{}.{:02} {}", score / 100, score % 100, currency)
}
