pub mod failed_days;
pub mod record;
pub mod streak;

pub use failed_days::FailedDays;
pub use record::{ImportReport, PersistedRecord, ScoreStreak};
pub use streak::{compute_score_and_streak, day_status, format_money, DayStatus};
