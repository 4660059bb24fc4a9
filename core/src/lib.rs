pub mod config;
pub mod error;
pub mod identity;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;
pub mod usecase;

pub use config::AppConfig;
pub use error::GoalError;
pub use identity::{IdentityProvider, LocalIdentityProvider, UserId};
pub use model::{compute_score_and_streak, format_money, DayStatus, FailedDays, ImportReport, PersistedRecord, ScoreStreak};
pub use repository::{FileGoalRecordRepository, GoalRecordRepository};
pub use service::goal_service::{GoalSession, SyncState};
pub use service::transfer_service::{export_file_name, export_json, import_json};
pub use time::{days_in_month, format_date, is_valid_date_string, parse_date_key, weekday_labels};
pub use usecase::calendar::CalendarUseCase;
