pub mod file;
pub mod traits;

// Re-export
pub use file::FileGoalRecordRepository;
pub use traits::GoalRecordRepository;
