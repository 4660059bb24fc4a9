use thiserror::Error;

/// Every failure the tracker reports to the user. Each one is recovered at the
/// boundary where it happens and turned into a status line; none of them
/// unwinds past the session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GoalError {
    /// Rejected user input. Prior state is kept.
    #[error("{0}")]
    Validation(String),
    /// Import payload that is not a JSON array of dates.
    #[error("invalid import file: {0}")]
    Format(String),
    /// Load or save against the record store failed.
    #[error("storage error: {0}")]
    Storage(String),
    /// Sign-in failed; initialization stops without data.
    #[error("authentication error: {0}")]
    Auth(String),
    /// Missing or malformed startup configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl GoalError {
    pub fn validation(msg: impl Into<String>) -> Self {
        GoalError::Validation(msg.into())
    }

    pub fn format(msg: impl Into<String>) -> Self {
        GoalError::Format(msg.into())
    }
}
