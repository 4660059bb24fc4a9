use std::path::PathBuf;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use goaltracker_core::{
    AppConfig, FileGoalRecordRepository, GoalError, GoalSession, IdentityProvider,
    LocalIdentityProvider, UserId,
};

/// Everything a command needs once startup has finished.
pub struct Workspace {
    pub config: AppConfig,
    pub repo: FileGoalRecordRepository,
    pub user: UserId,
    pub session: GoalSession,
    /// Non-fatal problem hit while loading, shown to the user.
    pub load_warning: Option<String>,
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl Workspace {
    /// Loads config, signs in and loads the user's record.
    ///
    /// Config and sign-in failures stop here. A failing load does not: the
    /// session comes up with defaults and a warning.
    pub fn open(data_dir: PathBuf) -> Result<Self> {
        let config = AppConfig::load(&data_dir)?;
        let identity = LocalIdentityProvider::new(config.data_dir.clone(), config.auth_token.clone());
        let user = identity.sign_in()?;
        tracing::debug!(user = %user, app_id = %config.app_id, "signed in");

        let repo = FileGoalRecordRepository::new(config.data_dir.clone(), config.app_id.clone());
        let mut session = GoalSession::new(config.start_date);
        let load_warning = session
            .load_from(&repo, &user, today())
            .err()
            .map(|e| e.to_string());

        Ok(Self {
            config,
            repo,
            user,
            session,
            load_warning,
        })
    }

    pub fn save(&mut self) -> Result<bool, GoalError> {
        self.session.save_to(&self.repo, &self.user)
    }

    /// Saves and turns the outcome into a status line.
    pub fn save_message(&mut self) -> String {
        match self.save() {
            Ok(true) => "Changes saved.".to_string(),
            Ok(false) => "Nothing to save, data is in sync.".to_string(),
            Err(e) => format!("Error: {}", e),
        }
    }
}
