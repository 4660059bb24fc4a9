use chrono::NaiveDate;
use serde_json::Value;

use crate::error::GoalError;
use crate::identity::UserId;
use crate::model::failed_days::FailedDays;
use crate::model::record::{ImportReport, PersistedRecord, ScoreStreak};
use crate::model::streak::{compute_score_and_streak, day_status, DayStatus};
use crate::repository::GoalRecordRepository;
use crate::service::transfer_service::{export_failed_days, import_failed_days, import_json};
use crate::time::{format_date, parse_date_key};

/// Where the working copy stands relative to the last stored snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Clean,
    Dirty,
    Saving,
}

/// Local-first working copy of one user's goal data.
///
/// Edits apply here immediately; the store only sees them on an explicit
/// save. Score and streak are recomputed from the copy on every query.
#[derive(Debug, Clone)]
pub struct GoalSession {
    failed_days: FailedDays,
    start_date: NaiveDate,
    default_start_date: NaiveDate,
    sync: SyncState,
    // An edit landed after the in-flight snapshot was taken.
    edited_while_saving: bool,
    loaded: bool,
}

impl GoalSession {
    /// Empty session that refuses edits until the first load finishes.
    pub fn new(default_start_date: NaiveDate) -> Self {
        Self {
            failed_days: FailedDays::new(),
            start_date: default_start_date,
            default_start_date,
            sync: SyncState::Clean,
            edited_while_saving: false,
            loaded: false,
        }
    }

    pub fn failed_days(&self) -> &FailedDays {
        &self.failed_days
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn sync_state(&self) -> SyncState {
        self.sync
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.sync == SyncState::Dirty || (self.sync == SyncState::Saving && self.edited_while_saving)
    }

    pub fn score(&self, today: NaiveDate) -> ScoreStreak {
        compute_score_and_streak(&self.failed_days, self.start_date, today)
    }

    pub fn day_status(&self, day: NaiveDate, today: NaiveDate) -> DayStatus {
        day_status(&self.failed_days, day, self.start_date, today)
    }

    pub fn export(&self) -> Vec<String> {
        export_failed_days(&self.failed_days)
    }

    pub fn snapshot(&self) -> PersistedRecord {
        PersistedRecord {
            failed_days: self.failed_days.clone(),
            start_date_string: Some(format_date(self.start_date)),
        }
    }

    fn ensure_loaded(&self) -> Result<(), GoalError> {
        if self.loaded {
            Ok(())
        } else {
            Err(GoalError::validation("data is still loading"))
        }
    }

    fn mark_dirty(&mut self) {
        match self.sync {
            SyncState::Clean => self.sync = SyncState::Dirty,
            SyncState::Dirty => {}
            SyncState::Saving => self.edited_while_saving = true,
        }
    }

    /// Flips a day between failed and successful. Returns true when the day is now failed.
    pub fn toggle_day(&mut self, day: NaiveDate, today: NaiveDate) -> Result<bool, GoalError> {
        self.ensure_loaded()?;
        match self.day_status(day, today) {
            DayStatus::Future => Err(GoalError::validation("future days cannot be marked")),
            DayStatus::BeforeStart => Err(GoalError::validation(format!(
                "{} is before the start date {}",
                format_date(day),
                format_date(self.start_date)
            ))),
            DayStatus::Failed | DayStatus::Success => {
                let failed = self.failed_days.toggle(day);
                self.mark_dirty();
                Ok(failed)
            }
        }
    }

    pub fn toggle_key(&mut self, key: &str, today: NaiveDate) -> Result<bool, GoalError> {
        let day = parse_date_key(key.trim())?;
        self.toggle_day(day, today)
    }

    /// Moves the start date. Rejected inputs leave every field untouched.
    pub fn set_start_date(&mut self, input: &str, today: NaiveDate) -> Result<NaiveDate, GoalError> {
        self.ensure_loaded()?;
        let date = parse_date_key(input.trim())?;
        if date > today {
            return Err(GoalError::validation("the start date cannot be later than today"));
        }
        if date != self.start_date {
            self.start_date = date;
            self.mark_dirty();
        }
        Ok(date)
    }

    /// Replaces the whole failed-day set with the imported dates.
    pub fn import(&mut self, content: &str, today: NaiveDate) -> Result<ImportReport, GoalError> {
        self.ensure_loaded()?;
        let (imported, report) = import_json(content, today)?;
        self.replace_failed_days(imported);
        Ok(report)
    }

    pub fn import_value(&mut self, value: &Value, today: NaiveDate) -> Result<ImportReport, GoalError> {
        self.ensure_loaded()?;
        let (imported, report) = import_failed_days(value, today)?;
        self.replace_failed_days(imported);
        Ok(report)
    }

    fn replace_failed_days(&mut self, imported: FailedDays) {
        self.failed_days = imported;
        self.mark_dirty();
        tracing::info!(count = self.failed_days.len(), "failed days replaced by import");
    }

    /// Overwrites the working copy with a stored record, or defaults when there is none.
    pub fn apply_record(&mut self, record: Option<PersistedRecord>, today: NaiveDate) {
        let record = record.unwrap_or_default();
        self.failed_days = record.failed_days;
        self.start_date = match record.start_date_string.as_deref().map(parse_date_key) {
            Some(Ok(date)) if date <= today => date,
            Some(Ok(date)) => {
                tracing::warn!(start = %date, "stored start date is in the future, using default");
                self.default_start_date
            }
            Some(Err(e)) => {
                tracing::warn!(error = %e, "stored start date is invalid, using default");
                self.default_start_date
            }
            None => self.default_start_date,
        };
        self.sync = SyncState::Clean;
        self.edited_while_saving = false;
        self.loaded = true;
    }

    /// Loads the user's record.
    ///
    /// A failing store never blocks the session: it is marked loaded with
    /// whatever it already holds and the error is handed back as a warning.
    pub fn load_from<R: GoalRecordRepository>(
        &mut self,
        repo: &R,
        user: &UserId,
        today: NaiveDate,
    ) -> Result<(), GoalError> {
        match repo.load(user) {
            Ok(record) => {
                tracing::info!(user = %user, found = record.is_some(), "goal data loaded");
                self.apply_record(record, today);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(user = %user, error = %e, "failed to load goal data");
                self.loaded = true;
                Err(GoalError::Storage(format!(
                    "could not load data, showing local data instead: {}",
                    e
                )))
            }
        }
    }

    /// Starts a save. `Ok(None)` when there is nothing to save.
    pub fn begin_save(&mut self) -> Result<Option<PersistedRecord>, GoalError> {
        self.ensure_loaded()?;
        match self.sync {
            SyncState::Clean => Ok(None),
            SyncState::Saving => Err(GoalError::validation("a save is already in progress")),
            SyncState::Dirty => {
                self.sync = SyncState::Saving;
                self.edited_while_saving = false;
                Ok(Some(self.snapshot()))
            }
        }
    }

    /// Ends the in-flight save. A failure keeps the changes pending.
    pub fn finish_save(&mut self, succeeded: bool) {
        if self.sync != SyncState::Saving {
            return;
        }
        self.sync = if succeeded && !self.edited_while_saving {
            SyncState::Clean
        } else {
            SyncState::Dirty
        };
        self.edited_while_saving = false;
    }

    /// Pushes pending changes to the store. Returns false when nothing was pending.
    pub fn save_to<R: GoalRecordRepository>(&mut self, repo: &R, user: &UserId) -> Result<bool, GoalError> {
        let record = match self.begin_save()? {
            Some(record) => record,
            None => return Ok(false),
        };

        match repo.save(user, &record) {
            Ok(()) => {
                self.finish_save(true);
                tracing::info!(user = %user, failed_days = record.failed_days.len(), "goal data saved");
                Ok(true)
            }
            Err(e) => {
                self.finish_save(false);
                tracing::warn!(user = %user, error = %e, "failed to save goal data");
                Err(GoalError::Storage(format!("could not save, try again: {}", e)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use std::cell::RefCell;

    struct MockRepo {
        stored: RefCell<Option<PersistedRecord>>,
        fail_load: bool,
        fail_save: bool,
    }

    impl MockRepo {
        fn new(stored: Option<PersistedRecord>) -> Self {
            Self { stored: RefCell::new(stored), fail_load: false, fail_save: false }
        }
    }

    impl GoalRecordRepository for MockRepo {
        fn load(&self, _user: &UserId) -> Result<Option<PersistedRecord>> {
            if self.fail_load {
                return Err(anyhow!("connection refused"));
            }
            Ok(self.stored.borrow().clone())
        }

        fn save(&self, _user: &UserId, record: &PersistedRecord) -> Result<()> {
            if self.fail_save {
                return Err(anyhow!("connection refused"));
            }
            *self.stored.borrow_mut() = Some(record.clone());
            Ok(())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2025, 10, 10)
    }

    fn loaded_session() -> GoalSession {
        let mut session = GoalSession::new(date(2025, 10, 6));
        session.apply_record(None, today());
        session
    }

    fn user() -> UserId {
        UserId::new("alice")
    }

    #[test]
    fn test_edits_rejected_until_loaded() {
        let mut session = GoalSession::new(date(2025, 10, 6));
        assert!(!session.is_loaded());
        assert!(matches!(session.toggle_day(date(2025, 10, 8), today()), Err(GoalError::Validation(_))));
        assert!(session.import("[]", today()).is_err());
        assert!(session.begin_save().is_err());
    }

    #[test]
    fn test_scenario_score() {
        let mut session = loaded_session();
        session.toggle_day(date(2025, 10, 8), today()).unwrap();
        assert_eq!(session.score(today()), ScoreStreak { score: 2, current_streak: 2 });
        assert_eq!(session.sync_state(), SyncState::Dirty);
    }

    #[test]
    fn test_toggle_twice_restores_failed_days() {
        let mut session = loaded_session();
        let before = session.failed_days().clone();
        assert!(session.toggle_day(date(2025, 10, 9), today()).unwrap());
        assert!(!session.toggle_day(date(2025, 10, 9), today()).unwrap());
        assert_eq!(session.failed_days(), &before);
    }

    #[test]
    fn test_toggle_rejects_future_and_pre_start_days() {
        let mut session = loaded_session();
        assert!(matches!(session.toggle_day(date(2025, 10, 11), today()), Err(GoalError::Validation(_))));
        assert!(matches!(session.toggle_day(date(2025, 10, 5), today()), Err(GoalError::Validation(_))));
        assert!(session.toggle_key("2025-02-30", today()).is_err());
        assert!(session.failed_days().is_empty());
        assert_eq!(session.sync_state(), SyncState::Clean);
    }

    #[test]
    fn test_future_start_date_is_rejected() {
        let mut session = loaded_session();
        session.toggle_day(date(2025, 10, 8), today()).unwrap();
        let failed_before = session.failed_days().clone();

        let err = session.set_start_date("2025-10-11", today()).unwrap_err();
        assert!(matches!(err, GoalError::Validation(_)));
        assert_eq!(session.start_date(), date(2025, 10, 6));
        assert_eq!(session.failed_days(), &failed_before);

        assert!(session.set_start_date("2025-13-01", today()).is_err());
        assert_eq!(session.start_date(), date(2025, 10, 6));
    }

    #[test]
    fn test_start_date_change_recomputes_score() {
        let mut session = loaded_session();
        assert_eq!(session.score(today()), ScoreStreak { score: 10, current_streak: 5 });

        session.set_start_date("2025-10-09", today()).unwrap();
        assert_eq!(session.score(today()), ScoreStreak { score: 1, current_streak: 2 });
        assert_eq!(session.sync_state(), SyncState::Dirty);
    }

    #[test]
    fn test_unchanged_start_date_stays_clean() {
        let mut session = loaded_session();
        session.set_start_date("2025-10-06", today()).unwrap();
        assert_eq!(session.sync_state(), SyncState::Clean);
    }

    #[test]
    fn test_import_replaces_instead_of_merging() {
        let mut session = loaded_session();
        session.toggle_day(date(2025, 10, 7), today()).unwrap();
        session.toggle_day(date(2025, 10, 8), today()).unwrap();

        let report = session.import("[]", today()).unwrap();
        assert_eq!(report.imported, 0);
        assert!(session.failed_days().is_empty());
        assert!(session.has_unsaved_changes());
    }

    #[test]
    fn test_import_filters_and_marks_dirty() {
        let mut session = loaded_session();
        let report = session
            .import(r#"["2025-10-09","2025-10-11","bad-date"]"#, today())
            .unwrap();
        assert_eq!(session.export(), vec!["2025-10-09"]);
        assert_eq!(report.future_count, 1);
        assert_eq!(report.invalid_count, 1);
        assert_eq!(session.sync_state(), SyncState::Dirty);
    }

    #[test]
    fn test_bad_import_leaves_state_untouched() {
        let mut session = loaded_session();
        session.toggle_day(date(2025, 10, 8), today()).unwrap();

        assert!(matches!(session.import("{}", today()), Err(GoalError::Format(_))));
        assert!(matches!(session.import("not json", today()), Err(GoalError::Format(_))));
        assert_eq!(session.export(), vec!["2025-10-08"]);
    }

    #[test]
    fn test_sync_state_transitions() {
        let mut session = loaded_session();
        assert_eq!(session.begin_save().unwrap(), None);

        session.toggle_day(date(2025, 10, 8), today()).unwrap();
        assert_eq!(session.sync_state(), SyncState::Dirty);

        let snapshot = session.begin_save().unwrap().unwrap();
        assert_eq!(snapshot.start_date_string.as_deref(), Some("2025-10-06"));
        assert_eq!(session.sync_state(), SyncState::Saving);
        assert!(matches!(session.begin_save(), Err(GoalError::Validation(_))));

        session.finish_save(false);
        assert_eq!(session.sync_state(), SyncState::Dirty);

        session.begin_save().unwrap();
        session.finish_save(true);
        assert_eq!(session.sync_state(), SyncState::Clean);
    }

    #[test]
    fn test_edit_during_save_stays_dirty() {
        let mut session = loaded_session();
        session.toggle_day(date(2025, 10, 8), today()).unwrap();
        session.begin_save().unwrap();

        session.toggle_day(date(2025, 10, 9), today()).unwrap();
        assert_eq!(session.sync_state(), SyncState::Saving);
        assert!(session.has_unsaved_changes());

        session.finish_save(true);
        assert_eq!(session.sync_state(), SyncState::Dirty);
    }

    #[test]
    fn test_load_absent_record_uses_defaults() {
        let repo = MockRepo::new(None);
        let mut session = GoalSession::new(date(2025, 10, 6));
        session.load_from(&repo, &user(), today()).unwrap();
        assert!(session.is_loaded());
        assert!(session.failed_days().is_empty());
        assert_eq!(session.start_date(), date(2025, 10, 6));
    }

    #[test]
    fn test_load_stored_record() {
        let mut session = loaded_session();
        session.toggle_day(date(2025, 10, 8), today()).unwrap();
        session.set_start_date("2025-10-07", today()).unwrap();
        let repo = MockRepo::new(Some(session.snapshot()));

        let mut fresh = GoalSession::new(date(2025, 1, 1));
        fresh.load_from(&repo, &user(), today()).unwrap();
        assert_eq!(fresh.export(), vec!["2025-10-08"]);
        assert_eq!(fresh.start_date(), date(2025, 10, 7));
        assert_eq!(fresh.sync_state(), SyncState::Clean);
    }

    #[test]
    fn test_load_ignores_future_stored_start_date() {
        let record = PersistedRecord {
            failed_days: FailedDays::new(),
            start_date_string: Some("2030-01-01".to_string()),
        };
        let mut session = GoalSession::new(date(2025, 10, 6));
        session.apply_record(Some(record), today());
        assert_eq!(session.start_date(), date(2025, 10, 6));
    }

    #[test]
    fn test_failed_load_still_unblocks() {
        let mut repo = MockRepo::new(None);
        repo.fail_load = true;
        let mut session = GoalSession::new(date(2025, 10, 6));

        let err = session.load_from(&repo, &user(), today()).unwrap_err();
        assert!(matches!(err, GoalError::Storage(_)));
        assert!(session.is_loaded());
        assert!(session.toggle_day(date(2025, 10, 8), today()).is_ok());
    }

    #[test]
    fn test_save_round_trip() {
        let repo = MockRepo::new(None);
        let mut session = loaded_session();
        assert!(!session.save_to(&repo, &user()).unwrap());

        session.toggle_day(date(2025, 10, 8), today()).unwrap();
        assert!(session.save_to(&repo, &user()).unwrap());
        assert_eq!(session.sync_state(), SyncState::Clean);
        assert_eq!(repo.stored.borrow().clone(), Some(session.snapshot()));
    }

    #[test]
    fn test_failed_save_keeps_local_edits() {
        let mut repo = MockRepo::new(None);
        repo.fail_save = true;
        let mut session = loaded_session();
        session.toggle_day(date(2025, 10, 8), today()).unwrap();

        let err = session.save_to(&repo, &user()).unwrap_err();
        assert!(matches!(err, GoalError::Storage(_)));
        assert_eq!(session.sync_state(), SyncState::Dirty);
        assert_eq!(session.export(), vec!["2025-10-08"]);

        repo.fail_save = false;
        assert!(session.save_to(&repo, &user()).unwrap());
        assert_eq!(session.sync_state(), SyncState::Clean);
    }
}
