use crate::identity::UserId;
use crate::model::record::PersistedRecord;
use anyhow::Result;

/// Per-user record store. Last write wins.
pub trait GoalRecordRepository {
    /// `Ok(None)` when the user has never saved anything.
    fn load(&self, user: &UserId) -> Result<Option<PersistedRecord>>;
    /// Upserts the record, leaving unrelated fields of the stored document alone.
    fn save(&self, user: &UserId, record: &PersistedRecord) -> Result<()>;
}
