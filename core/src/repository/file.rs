use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde_json::{Map, Value};

use crate::identity::UserId;
use crate::model::record::PersistedRecord;
use crate::repository::traits::GoalRecordRepository;

const DOCUMENT_FILE_NAME: &str = "day_records.json";

/// One JSON document per user at
/// `<base>/artifacts/<app_id>/users/<user_id>/goal_data/day_records.json`.
#[derive(Clone)]
pub struct FileGoalRecordRepository {
    base_dir: PathBuf,
    app_id: String,
}

impl FileGoalRecordRepository {
    pub fn new(base_dir: PathBuf, app_id: impl Into<String>) -> Self {
        Self {
            base_dir,
            app_id: app_id.into(),
        }
    }

    fn document_path(&self, user: &UserId) -> PathBuf {
        self.base_dir
            .join("artifacts")
            .join(&self.app_id)
            .join("users")
            .join(user.as_str())
            .join("goal_data")
            .join(DOCUMENT_FILE_NAME)
    }

    fn read_document(&self, path: &Path) -> Result<Option<Map<String, Value>>> {
        if !path.exists() {
            return Ok(None);
        }
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        match serde_json::from_reader(reader)? {
            Value::Object(map) => Ok(Some(map)),
            _ => Err(anyhow!("Document {} is not a JSON object", path.display())),
        }
    }

    fn write_document(&self, path: &Path, document: &Map<String, Value>) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?; // Ensure the directory exists
        }
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, document)?;
        writer.flush()?;
        Ok(())
    }
}

impl GoalRecordRepository for FileGoalRecordRepository {
    fn load(&self, user: &UserId) -> Result<Option<PersistedRecord>> {
        let path = self.document_path(user);
        let document = match self.read_document(&path)? {
            Some(doc) => doc,
            None => return Ok(None),
        };
        let record = serde_json::from_value(Value::Object(document))
            .with_context(|| format!("Malformed record in {}", path.display()))?;
        Ok(Some(record))
    }

    fn save(&self, user: &UserId, record: &PersistedRecord) -> Result<()> {
        let path = self.document_path(user);
        let mut document = self.read_document(&path)?.unwrap_or_default();

        match serde_json::to_value(record)? {
            Value::Object(fields) => {
                for (key, value) in fields {
                    document.insert(key, value);
                }
            }
            _ => return Err(anyhow!("Record did not serialize to an object")),
        }

        self.write_document(&path, &document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::failed_days::FailedDays;
    use tempfile::TempDir;

    fn record(keys: &[&str], start: &str) -> PersistedRecord {
        let mut failed_days = FailedDays::new();
        for key in keys {
            failed_days.insert_key(key).unwrap();
        }
        PersistedRecord {
            failed_days,
            start_date_string: Some(start.to_string()),
        }
    }

    #[test]
    fn test_missing_document_is_none() {
        let dir = TempDir::new().unwrap();
        let repo = FileGoalRecordRepository::new(dir.path().to_path_buf(), "app");
        assert_eq!(repo.load(&UserId::new("alice")).unwrap(), None);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let repo = FileGoalRecordRepository::new(dir.path().to_path_buf(), "app");
        let user = UserId::new("alice");
        let saved = record(&["2025-10-08"], "2025-10-06");

        repo.save(&user, &saved).unwrap();
        assert_eq!(repo.load(&user).unwrap(), Some(saved));

        let expected_path = dir
            .path()
            .join("artifacts/app/users/alice/goal_data/day_records.json");
        assert!(expected_path.exists());
    }

    #[test]
    fn test_records_are_isolated_per_user_and_app() {
        let dir = TempDir::new().unwrap();
        let repo = FileGoalRecordRepository::new(dir.path().to_path_buf(), "app");
        let other_app = FileGoalRecordRepository::new(dir.path().to_path_buf(), "other");

        repo.save(&UserId::new("alice"), &record(&["2025-10-08"], "2025-10-06")).unwrap();

        assert_eq!(repo.load(&UserId::new("bob")).unwrap(), None);
        assert_eq!(other_app.load(&UserId::new("alice")).unwrap(), None);
    }

    #[test]
    fn test_save_merges_with_unrelated_fields() {
        let dir = TempDir::new().unwrap();
        let repo = FileGoalRecordRepository::new(dir.path().to_path_buf(), "app");
        let user = UserId::new("alice");
        let path = repo.document_path(&user);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            r#"{ "theme": "dark", "failedDays": { "2025-01-01": true } }"#,
        )
        .unwrap();

        repo.save(&user, &record(&["2025-10-08"], "2025-10-06")).unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["theme"], "dark");
        assert_eq!(raw["failedDays"], serde_json::json!({ "2025-10-08": true }));
        assert_eq!(raw["startDateString"], "2025-10-06");
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        let dir = TempDir::new().unwrap();
        let repo = FileGoalRecordRepository::new(dir.path().to_path_buf(), "app");
        let user = UserId::new("alice");
        let path = repo.document_path(&user);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[1, 2, 3]").unwrap();

        assert!(repo.load(&user).is_err());
    }
}
