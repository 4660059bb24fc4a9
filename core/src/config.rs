use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::GoalError;
use crate::time::{format_date, parse_date_key};

pub const CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_LOCALE: &str = "es-ES";
const DEFAULT_CURRENCY: &str = "EUR";

/// On-disk shape of `config.json`. `appId` and `startDate` are required.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    app_id: String,
    start_date: String,
    #[serde(default = "default_locale")]
    locale: String,
    #[serde(default = "default_currency")]
    currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auth_token: Option<String>,
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

/// Startup configuration, handed explicitly to everything that needs it.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Namespace for stored records.
    pub app_id: String,
    /// Start date used until the user stores their own.
    pub start_date: NaiveDate,
    pub data_dir: PathBuf,
    pub locale: String,
    pub currency: String,
    /// Custom sign-in token; anonymous sign-in when absent.
    pub auth_token: Option<String>,
}

impl AppConfig {
    pub fn new(app_id: impl Into<String>, start_date: NaiveDate, data_dir: PathBuf) -> Self {
        Self {
            app_id: app_id.into(),
            start_date,
            data_dir,
            locale: default_locale(),
            currency: default_currency(),
            auth_token: None,
        }
    }

    /// `~/.goaltracker` unless a directory is given.
    pub fn resolve_data_dir(data_dir: Option<PathBuf>) -> Result<PathBuf, GoalError> {
        match data_dir {
            Some(dir) => Ok(dir),
            None => {
                let home_dir = dirs::home_dir()
                    .ok_or_else(|| GoalError::Config("could not determine home directory".to_string()))?;
                Ok(home_dir.join(".goaltracker"))
            }
        }
    }

    pub fn config_path(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE_NAME)
    }

    pub fn load(data_dir: &Path) -> Result<Self, GoalError> {
        let path = Self::config_path(data_dir);
        if !path.exists() {
            return Err(GoalError::Config(format!(
                "{} not found; run `goaltracker init` first",
                path.display()
            )));
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| GoalError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json(&content, data_dir.to_path_buf())
    }

    pub fn from_json(content: &str, data_dir: PathBuf) -> Result<Self, GoalError> {
        let file: ConfigFile =
            serde_json::from_str(content).map_err(|e| GoalError::Config(e.to_string()))?;

        let app_id = file.app_id.trim();
        if app_id.is_empty() || app_id.contains(['/', '\\']) || app_id == "." || app_id == ".." {
            return Err(GoalError::Config(format!("appId '{}' is not usable", file.app_id)));
        }
        let start_date = parse_date_key(file.start_date.trim())
            .map_err(|e| GoalError::Config(format!("startDate: {}", e)))?;

        Ok(Self {
            app_id: app_id.to_string(),
            start_date,
            data_dir,
            locale: file.locale,
            currency: file.currency,
            auth_token: file.auth_token,
        })
    }

    pub fn write(&self) -> Result<(), GoalError> {
        let to_config_error = |e: std::io::Error| GoalError::Config(e.to_string());

        fs::create_dir_all(&self.data_dir).map_err(to_config_error)?;
        let file = ConfigFile {
            app_id: self.app_id.clone(),
            start_date: format_date(self.start_date),
            locale: self.locale.clone(),
            currency: self.currency.clone(),
            auth_token: self.auth_token.clone(),
        };
        let path = Self::config_path(&self.data_dir);
        let mut writer = BufWriter::new(File::create(&path).map_err(to_config_error)?);
        serde_json::to_writer_pretty(&mut writer, &file).map_err(|e| GoalError::Config(e.to_string()))?;
        writer.flush().map_err(to_config_error)?;
        Ok(())
    }
}
