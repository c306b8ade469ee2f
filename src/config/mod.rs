use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::services::BatchPolicy;
use crate::currency::CurrencyFormat;
use crate::errors::{FinanceError, Result};
use crate::ledger::{NotificationSettings, RecurrencePolicy, HOME_PENDING_LIMIT};
use crate::utils::{app_data_dir, config_file_in, data_file_in, ensure_dir, write_atomic};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    pub ui_color_enabled: bool,
    pub notifications: NotificationSettings,
    pub recurrence: RecurrencePolicy,
    pub batch: BatchPolicy,
    /// Pending items listed on the home view.
    pub upcoming_limit: usize,
    /// Transaction file; defaults to `transactions.json` in the data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            ui_color_enabled: true,
            notifications: NotificationSettings::default(),
            recurrence: RecurrencePolicy::default(),
            batch: BatchPolicy::default(),
            upcoming_limit: HOME_PENDING_LIMIT,
            data_file: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.notifications.validate()?;
        self.recurrence.validate()?;
        if self.upcoming_limit == 0 {
            return Err(FinanceError::Config(
                "upcoming_limit must be at least 1".into(),
            ));
        }
        if self.currency.trim().is_empty() {
            return Err(FinanceError::Config("currency must not be empty".into()));
        }
        Ok(())
    }

    pub fn currency_format(&self) -> CurrencyFormat {
        CurrencyFormat::for_locale(&self.locale, &self.currency)
    }
}

/// Loads and saves [`Config`] under the application data directory.
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
            base,
        })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Transaction file selected by `config`, relative paths resolved against the base dir.
    pub fn data_file(&self, config: &Config) -> PathBuf {
        match &config.data_file {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self.base.join(path),
            None => data_file_in(&self.base),
        }
    }

    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        tracing::debug!(path = %self.path.display(), "configuration saved");
        Ok(())
    }
}
