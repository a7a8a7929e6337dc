// src/config/options.rs
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use super::consts::*;
use crate::error::ConfigError;

/// Everything a run needs, read once at startup and passed down explicitly.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Venue ids, in the order they are fetched for each date.
    pub venues: Vec<u32>,
    /// Today plus the following `days_ahead - 1` days.
    pub days_ahead: u32,
    pub out_dir: PathBuf,
    /// Must contain `{venue}` and `{date}`.
    pub url_template: String,
    pub timeout_secs: u64,
    pub workers: usize,
    /// Overall deadline; pairs not started by then are skipped.
    pub run_timeout_secs: Option<u64>,
    /// Only this chat identity may trigger a fetch. `None` allows anyone.
    pub allowed_user_id: Option<i64>,
    pub bot_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            venues: VENUES.to_vec(),
            days_ahead: DAYS_AHEAD,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            url_template: s!(URL_TEMPLATE),
            timeout_secs: TIMEOUT_SECS,
            workers: WORKERS,
            run_timeout_secs: None,
            allowed_user_id: None,
            bot_token: None,
        }
    }
}

impl Config {
    /// Parse a TOML config file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: Config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.venues.is_empty() {
            return Err(ConfigError::Invalid(s!("venue list is empty")));
        }
        if self.days_ahead == 0 {
            return Err(ConfigError::Invalid(s!("days_ahead must be at least 1")));
        }
        if self.workers == 0 {
            return Err(ConfigError::Invalid(s!("workers must be at least 1")));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid(s!("timeout_secs must be at least 1")));
        }
        for placeholder in ["{venue}", "{date}"] {
            if !self.url_template.contains(placeholder) {
                return Err(ConfigError::Invalid(format!(
                    "url_template is missing the {placeholder} placeholder"
                )));
            }
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn run_timeout(&self) -> Option<Duration> {
        self.run_timeout_secs.map(Duration::from_secs)
    }

    /// Token from config, else from the environment.
    pub fn resolve_bot_token(&self) -> Option<String> {
        self.bot_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| std::env::var(BOT_TOKEN_ENV).ok().filter(|t| !t.trim().is_empty()))
    }

    /// `true` when `user_id` may trigger a fetch.
    pub fn is_allowed(&self, user_id: i64) -> bool {
        self.allowed_user_id.is_none_or(|allowed| allowed == user_id)
    }
}
