// src/error.rs
//! Error taxonomy.
//!
//! Per-pair failures (`FetchError`, no data, `WriteError`) end up in a
//! `SkipReason` and never abort a run. Fields that cannot be parsed are not
//! errors at all; they degrade to empty strings in the model.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoDataCause {
    /// Page text says there are no races.
    ClassifierMatched,
    /// Page parsed but carried no race sections.
    NoRaceSections,
}

impl std::fmt::Display for NoDataCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoDataCause::ClassifierMatched => f.write_str("page indicates no races"),
            NoDataCause::NoRaceSections => f.write_str("no race sections found"),
        }
    }
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("path exists but is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not encode race card: {0}")]
    Encode(#[from] ::csv::Error),
}

/// Why a (venue, date) pair produced no artifact.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("no data: {0}")]
    NoData(NoDataCause),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error("cancelled before start")]
    Cancelled,

    #[error("page handler panicked: {0}")]
    Panicked(String),
}

impl SkipReason {
    pub fn is_no_data(&self) -> bool {
        matches!(self, SkipReason::NoData(_))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("could not build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("bot API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("bot API returned an error: {0}")]
    Api(String),

    #[error("could not read {path}: {source}")]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("console output failed: {0}")]
    Console(#[source] std::io::Error),
}
