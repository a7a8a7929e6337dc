// src/lib.rs
//! Race-card scraper.
//!
//! ```text
//! scrape::Orchestrator → core::net (fetch) → specs (classify + extract)
//!                      → csv/file (encode + write) → artifacts
//! trigger (CLI / telegram bot) drives a run and delivers the files.
//! ```

#[macro_use]
pub mod macros;

pub mod cancel;
pub mod config;
pub mod core;
pub mod csv;
pub mod error;
pub mod file;
pub mod log;
pub mod model;
pub mod progress;
pub mod scrape;
pub mod specs;
pub mod telegram;
pub mod trigger;

#[cfg(feature = "cli")]
pub mod cli;

pub use cancel::CancelToken;
pub use config::Config;
pub use model::{HorseRow, RaceCardDocument, RaceEntry, VenueDateKey};
pub use scrape::{Orchestrator, RunSummary};
