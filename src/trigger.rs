// src/trigger.rs
//! The "fetch" command as a user sees it: access check, run, deliver files.
//!
//! Transport-agnostic. The chat bot (`telegram`) and the CLI both drive a
//! `Trigger` through their own `Delivery`.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};

use crate::cancel::CancelToken;
use crate::error::TriggerError;
use crate::file::{display_name, sort_by_mtime};
use crate::progress::{Progress, TraceProgress};
use crate::scrape::Orchestrator;

pub const WELCOME: &str =
    "👋 Welcome to Horse Race Bot!\nUse /fetch to download available race cards (today + next days).";
pub const DENIED: &str = "⛔ You are not authorized to use this bot.";
pub const CHECKING: &str = "🏇 Checking for available race cards... please wait ⏳";
pub const NONE_FOUND: &str = "❌ No available race cards found for upcoming days.";
pub const ALL_SENT: &str = "✅ All available race cards sent.";

/// Where replies go: a chat, a terminal, a test buffer.
pub trait Delivery {
    fn message(&mut self, text: &str) -> Result<(), TriggerError>;
    /// Send the file at `path` as an attachment called `name`.
    fn document(&mut self, path: &Path, name: &str) -> Result<(), TriggerError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Caller is not on the allow-list; nothing was fetched or written.
    Denied,
    NoneFound,
    Delivered(Vec<PathBuf>),
    /// Something unexpected happened; the user got a generic failure message.
    Failed,
}

pub struct Trigger {
    orch: Orchestrator,
}

impl Trigger {
    pub fn new(orch: Orchestrator) -> Self {
        Self { orch }
    }

    /// The single identity allowed to fetch, if access is restricted.
    pub fn allowed_user(&self) -> Option<i64> {
        self.orch.config().allowed_user_id
    }

    pub fn handle_start(&self, out: &mut dyn Delivery) -> Result<(), TriggerError> {
        out.message(WELCOME)
    }

    /// Fetch today's window on behalf of `user_id` and deliver the results.
    pub fn handle_fetch(&self, user_id: i64, out: &mut dyn Delivery) -> TriggerOutcome {
        self.handle_fetch_from(user_id, Local::now().date_naive(), out)
    }

    /// `handle_fetch` with an explicit first day.
    pub fn handle_fetch_from(&self, user_id: i64, today: NaiveDate, out: &mut dyn Delivery) -> TriggerOutcome {
        if !self.orch.config().is_allowed(user_id) {
            logw!("Rejected fetch from user {user_id}");
            if let Err(e) = out.message(DENIED) {
                loge!("Could not send denial: {e}");
            }
            return TriggerOutcome::Denied;
        }

        match self.fetch_and_deliver(today, out) {
            Ok(outcome) => outcome,
            Err(e) => {
                loge!("Fetch for user {user_id} failed: {e}");
                if let Err(e2) = out.message(&format!("❌ Unexpected error: {e}")) {
                    loge!("Could not report failure: {e2}");
                }
                TriggerOutcome::Failed
            }
        }
    }

    fn fetch_and_deliver(&self, today: NaiveDate, out: &mut dyn Delivery) -> Result<TriggerOutcome, TriggerError> {
        out.message(CHECKING)?;

        let cancel = CancelToken::from_limit(self.orch.config().run_timeout());
        let mut progress = TraceProgress::default();
        let summary = match self.orch.run_from(today, Some(&mut progress as &mut dyn Progress), &cancel) {
            Ok(s) => s,
            Err(e) => {
                loge!("Run aborted: {e}");
                out.message(&format!("❌ Unexpected error: {e}"))?;
                return Ok(TriggerOutcome::Failed);
            }
        };

        if summary.artifacts.is_empty() {
            out.message(NONE_FOUND)?;
            return Ok(TriggerOutcome::NoneFound);
        }

        let mut files = summary.artifacts;
        sort_by_mtime(&mut files);
        for path in &files {
            let name = display_name(path);
            out.message(&format!("📤 Sending: {name}"))?;
            out.document(path, &name)?;
        }
        out.message(ALL_SENT)?;
        Ok(TriggerOutcome::Delivered(files))
    }
}

/// Prints replies and artifact paths to stdout.
pub struct ConsoleDelivery<W: Write = io::Stdout> {
    out: W,
}

impl ConsoleDelivery {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleDelivery<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Delivery for ConsoleDelivery<W> {
    fn message(&mut self, text: &str) -> Result<(), TriggerError> {
        writeln!(self.out, "{text}").map_err(TriggerError::Console)
    }

    fn document(&mut self, path: &Path, _name: &str) -> Result<(), TriggerError> {
        writeln!(self.out, "{}", path.display()).map_err(TriggerError::Console)
    }
}
