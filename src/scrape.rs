// src/scrape.rs
//! Fetch run: every (venue, date) pair through fetch → classify → extract →
//! write, with per-pair failures isolated and collected.

use std::{
    panic::{self, AssertUnwindSafe},
    path::PathBuf,
    sync::{atomic::{AtomicUsize, Ordering}, mpsc},
    thread,
    time::Duration,
};

use chrono::{Days, Local, NaiveDate};

use crate::{
    cancel::CancelToken,
    config::{Config, consts::{JITTER_MS, REQUEST_PAUSE_MS}},
    core::net::{Fetch, HttpFetcher},
    error::{ConfigError, SkipReason},
    file,
    model::VenueDateKey,
    progress::Progress,
    specs,
};

/// What happened to one pair.
#[derive(Debug)]
pub struct PairOutcome {
    pub key: VenueDateKey,
    pub result: Result<PathBuf, SkipReason>,
}

/// Summary of what was produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Written artifacts, in pair order.
    pub artifacts: Vec<PathBuf>,
    /// Every pair, in pair order.
    pub outcomes: Vec<PairOutcome>,
}

impl RunSummary {
    pub fn skipped(&self) -> impl Iterator<Item = (&VenueDateKey, &SkipReason)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (&o.key, e)))
    }
}

/// Dates ascending from `today` (inclusive), venues in configured order within each date.
pub fn enumerate_pairs(venues: &[u32], days_ahead: u32, today: NaiveDate) -> Vec<VenueDateKey> {
    (0..days_ahead)
        .filter_map(|d| today.checked_add_days(Days::new(u64::from(d))))
        .flat_map(|date| venues.iter().map(move |&v| VenueDateKey::new(v, date)))
        .collect()
}

/// Run one pair to completion. Never panics outward.
pub fn process_pair(fetcher: &dyn Fetch, cfg: &Config, key: VenueDateKey) -> Result<PathBuf, SkipReason> {
    panic::catch_unwind(AssertUnwindSafe(|| run_pipeline(fetcher, cfg, key)))
        .unwrap_or_else(|payload| Err(SkipReason::Panicked(panic_message(payload.as_ref()))))
}

fn run_pipeline(fetcher: &dyn Fetch, cfg: &Config, key: VenueDateKey) -> Result<PathBuf, SkipReason> {
    let url = key.url(&cfg.url_template);
    logd!("Fetching: {url}");
    let body = fetcher.get(&url)?;

    let doc = specs::read_page(&body, &key.date_label()).map_err(SkipReason::NoData)?;
    if !doc.header_source.is_confident() {
        logw!("{key}: header read with low confidence ({:?})", doc.header_source);
    }

    let path = file::write_artifact(&cfg.out_dir, &doc)?;
    logd!("Saved CSV: {}", path.display());
    Ok(path)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s!(*s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        s!("unknown panic")
    }
}

pub struct Orchestrator {
    cfg: Config,
    fetcher: Box<dyn Fetch>,
    pause: Duration,
}

impl Orchestrator {
    /// Production setup: HTTP fetcher with the configured timeout.
    pub fn from_config(cfg: Config) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let fetcher = HttpFetcher::new(cfg.timeout())?;
        Ok(Self::with_fetcher(cfg, Box::new(fetcher)))
    }

    pub fn with_fetcher(cfg: Config, fetcher: Box<dyn Fetch>) -> Self {
        Self { cfg, fetcher, pause: Duration::from_millis(REQUEST_PAUSE_MS) }
    }

    /// Pause each worker takes between requests (plus a small jitter when non-zero).
    pub fn polite_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Run the window starting today (local time).
    pub fn run(
        &self,
        progress: Option<&mut dyn Progress>,
        cancel: &CancelToken,
    ) -> Result<RunSummary, ConfigError> {
        self.run_from(Local::now().date_naive(), progress, cancel)
    }

    /// Run the window starting at `today`.
    ///
    /// Only an invalid configuration is an error; every per-pair failure is
    /// recorded in the summary and the run carries on.
    pub fn run_from(
        &self,
        today: NaiveDate,
        mut progress: Option<&mut dyn Progress>,
        cancel: &CancelToken,
    ) -> Result<RunSummary, ConfigError> {
        self.cfg.validate()?;
        let keys = enumerate_pairs(&self.cfg.venues, self.cfg.days_ahead, today);

        let workers = self.cfg.workers.min(keys.len()).max(1);
        if let Some(p) = progress.as_deref_mut() {
            p.begin(keys.len());
            p.log(&format!("Fetching from {today} with {workers} worker(s)"));
        }

        let next = AtomicUsize::new(0);
        let (res_tx, res_rx) = mpsc::channel::<(usize, PairOutcome)>();

        let mut slots: Vec<Option<PairOutcome>> = Vec::new();
        slots.resize_with(keys.len(), || None);

        thread::scope(|scope| {
            for _ in 0..workers {
                let tx = res_tx.clone();
                let (keys, next) = (&keys, &next);
                scope.spawn(move || {
                    loop {
                        let i = next.fetch_add(1, Ordering::Relaxed);
                        let Some(&key) = keys.get(i) else { break };

                        if cancel.is_cancelled() {
                            let _ = tx.send((i, PairOutcome { key, result: Err(SkipReason::Cancelled) }));
                            continue;
                        }

                        let result = process_pair(self.fetcher.as_ref(), &self.cfg, key);
                        if tx.send((i, PairOutcome { key, result })).is_err() {
                            break;
                        }
                        self.pause_between(key);
                    }
                });
            }
            drop(res_tx); // collector is the sole receiver now

            // Collect on this thread; progress stays single-threaded.
            for (i, outcome) in res_rx.iter() {
                if let Some(p) = progress.as_deref_mut() {
                    match &outcome.result {
                        Ok(path) => p.item_done(&outcome.key, path),
                        Err(reason) => p.item_failed(&outcome.key, reason),
                    }
                }
                slots[i] = Some(outcome);
            }
        });

        if let Some(p) = progress.as_deref_mut() {
            p.finish();
        }

        let outcomes: Vec<PairOutcome> = slots.into_iter().flatten().collect();
        let artifacts = outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().cloned())
            .collect();

        Ok(RunSummary { artifacts, outcomes })
    }

    fn pause_between(&self, key: VenueDateKey) {
        if self.pause.is_zero() {
            return;
        }
        let jitter = u64::from(key.venue) % JITTER_MS;
        thread::sleep(self.pause + Duration::from_millis(jitter)); // be polite
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn pairs_are_date_major() {
        let keys = enumerate_pairs(&[8, 1], 3, day(30));
        let got: Vec<(u32, String)> = keys.iter().map(|k| (k.venue, k.date_param())).collect();
        assert_eq!(
            got,
            vec![
                (8, s!("2025-01-30")),
                (1, s!("2025-01-30")),
                (8, s!("2025-01-31")),
                (1, s!("2025-01-31")),
                (8, s!("2025-02-01")),
                (1, s!("2025-02-01")),
            ]
        );
    }

    struct Panics;
    impl Fetch for Panics {
        fn get(&self, _url: &str) -> Result<String, FetchError> {
            panic!("boom")
        }
    }

    #[test]
    fn panicking_stage_becomes_skip() {
        let cfg = Config::default();
        let key = VenueDateKey::new(1, day(5));
        let err = process_pair(&Panics, &cfg, key).unwrap_err();
        assert!(matches!(err, SkipReason::Panicked(ref m) if m == "boom"));
    }

    struct Down;
    impl Fetch for Down {
        fn get(&self, url: &str) -> Result<String, FetchError> {
            Err(FetchError::Status { url: s!(url), status: 503 })
        }
    }

    #[test]
    fn fetch_failure_is_skip_not_error() {
        let cfg = Config { venues: vec![1, 2], days_ahead: 2, ..Config::default() };
        let orch = Orchestrator::with_fetcher(cfg, Box::new(Down)).polite_pause(Duration::ZERO);
        let summary = orch.run_from(day(5), None, &CancelToken::new()).unwrap();
        assert!(summary.artifacts.is_empty());
        assert_eq!(summary.outcomes.len(), 4);
        assert!(summary.skipped().all(|(_, r)| matches!(r, SkipReason::Fetch(FetchError::Status { status: 503, .. }))));
    }

    #[test]
    fn cancelled_run_starts_nothing() {
        let cfg = Config { venues: vec![1, 2, 3], days_ahead: 2, ..Config::default() };
        let orch = Orchestrator::with_fetcher(cfg, Box::new(Panics)).polite_pause(Duration::ZERO);
        let token = CancelToken::new();
        token.cancel();
        let summary = orch.run_from(day(5), None, &token).unwrap();
        assert_eq!(summary.outcomes.len(), 6);
        assert!(summary.skipped().all(|(_, r)| matches!(r, SkipReason::Cancelled)));
    }

    #[test]
    fn bad_config_is_fatal() {
        let cfg = Config { venues: vec![], ..Config::default() };
        let orch = Orchestrator::with_fetcher(cfg, Box::new(Down));
        assert!(orch.run_from(day(5), None, &CancelToken::new()).is_err());
    }
}
