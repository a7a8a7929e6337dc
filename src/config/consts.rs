// src/config/consts.rs

// Net config
pub const URL_TEMPLATE: &str =
    "https://www.indiarace.com/Home/racingCenterEvent?venueId={venue}&event_date={date}&race_type=RACECARD";
pub const TIMEOUT_SECS: u64 = 15;
pub const USER_AGENT: &str = concat!("racecard_scrape/", env!("CARGO_PKG_VERSION"));

// Venues + window
pub const VENUES: [u32; 6] = [1, 2, 4, 5, 6, 8];
pub const DAYS_AHEAD: u32 = 5; // today + next 4 days

// Export
pub const DEFAULT_OUT_DIR: &str = "racecards";
pub const EXT: &str = "csv";

// Concurrency
pub const WORKERS: usize = 4;
pub const REQUEST_PAUSE_MS: u64 = 75; // be polite
pub const JITTER_MS: u64 = 50; // extra 0..50 ms

// Bot
pub const BOT_TOKEN_ENV: &str = "RACECARD_BOT_TOKEN";
pub const BOT_API_BASE: &str = "https://api.telegram.org";
pub const BOT_POLL_SECS: u64 = 30;
