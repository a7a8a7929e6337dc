// src/specs/mod.rs
//! # Page “specs”
//!
//! Page-specific readers: where the ground truth lives in the race-card HTML
//! and how to pull it out without trusting the markup too much.
//!
//! ## What lives here
//! - **Availability check** on raw text (`availability`), run before parsing.
//! - **Race-card extraction** (`racecard`) into `model::RaceCardDocument`.
//!
//! ## What does **not** live here
//! - Fetching (`core::net`), file naming and CSV layout (`csv`, `file`), and
//!   deciding which pages to fetch (`scrape`).
//!
//! ## Conventions
//! - Missing pieces degrade to empty strings or header fallbacks. The only
//!   rejection is a page with no race blocks.
//! - Selectors are compiled once (`LazyLock`) and kept at the top of each reader.
//! - Specs are tested offline against inline HTML fixtures.
pub mod availability;
pub mod racecard;

use crate::error::NoDataCause;
use crate::model::RaceCardDocument;
use availability::Availability;

/// Classifier then extractor: the whole read of one page body.
pub fn read_page(page_text: &str, date_label: &str) -> Result<RaceCardDocument, NoDataCause> {
    if availability::classify(page_text) == Availability::NoData {
        return Err(NoDataCause::ClassifierMatched);
    }
    racecard::parse_doc(page_text, date_label)
}
