// src/specs/availability.rs
// Cheap text check before parsing: does the page say there are no races?

use std::sync::LazyLock;

use regex::Regex;

static NO_RACES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)No\s+Races|No races scheduled|No Race Card").expect("static regex")
});

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Availability {
    NoData,
    Proceed,
}

/// Case-insensitive scan of the raw page text for "no races" phrasing.
/// A miss is not proof of data; the extractor still has to find race sections.
pub fn classify(page_text: &str) -> Availability {
    if NO_RACES.is_match(page_text) {
        Availability::NoData
    } else {
        Availability::Proceed
    }
}
