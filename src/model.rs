// src/model.rs
//! Race-card data shapes.
//!
//! A `RaceCardDocument` is built once per fetched page, handed to the encoder,
//! then dropped. Every extracted field is a plain `String` that is empty when
//! the page did not carry it.

use chrono::NaiveDate;

/// Location used when the page header is missing or unreadable.
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// One page to fetch: a venue on a calendar date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VenueDateKey {
    pub venue: u32,
    pub date: NaiveDate,
}

impl VenueDateKey {
    pub fn new(venue: u32, date: NaiveDate) -> Self {
        Self { venue, date }
    }

    /// ISO date used in the request (`2025-01-05`).
    pub fn date_param(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Human date used when the page header is unreadable (`05 Jan 2025`).
    pub fn date_label(&self) -> String {
        self.date.format("%d %b %Y").to_string()
    }

    /// Fill `{venue}` and `{date}` in a URL template.
    pub fn url(&self, template: &str) -> String {
        template
            .replace("{venue}", &self.venue.to_string())
            .replace("{date}", &self.date_param())
    }
}

impl std::fmt::Display for VenueDateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "venue {} on {}", self.venue, self.date_param())
    }
}

/// How the location/date pair was obtained from the page header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HeaderSource {
    /// `Race Card - <location> - <date>` matched.
    Matched,
    /// Pattern failed; location/date came from splitting on `-`. Low confidence.
    SplitFallback,
    /// No header element; fallback values used.
    #[default]
    Missing,
}

impl HeaderSource {
    pub fn is_confident(&self) -> bool {
        matches!(self, HeaderSource::Matched)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct RaceCardDocument {
    pub location: String,
    pub display_date: String,
    pub country: String,
    pub ground: String,
    pub header_source: HeaderSource,
    pub races: Vec<RaceEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct RaceEntry {
    /// 1-based position of the race section on the page.
    pub sequence: u32,
    /// Start time as printed, possibly empty.
    pub start_time: String,
    pub horses: Vec<HorseRow>,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct HorseRow {
    /// Race start time; only set on the first row of a race.
    pub time: String,
    pub number: String,
    pub draw: String,
    pub name: String,
    pub jockey: String,
    pub trainer: String,
    pub age: String,
}

/// One output line of a document, in emission order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Line<'a> {
    Horse { race: &'a RaceEntry, horse: &'a HorseRow },
    /// Blank line closing a race.
    Separator,
}

impl RaceCardDocument {
    pub fn horse_count(&self) -> usize {
        self.races.iter().map(|r| r.horses.len()).sum()
    }

    /// Horses in page order, each race followed by a `Separator`.
    pub fn lines(&self) -> impl Iterator<Item = Line<'_>> {
        self.races.iter().flat_map(|race| {
            race.horses
                .iter()
                .map(move |horse| Line::Horse { race, horse })
                .chain(std::iter::once(Line::Separator))
        })
    }
}
