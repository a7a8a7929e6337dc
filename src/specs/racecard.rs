// src/specs/racecard.rs
//! Race-card page reader.
//!
//! Page shape this relies on:
//! - header `.home.headline_home h3.border_bottom` reading
//!   `Race Card - <location> - <dd Mon yyyy>`
//! - optional page-level `.race-country` and `.race-ground`
//! - one `.race-card-new` block per race, in page order
//! - race start time at `#race-<n> h4:nth-child(2)`
//! - horse rows `tr.dividend_tr` (any `tr` when none are tagged), cells:
//!   `0` number with optional `(draw)`, `2` name (`h5 a`), `3` age,
//!   `5` trainer, `6` jockey
//!
//! Only a page without race blocks is rejected. Anything else that is missing
//! comes out as an empty string (or the header fallbacks).

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::core::html::{first_text, first_text_in, sel, text_of};
use crate::core::sanitize::{capitalize_words, first_digits};
use crate::error::NoDataCause;
use crate::model::{HeaderSource, HorseRow, RaceCardDocument, RaceEntry, UNKNOWN_LOCATION};

static HEADER: LazyLock<Selector> = LazyLock::new(|| sel(".home.headline_home h3.border_bottom"));
static COUNTRY: LazyLock<Selector> = LazyLock::new(|| sel(".race-country"));
static GROUND: LazyLock<Selector> = LazyLock::new(|| sel(".race-ground"));
static RACE: LazyLock<Selector> = LazyLock::new(|| sel(".race-card-new"));
static DATA_ROW: LazyLock<Selector> = LazyLock::new(|| sel("tr.dividend_tr"));
static ANY_ROW: LazyLock<Selector> = LazyLock::new(|| sel("tr"));
static CELL: LazyLock<Selector> = LazyLock::new(|| sel("td"));
static NAME_LINK: LazyLock<Selector> = LazyLock::new(|| sel("h5 a"));

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Race Card\s*-\s*(.+?)\s*-\s*(\d{2}\s\w+\s\d{4})").expect("static regex")
});
static DRAW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d+)\)").expect("static regex"));

const MIN_CELLS: usize = 3;

/// Parse a race-card page.
///
/// `date_label` stands in for the display date when the header is missing or
/// has no date part.
pub fn parse_doc(html_doc: &str, date_label: &str) -> Result<RaceCardDocument, NoDataCause> {
    let doc = Html::parse_document(html_doc);

    let (location, display_date, header_source) = match first_text(&doc, &HEADER) {
        Some(text) => parse_header(&text, date_label),
        None => (s!(UNKNOWN_LOCATION), s!(date_label), HeaderSource::Missing),
    };
    if header_source == HeaderSource::SplitFallback {
        logd!("Header did not match the race-card pattern; using split fallback ({location} / {display_date})");
    }

    let country = first_text(&doc, &COUNTRY).unwrap_or_default();
    let ground = first_text(&doc, &GROUND).unwrap_or_default();

    let sections: Vec<ElementRef<'_>> = doc.select(&RACE).collect();
    if sections.is_empty() {
        return Err(NoDataCause::NoRaceSections);
    }

    let races: Vec<RaceEntry> = sections
        .into_iter()
        .zip(1u32..)
        .map(|(section, seq)| parse_race(&doc, section, seq))
        .collect();

    logd!(
        "Parsed {} races / {} horses for {location} {display_date}",
        races.len(),
        races.iter().map(|r| r.horses.len()).sum::<usize>()
    );

    Ok(RaceCardDocument { location, display_date, country, ground, header_source, races })
}

/// Location and date from the header text, with how they were found.
pub fn parse_header(text: &str, date_label: &str) -> (String, String, HeaderSource) {
    if let Some(caps) = HEADER_RE.captures(text) {
        return (s!(caps[1].trim()), s!(caps[2].trim()), HeaderSource::Matched);
    }
    let parts: Vec<&str> = text.split('-').map(str::trim).collect();
    let location = parts.get(1).copied().unwrap_or(UNKNOWN_LOCATION);
    let date = parts.get(2).copied().unwrap_or(date_label);
    (s!(location), s!(date), HeaderSource::SplitFallback)
}

/* ---------- helpers ---------- */

fn parse_race(doc: &Html, section: ElementRef<'_>, seq: u32) -> RaceEntry {
    let start_time = race_time(doc, seq);

    let mut rows: Vec<ElementRef<'_>> = section.select(&DATA_ROW).collect();
    if rows.is_empty() {
        rows = section.select(&ANY_ROW).collect();
    }

    let mut horses: Vec<HorseRow> = rows.into_iter().filter_map(parse_row).collect();
    // Time is shown once per race, on its first horse.
    if let Some(first) = horses.first_mut() {
        first.time = start_time.clone();
    }

    RaceEntry { sequence: seq, start_time, horses }
}

fn race_time(doc: &Html, seq: u32) -> String {
    Selector::parse(&format!("#race-{seq} h4:nth-child(2)"))
        .ok()
        .and_then(|s| first_text(doc, &s))
        .unwrap_or_default()
}

/// One horse from a table row; `None` for header/separator rows.
pub fn parse_row(row: ElementRef<'_>) -> Option<HorseRow> {
    let cells: Vec<ElementRef<'_>> = row.select(&CELL).collect();
    if cells.len() < MIN_CELLS {
        return None;
    }

    let (number, draw) = split_number_cell(&text_of(cells[0]));

    let raw_name = first_text_in(cells[2], &NAME_LINK).unwrap_or_else(|| text_of(cells[2]));
    let name = capitalize_words(&raw_name);

    let age = cells.get(3).map(|c| first_digits(&text_of(*c))).unwrap_or_default();
    let trainer = cells.get(5).map(|c| text_of(*c)).unwrap_or_default();
    let jockey = cells.get(6).map(|c| text_of(*c)).unwrap_or_default();

    Some(HorseRow { time: s!(), number, draw, name, jockey, trainer, age })
}

/// "5(2)" → ("5", "2"); "5" → ("5", "").
pub fn split_number_cell(text: &str) -> (String, String) {
    let number = DRAW_RE.replace_all(text, "").trim().to_string();
    let draw = DRAW_RE
        .captures(text)
        .map(|c| s!(&c[1]))
        .unwrap_or_default();
    (number, draw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(header: &str, body: &str) -> String {
        format!(
            r#"<html><body>
            <div class="home headline_home">{header}</div>
            {body}
            </body></html>"#
        )
    }

    const ONE_RACE: &str = r#"
        <div id="race-1"><h4>Race 1</h4><h4>14:30</h4></div>
        <div class="race-card-new">
          <table>
            <tr><th>No</th><th>Silk</th><th>Horse</th></tr>
            <tr class="dividend_tr">
              <td>1(3)</td><td><img src="s.png"></td><td><h5><a href="/h/1">john doe</a></h5><p>b g</p></td>
              <td>4 yrs</td><td>56</td><td>ACME STABLE</td><td>J SMITH</td>
            </tr>
            <tr class="dividend_tr">
              <td>2</td><td></td><td>SILVER   arrow</td>
            </tr>
          </table>
        </div>"#;

    #[test]
    fn header_pattern() {
        let (loc, date, src) = parse_header("Race Card - Mumbai - 05 Jan 2025", "x");
        assert_eq!((loc.as_str(), date.as_str(), src), ("Mumbai", "05 Jan 2025", HeaderSource::Matched));

        let (loc, _, _) = parse_header("race card-Pune-12 Feb 2025 (Evening)", "x");
        assert_eq!(loc, "Pune");
    }

    #[test]
    fn header_split_fallback() {
        let (loc, date, src) = parse_header("Card - Bangalore - Sunday", "05 Jan 2025");
        assert_eq!((loc.as_str(), date.as_str()), ("Bangalore", "Sunday"));
        assert_eq!(src, HeaderSource::SplitFallback);

        let (loc, date, _) = parse_header("Racing Today", "05 Jan 2025");
        assert_eq!((loc.as_str(), date.as_str()), ("Unknown", "05 Jan 2025"));
    }

    #[test]
    fn number_and_draw() {
        assert_eq!(split_number_cell("5(2)"), (s!("5"), s!("2")));
        assert_eq!(split_number_cell("5"), (s!("5"), s!()));
        assert_eq!(split_number_cell(" 12 (10) "), (s!("12"), s!("10")));
        assert_eq!(split_number_cell("7(a)"), (s!("7(a)"), s!()));
    }

    #[test]
    fn full_row_scenario() {
        let html = page(
            r#"<h3 class="border_bottom">Race Card - Mumbai - 05 Jan 2025</h3>"#,
            ONE_RACE,
        );
        let doc = parse_doc(&html, "01 Jan 2000").unwrap();
        assert_eq!(doc.location, "Mumbai");
        assert_eq!(doc.display_date, "05 Jan 2025");
        assert_eq!(doc.header_source, HeaderSource::Matched);
        assert_eq!(doc.races.len(), 1);

        let race = &doc.races[0];
        assert_eq!(race.sequence, 1);
        assert_eq!(race.start_time, "14:30");
        assert_eq!(race.horses.len(), 2);

        let h = &race.horses[0];
        assert_eq!(h.number, "1");
        assert_eq!(h.draw, "3");
        assert_eq!(h.name, "John Doe");
        assert_eq!(h.age, "4");
        assert_eq!(h.trainer, "ACME STABLE");
        assert_eq!(h.jockey, "J SMITH");
        assert_eq!(h.time, "14:30");

        let h2 = &race.horses[1];
        assert_eq!(h2.number, "2");
        assert_eq!(h2.draw, "");
        assert_eq!(h2.name, "Silver Arrow");
        assert_eq!((h2.age.as_str(), h2.trainer.as_str(), h2.jockey.as_str()), ("", "", ""));
        assert_eq!(h2.time, "");
    }

    #[test]
    fn missing_header_uses_fallbacks() {
        let html = format!("<html><body>{ONE_RACE}</body></html>");
        let doc = parse_doc(&html, "05 Jan 2025").unwrap();
        assert_eq!(doc.location, "Unknown");
        assert_eq!(doc.display_date, "05 Jan 2025");
        assert_eq!(doc.header_source, HeaderSource::Missing);
        assert_eq!(doc.country, "");
        assert_eq!(doc.ground, "");
    }

    #[test]
    fn no_sections_is_no_data() {
        let html = page(r#"<h3 class="border_bottom">Race Card - Mumbai - 05 Jan 2025</h3>"#, "<p>soon</p>");
        assert_eq!(parse_doc(&html, "x").unwrap_err(), NoDataCause::NoRaceSections);
    }

    #[test]
    fn untagged_rows_fallback() {
        let body = r#"
            <div class="race-card-new"><table>
              <tr><td>No</td><td>Horse</td></tr>
              <tr><td>3(1)</td><td></td><td>blue moon</td><td>5</td></tr>
            </table></div>"#;
        let doc = parse_doc(&page("", body), "x").unwrap();
        let horses = &doc.races[0].horses;
        assert_eq!(horses.len(), 1);
        assert_eq!(horses[0].number, "3");
        assert_eq!(horses[0].draw, "1");
        assert_eq!(horses[0].name, "Blue Moon");
        assert_eq!(horses[0].age, "5");
        assert_eq!(doc.races[0].start_time, "");
    }

    #[test]
    fn sequence_is_positional() {
        let race = r#"<div class="race-card-new"><table>
            <tr class="dividend_tr"><td>1</td><td></td><td>a</td></tr></table></div>"#;
        let body = format!(
            r#"{race}<div class="race-card-new"><p>no table</p></div>{race}
            <div id="race-3"><h4>R3</h4><h4>16:00</h4></div>"#
        );
        let doc = parse_doc(&page("", &body), "x").unwrap();
        let seqs: Vec<u32> = doc.races.iter().map(|r| r.sequence).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
        assert!(doc.races[1].horses.is_empty());
        assert_eq!(doc.races[0].horses[0].time, "");
        assert_eq!(doc.races[2].horses[0].time, "16:00");
    }

    #[test]
    fn page_level_country_and_ground() {
        let body = format!(
            r#"<span class="race-country"> India </span><span class="race-ground">Mahalaxmi</span>{ONE_RACE}"#
        );
        let doc = parse_doc(&page("", &body), "x").unwrap();
        assert_eq!(doc.country, "India");
        assert_eq!(doc.ground, "Mahalaxmi");
    }
}
