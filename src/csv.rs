// src/csv.rs
use std::io::Write;

use ::csv::{ReaderBuilder, Terminator, WriterBuilder};

use crate::config::consts::EXT;
use crate::core::sanitize::safe_filename;
use crate::model::{Line, RaceCardDocument};

pub const HEADERS: [&str; 11] = [
    "Race",
    "Country",
    "Ground",
    "Time",
    "Horse Number",
    "Horse Name",
    "HR NAME",
    "Horse Jockey",
    "Horse Trainer",
    "Horse Age",
    "Horse Draw",
];

/* ---------------- Writing ---------------- */

/// Write the header, then one row per horse and a blank row after each race.
/// `HR NAME` is always empty.
pub fn write_doc<W: Write>(w: W, doc: &RaceCardDocument) -> Result<(), ::csv::Error> {
    let mut out = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(w);

    out.write_record(HEADERS)?;
    let blank = [""; HEADERS.len()];

    for line in doc.lines() {
        match line {
            Line::Horse { race, horse } => {
                let seq = race.sequence.to_string();
                let rec: [&str; 11] = [
                    &seq,
                    &doc.country,
                    &doc.ground,
                    &horse.time,
                    &horse.number,
                    &horse.name,
                    "",
                    &horse.jockey,
                    &horse.trainer,
                    &horse.age,
                    &horse.draw,
                ];
                out.write_record(rec)?;
            }
            Line::Separator => out.write_record(blank)?,
        }
    }
    out.flush()?;
    Ok(())
}

/// Encode to an in-memory buffer.
pub fn to_bytes(doc: &RaceCardDocument) -> Result<Vec<u8>, ::csv::Error> {
    let mut buf = Vec::new();
    write_doc(&mut buf, doc)?;
    Ok(buf)
}

/// `"<location> Race Card <date>.csv"`, both parts filename-sanitized.
pub fn artifact_name(doc: &RaceCardDocument) -> String {
    format!(
        "{} Race Card {}.{EXT}",
        safe_filename(&doc.location),
        safe_filename(&doc.display_date)
    )
}

/* ---------------- Parsing ---------------- */

/// Read every record back, header included.
pub fn parse_rows(text: &str) -> Result<Vec<Vec<String>>, ::csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for rec in rdr.records() {
        rows.push(rec?.iter().map(str::to_string).collect());
    }
    Ok(rows)
}
