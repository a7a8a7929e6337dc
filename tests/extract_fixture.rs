// tests/extract_fixture.rs
//
// Full read of a saved race-card page, then encode and read the CSV back.
//
use racecard_scrape::csv::{artifact_name, parse_rows, to_bytes, HEADERS};
use racecard_scrape::error::NoDataCause;
use racecard_scrape::model::HeaderSource;
use racecard_scrape::specs::read_page;

const PAGE: &str = include_str!("fixtures/racecard_mumbai.html");

#[test]
fn header_and_page_metadata() {
    let doc = read_page(PAGE, "01 Jan 2000").unwrap();
    assert_eq!(doc.location, "Mumbai");
    assert_eq!(doc.display_date, "05 Jan 2025");
    assert_eq!(doc.header_source, HeaderSource::Matched);
    assert_eq!(doc.country, "India");
    assert_eq!(doc.ground, "Mahalaxmi Race Course");
    assert_eq!(artifact_name(&doc), "Mumbai Race Card 05 Jan 2025.csv");
}

#[test]
fn races_are_contiguous_and_in_page_order() {
    let doc = read_page(PAGE, "x").unwrap();
    let seqs: Vec<u32> = doc.races.iter().map(|r| r.sequence).collect();
    assert_eq!(seqs, vec![1, 2, 3]);
    assert_eq!(doc.races[0].start_time, "14:30");
    assert_eq!(doc.races[1].start_time, "15:05");
    assert_eq!(doc.races[2].start_time, "");
    assert!(doc.races[2].horses.is_empty());
}

#[test]
fn tagged_rows_with_draws_and_short_rows() {
    let doc = read_page(PAGE, "x").unwrap();
    let horses = &doc.races[0].horses;
    // the single-cell "Scratched" row is not a horse
    assert_eq!(horses.len(), 3);

    let nums: Vec<(&str, &str)> = horses.iter().map(|h| (h.number.as_str(), h.draw.as_str())).collect();
    assert_eq!(nums, vec![("1", "3"), ("2", "1"), ("3", "")]);

    let names: Vec<&str> = horses.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, vec!["John Doe", "Morning Star", "Sea Breeze"]);

    assert_eq!(horses[1].age, "5");
    assert_eq!(horses[1].trainer, "P Shroff");
    assert_eq!(horses[1].jockey, "T S Jodha");
    assert_eq!((horses[2].age.as_str(), horses[2].trainer.as_str()), ("", ""));
}

#[test]
fn time_only_on_first_horse_of_each_race() {
    let doc = read_page(PAGE, "x").unwrap();
    for race in &doc.races {
        for (i, h) in race.horses.iter().enumerate() {
            if i == 0 {
                assert_eq!(h.time, race.start_time);
            } else {
                assert_eq!(h.time, "", "race {} row {}", race.sequence, i);
            }
        }
    }
}

#[test]
fn untagged_race_falls_back_to_all_rows() {
    let doc = read_page(PAGE, "x").unwrap();
    let horses = &doc.races[1].horses;
    assert_eq!(horses.len(), 2);
    assert_eq!(horses[0].name, "Desert Rose");
    assert_eq!(horses[0].jockey, "\"Sandesh\", Akshay");
    assert_eq!(horses[1].name, "Silver Arrow");
    assert_eq!(horses[1].age, "");
}

#[test]
fn csv_round_trip_keeps_race_horse_order() {
    let doc = read_page(PAGE, "x").unwrap();
    let text = String::from_utf8(to_bytes(&doc).unwrap()).unwrap();
    let rows = parse_rows(&text).unwrap();

    assert_eq!(rows[0], HEADERS.iter().map(|s| s.to_string()).collect::<Vec<_>>());

    let from_csv: Vec<(String, String, String)> = rows[1..]
        .iter()
        .filter(|r| !r[0].is_empty())
        .map(|r| (r[0].clone(), r[4].clone(), r[5].clone()))
        .collect();
    let from_doc: Vec<(String, String, String)> = doc
        .races
        .iter()
        .flat_map(|race| {
            race.horses
                .iter()
                .map(move |h| (race.sequence.to_string(), h.number.clone(), h.name.clone()))
        })
        .collect();
    assert_eq!(from_csv, from_doc);

    // one blank row per race, HR NAME never filled
    let blanks = rows.iter().filter(|r| r.iter().all(String::is_empty)).count();
    assert_eq!(blanks, doc.races.len());
    assert!(rows[1..].iter().all(|r| r[6].is_empty()));
}

#[test]
fn no_races_text_short_circuits() {
    let page = PAGE.replace("Declarations awaited.", "No Races scheduled for this meet.");
    assert_eq!(read_page(&page, "x").unwrap_err(), NoDataCause::ClassifierMatched);
}

#[test]
fn structurally_empty_page_is_no_data() {
    let page = "<html><body><div class=\"home headline_home\"><h3 class=\"border_bottom\">Race Card - Pune - 06 Jan 2025</h3></div></body></html>";
    assert_eq!(read_page(page, "x").unwrap_err(), NoDataCause::NoRaceSections);
}
