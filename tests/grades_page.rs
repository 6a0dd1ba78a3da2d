use chrono::{NaiveDate, TimeZone, Utc};
use scraper::Html;
use tempfile::TempDir;

use schulnetz_plus::utils::export::{download_grades_json, download_grades_json_on, to_json};
use schulnetz_plus::utils::page::{load_page, FileSource};
use schulnetz_plus::{calculate_plus_points, extract_grades, extract_grades_at, summarize, GradeRecord};

const FIXTURE: &str = include_str!("fixtures/noten.html");

fn fixture() -> Html {
    Html::parse_document(FIXTURE)
}

#[test]
fn extracts_student_and_course_rows() {
    let record = extract_grades(&fixture()).expect("fixture is a grades page");

    assert_eq!(record.student, "Muster Anna");
    let codes: Vec<_> = record.courses.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, ["M-1a-MU", "BIO-1a", "F-1a-DE", "SP-1a", "E-1a"]);

    let names: Vec<_> = record.courses.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Mathematik", "Biologie", "Französisch", "Sport", "Englisch"]);

    let averages: Vec<_> = record.courses.iter().map(|c| c.average).collect();
    assert_eq!(averages, [Some(5.75), None, Some(3.25), Some(4.5), Some(5.0)]);
}

#[test]
fn assessments_come_from_the_linked_detail_rows() {
    let record = extract_grades(&fixture()).unwrap();

    let maths = &record.courses[0].assessments;
    assert_eq!(maths.len(), 2, "group header and column header rows are skipped");
    assert_eq!(maths[0].date, "12.02.2024");
    assert_eq!(maths[0].topic, "Algebra");
    assert_eq!(maths[0].grade, Some(5.5));
    assert_eq!(maths[1].weight, 2.0);

    assert!(record.courses[1].assessments.is_empty());

    let french = &record.courses[2].assessments;
    assert_eq!(french.len(), 2);
    assert_eq!(french[1].topic, "Oral");
    assert_eq!(french[1].grade, None);
    assert_eq!(french[1].weight, 0.5);

    assert!(record.courses[3].assessments.is_empty(), "no detail row, no assessments");

    let english = &record.courses[4].assessments;
    assert_eq!(english.len(), 1, "handler index wins over the course position");
    assert_eq!(english[0].topic, "Reading");
    assert_eq!(english[0].grade, Some(5.0));
}

#[test]
fn plus_points_for_the_fixture() {
    let record = extract_grades(&fixture()).unwrap();
    // 5.75 -> +1.5, -- -> skipped, 3.25 -> -1, 4.5 -> +0.5, 5.0 -> +1
    assert_eq!(calculate_plus_points(&record.courses), 2.0);

    let summary = summarize(&record.courses);
    assert_eq!(summary.courses_above_4, 3);
    assert_eq!(summary.courses_below_4, 1);
}

#[test]
fn extraction_is_repeatable() {
    let doc = fixture();
    let first = extract_grades(&doc).unwrap();
    let second = extract_grades(&doc).unwrap();
    assert_eq!(first.courses, second.courses);
}

#[test]
fn export_round_trips_through_json() {
    let stamp = Utc.with_ymd_and_hms(2024, 3, 14, 9, 12, 44).unwrap();
    let record = extract_grades_at(&fixture(), stamp).unwrap();

    let parsed: GradeRecord = serde_json::from_str(&to_json(&record).unwrap()).unwrap();
    assert_eq!(parsed, record);
}

#[test]
fn download_writes_the_fixture_record() {
    let dir = TempDir::new().unwrap();
    let record = extract_grades(&fixture());
    let date = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();

    let path = download_grades_json_on(record.as_ref(), dir.path(), date).unwrap().unwrap();
    assert!(path.ends_with("grades_2024-06-30.json"));

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(json["student"], "Muster Anna");
    assert_eq!(json["courses"][1]["average"], serde_json::Value::Null);
    assert!(json["extractedAt"].is_string());
}

#[test]
fn wrong_page_yields_nothing_and_exports_nothing() {
    let login = Html::parse_document("<html><body><form id=\"login\"></form></body></html>");
    assert!(extract_grades(&login).is_none());

    let dir = TempDir::new().unwrap();
    assert!(download_grades_json(extract_grades(&login).as_ref(), dir.path()).unwrap().is_none());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn saved_page_loads_from_disk() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/noten.html");
    let doc = load_page(&FileSource::new(path)).await.unwrap();
    assert_eq!(extract_grades(&doc).unwrap().courses.len(), 5);
}
