use std::sync::LazyLock;

use chrono::{DateTime, SubsecRound, Utc};
use log::{debug, warn};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::models::{Assessment, Course, GradeRecord};

const STUDENT_PREFIX: &str = "Aktuelle Noten - ";
const NO_AVERAGE: &str = "--";
const DEFAULT_WEIGHT: f64 = 1.0;

static GRADES_DIV: LazyLock<Selector> = LazyLock::new(|| selector("div.div_noten"));
static HEADER: LazyLock<Selector> = LazyLock::new(|| selector("h3"));
static GRADES_TABLE: LazyLock<Selector> = LazyLock::new(|| selector("table.mdl-data-table"));
static BOLD_CELL: LazyLock<Selector> = LazyLock::new(|| selector("td b"));
static BOLD: LazyLock<Selector> = LazyLock::new(|| selector("b"));
static LINE_BREAK: LazyLock<Selector> = LazyLock::new(|| selector("br"));
static ONCLICK: LazyLock<Selector> = LazyLock::new(|| selector("[onclick]"));
static DETAIL_TABLE: LazyLock<Selector> = LazyLock::new(|| selector("table.clean"));
static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static SINGLE_EXAM_CELL: LazyLock<Selector> = LazyLock::new(|| selector("td.td_einzelpruefungen"));

// toggle_notendetails(0, 3) -> detail row class token `0_3_detailrow`
static TOGGLE_DETAILS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"toggle_notendetails\(\s*(\d+)\s*,\s*(\d+)\s*\)").expect("valid toggle pattern")
});
static DATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{2}\.\d{2}\.\d{4}").expect("valid date pattern"));
static NUMBER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(\d+(?:[.,]\d*)?|[.,]\d+)").expect("valid number pattern"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

// Returns whether the document is the portal's grades page.
pub fn is_grades_page(document: &Html) -> bool {
    document.select(&GRADES_DIV).next().is_some()
}

// Extracts the grades page stamped with the current time.
pub fn extract_grades(document: &Html) -> Option<GradeRecord> {
    extract_grades_at(document, Utc::now().trunc_subsecs(3))
}

// Walks the `div_noten` container into a `GradeRecord`. `None` means the document
// is not the grades page at all; anything missing inside the container only leaves
// the corresponding fields empty.
pub fn extract_grades_at(document: &Html, extracted_at: DateTime<Utc>) -> Option<GradeRecord> {
    let grades_div = document.select(&GRADES_DIV).next()?;

    let student = grades_div
        .select(&HEADER)
        .next()
        .map(|header| text_of(header).replacen(STUDENT_PREFIX, "", 1).trim().to_string())
        .unwrap_or_default();

    let mut record = GradeRecord { student, extracted_at, courses: Vec::new() };

    let Some(table) = grades_div.select(&GRADES_TABLE).next() else {
        warn!("Grades container found but no grades table, returning an empty course list");
        return Some(record);
    };

    let rows = own_rows(table);
    let course_rows = rows.iter().copied().filter(|row| is_course_row(*row));

    for (position, row) in course_rows.enumerate() {
        let cells = own_cells(row);
        if cells.len() < 2 {
            continue;
        }

        let code = cells[0].select(&BOLD).next().map(text_of).unwrap_or_default();
        let name = course_name(cells[0]).unwrap_or_default();
        let average = parse_average(&text_of(cells[1]), &code);

        let detail_key = detail_row_key(row).unwrap_or_else(|| format!("0_{}_detailrow", position));
        let assessments = rows
            .iter()
            .find(|candidate| has_class_token(**candidate, &detail_key))
            .map(|detail_row| parse_assessments(*detail_row))
            .unwrap_or_default();

        debug!("Course {} ({}): {} assessments", code, name, assessments.len());
        record.courses.push(Course { code, name, average, assessments });
    }

    Some(record)
}

// Rows that belong to `table` itself, skipping rows of nested tables.
fn own_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut rows = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => rows.extend(
                child
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|el| el.value().name() == "tr"),
            ),
            _ => {}
        }
    }
    rows
}

fn own_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "td")
        .collect()
}

fn is_course_row(row: ElementRef<'_>) -> bool {
    let class = row.value().attr("class").unwrap_or("");
    let id = row.value().attr("id").unwrap_or("");
    !class.contains("detailrow") && !id.contains("verlauf") && row.select(&BOLD_CELL).next().is_some()
}

// The text node right after the `<br>` in the course cell.
fn course_name(cell: ElementRef<'_>) -> Option<String> {
    let line_break = cell.select(&LINE_BREAK).next()?;
    let next = line_break.next_sibling()?;
    let text = match next.value().as_text() {
        Some(text) => squash(text),
        None => ElementRef::wrap(next).map(text_of)?,
    };
    Some(text)
}

fn detail_row_key(row: ElementRef<'_>) -> Option<String> {
    std::iter::once(row)
        .chain(row.select(&ONCLICK))
        .filter_map(|el| el.value().attr("onclick"))
        .find_map(|handler| TOGGLE_DETAILS.captures(handler))
        .map(|caps| format!("{}_{}_detailrow", &caps[1], &caps[2]))
}

// Matches whole class tokens so that `10_1_detailrow` never answers for `0_1_detailrow`.
fn has_class_token(row: ElementRef<'_>, token: &str) -> bool {
    row.value().classes().any(|class| class == token)
}

fn parse_assessments(detail_row: ElementRef<'_>) -> Vec<Assessment> {
    let Some(detail_table) = detail_row.select(&DETAIL_TABLE).next() else {
        return Vec::new();
    };

    detail_table
        .select(&ROW)
        .filter_map(|row| {
            let cells = own_cells(row);
            if cells.len() < 5 {
                return None;
            }
            // group headers carry no single-exam cells
            if row.select(&SINGLE_EXAM_CELL).next().is_none() {
                return None;
            }
            let date = text_of(cells[1]);
            if !DATE.is_match(&date) {
                return None;
            }

            let topic = text_of(cells[2]);
            let grade_text = text_of(cells[3]);
            let grade = if grade_text.is_empty() { None } else { parse_decimal(&grade_text) };
            let weight = parse_decimal(&text_of(cells[4])).unwrap_or_else(|| {
                warn!("Unreadable weight for assessment {} on {}, using {}", topic, date, DEFAULT_WEIGHT);
                DEFAULT_WEIGHT
            });

            Some(Assessment { date, topic, grade, weight })
        })
        .collect()
}

fn parse_average(text: &str, code: &str) -> Option<f64> {
    if text == NO_AVERAGE {
        return None;
    }
    let average = parse_decimal(text);
    if average.is_none() {
        warn!("Unreadable average {:?} for course {}", text, code);
    }
    average
}

// Reads the leading number of a cell: "5.750" -> 5.75, "4,5*" -> 4.5.
pub fn parse_decimal(text: &str) -> Option<f64> {
    let number = NUMBER_PREFIX.find(text.trim())?;
    number.as_str().replace(',', ".").parse().ok()
}

fn text_of(element: ElementRef<'_>) -> String {
    squash(&element.text().collect::<String>())
}

fn squash(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
