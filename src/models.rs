use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

// One extraction of the grades page. Field names follow the JSON export (camelCase).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GradeRecord {
    pub student: String,
    #[serde(serialize_with = "iso_millis")]
    pub extracted_at: DateTime<Utc>,
    pub courses: Vec<Course>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Course {
    pub code: String,
    pub name: String,
    // `None` when the portal shows the `--` placeholder.
    pub average: Option<f64>,
    pub assessments: Vec<Assessment>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Assessment {
    // Kept verbatim as `DD.MM.YYYY`.
    pub date: String,
    pub topic: String,
    pub grade: Option<f64>,
    pub weight: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GradeSummary {
    pub plus_points: f64,
    pub courses_above_4: usize,
    pub courses_below_4: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum GradeBand {
    Excellent,
    Good,
    Sufficient,
    Insufficient,
    Missing,
}

// Always three fractional digits, `2024-03-14T09:12:44.000Z`, like a browser's toISOString.
fn iso_millis<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}
