use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::{error, info};

use crate::models::GradeRecord;
use crate::utils::clipboard::ClipboardSink;

// Pretty JSON with two-space indentation, the shape users download and paste.
pub fn to_json(record: &GradeRecord) -> Result<String> {
    serde_json::to_string_pretty(record).context("Failed to serialize grades")
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("grades_{}.json", date.format("%Y-%m-%d"))
}

// Saves the record as `grades_YYYY-MM-DD.json` (UTC date) inside `out_dir`.
// Without a record there is nothing to save: logs and returns `Ok(None)`.
pub fn download_grades_json(record: Option<&GradeRecord>, out_dir: &Path) -> Result<Option<PathBuf>> {
    download_grades_json_on(record, out_dir, chrono::Utc::now().date_naive())
}

pub fn download_grades_json_on(
    record: Option<&GradeRecord>,
    out_dir: &Path,
    date: NaiveDate,
) -> Result<Option<PathBuf>> {
    let Some(record) = record else {
        error!("No data extracted, grades div not found");
        return Ok(None);
    };

    let json = to_json(record)?;
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let path = out_dir.join(export_file_name(date));
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Grades saved to {}", path.display());
    Ok(Some(path))
}

// Copies the JSON export to the clipboard. Never fails past this point: any
// problem is logged and reported as `false`.
pub fn copy_grades_to_clipboard(record: Option<&GradeRecord>, clipboard: &mut dyn ClipboardSink) -> bool {
    let Some(record) = record else {
        error!("No data extracted, grades div not found");
        return false;
    };

    let json = match to_json(record) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to copy: {:#}", e);
            return false;
        }
    };

    match clipboard.set_text(&json) {
        Ok(()) => {
            info!("Grades copied to clipboard");
            true
        }
        Err(e) => {
            error!("Failed to copy: {:#}", e);
            false
        }
    }
}
