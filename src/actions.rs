use std::path::PathBuf;

use log::{debug, error};
use scraper::Html;
use serde::{Deserialize, Serialize};

use crate::utils::clipboard::ClipboardSink;
use crate::utils::export::{copy_grades_to_clipboard, download_grades_json};
use crate::utils::extract::{extract_grades, is_grades_page};

// Host requests, keyed by the `action` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Action {
    DownloadGrades,
    CopyGrades,
    CheckPage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Done {
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        error: Option<String>,
    },
    Page {
        exists: bool,
    },
}

impl Response {
    fn ok() -> Self {
        Response::Done { success: true, error: None }
    }

    fn failed(message: impl Into<String>) -> Self {
        Response::Done { success: false, error: Some(message.into()) }
    }
}

pub struct ActionContext<'a> {
    pub out_dir: PathBuf,
    pub clipboard: &'a mut dyn ClipboardSink,
}

// Runs one action against a freshly parsed page and answers it.
pub fn handle(action: Action, document: &Html, ctx: &mut ActionContext<'_>) -> Response {
    debug!("Received action {:?}", action);

    match action {
        Action::DownloadGrades => {
            let record = extract_grades(document);
            match download_grades_json(record.as_ref(), &ctx.out_dir) {
                Ok(Some(_)) => Response::ok(),
                Ok(None) => Response::failed("Grades table not found on this page"),
                Err(e) => {
                    error!("Error in downloadGrades: {:#}", e);
                    Response::failed(format!("{:#}", e))
                }
            }
        }
        Action::CopyGrades => {
            let record = extract_grades(document);
            let success = copy_grades_to_clipboard(record.as_ref(), ctx.clipboard);
            Response::Done { success, error: None }
        }
        Action::CheckPage => Response::Page { exists: is_grades_page(document) },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::TempDir;

    #[derive(Default)]
    struct MemoryClipboard(Option<String>);

    impl ClipboardSink for MemoryClipboard {
        fn set_text(&mut self, text: &str) -> Result<()> {
            self.0 = Some(text.to_string());
            Ok(())
        }
    }

    const PAGE: &str = r#"<html><body><div class="div_noten"><h3>Aktuelle Noten - Muster Anna</h3>
        <table class="mdl-data-table"><tbody><tr><td><b>M</b><br>Mathematik</td><td>5.0</td></tr></tbody></table>
        </div></body></html>"#;

    #[test]
    fn actions_parse_from_host_messages() {
        let action: Action = serde_json::from_str(r#"{"action":"checkPage"}"#).unwrap();
        assert_eq!(action, Action::CheckPage);
        let action: Action = serde_json::from_str(r#"{"action":"downloadGrades"}"#).unwrap();
        assert_eq!(action, Action::DownloadGrades);
        assert!(serde_json::from_str::<Action>(r#"{"action":"format"}"#).is_err());
    }

    #[test]
    fn responses_serialize_like_the_host_expects() {
        assert_eq!(serde_json::to_string(&Response::ok()).unwrap(), r#"{"success":true}"#);
        assert_eq!(
            serde_json::to_string(&Response::Page { exists: false }).unwrap(),
            r#"{"exists":false}"#
        );
    }

    #[test]
    fn check_page_reports_presence_of_grades() {
        let dir = TempDir::new().unwrap();
        let mut clipboard = MemoryClipboard::default();
        let mut ctx = ActionContext { out_dir: dir.path().to_path_buf(), clipboard: &mut clipboard };

        let grades = Html::parse_document(PAGE);
        let other = Html::parse_document("<html><body><p>Login</p></body></html>");

        assert_eq!(handle(Action::CheckPage, &grades, &mut ctx), Response::Page { exists: true });
        assert_eq!(handle(Action::CheckPage, &other, &mut ctx), Response::Page { exists: false });
    }

    #[test]
    fn download_and_copy_on_the_grades_page() {
        let dir = TempDir::new().unwrap();
        let mut clipboard = MemoryClipboard::default();
        let doc = Html::parse_document(PAGE);

        {
            let mut ctx = ActionContext { out_dir: dir.path().to_path_buf(), clipboard: &mut clipboard };
            assert_eq!(handle(Action::DownloadGrades, &doc, &mut ctx), Response::ok());
            assert_eq!(handle(Action::CopyGrades, &doc, &mut ctx), Response::ok());
        }

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
        assert!(clipboard.0.unwrap().contains("Mathematik"));
    }

    #[test]
    fn download_on_wrong_page_fails_softly() {
        let dir = TempDir::new().unwrap();
        let mut clipboard = MemoryClipboard::default();
        let mut ctx = ActionContext { out_dir: dir.path().to_path_buf(), clipboard: &mut clipboard };
        let doc = Html::parse_document("<html><body></body></html>");

        match handle(Action::DownloadGrades, &doc, &mut ctx) {
            Response::Done { success, error } => {
                assert!(!success);
                assert!(error.is_some());
            }
            other => panic!("unexpected response {:?}", other),
        }
        assert_eq!(handle(Action::CopyGrades, &doc, &mut ctx), Response::Done { success: false, error: None });
    }
}
