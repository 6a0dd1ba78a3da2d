use anyhow::{Context, Result};

// Anything the JSON export can be copied into. The system clipboard is missing in
// SSH sessions and headless environments, so writes report failure as an error.
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

// The platform clipboard, opened on each write.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new().context("Clipboard not available")?;
        clipboard
            .set_text(text.to_string())
            .context("Clipboard refused the text")
    }
}
