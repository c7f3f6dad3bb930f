use std::path::PathBuf;

use treecopy::core::{ClipboardSink, CoreError, CoreResult, FolderPicker};

/// System clipboard. The handle is opened per copy so a clipboard that
/// appears after startup still works.
#[derive(Default)]
pub struct ArboardClipboard;

impl ClipboardSink for ArboardClipboard {
    fn set_text(&mut self, text: &str) -> CoreResult<()> {
        let mut cb = arboard::Clipboard::new().map_err(|e| CoreError::Clipboard(e.to_string()))?;
        cb.set_text(text.to_string())
            .map_err(|e| CoreError::Clipboard(e.to_string()))
    }
}

/// Native folder dialog.
pub struct DialogFolderPicker {
    pub title: String,
}

impl Default for DialogFolderPicker {
    fn default() -> Self {
        Self {
            title: "Select the folder to map".to_string(),
        }
    }
}

impl FolderPicker for DialogFolderPicker {
    fn pick_folder(&mut self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title(&self.title)
            .set_directory(".")
            .pick_folder()
    }
}
