use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::{
    ClipboardSink, CoreError, CoreResult, HistoryStore, IgnoreMatcher, SelectionModel, Settings,
    export_bundle, normalize_path, render_tree_text, scan_dir_to_node,
};

/// What the View asks the core to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    OpenFolder(PathBuf),
    ToggleFile { path: PathBuf, value: bool },
    ToggleFolder { path: PathBuf, value: bool },
    SelectAll,
    DeselectAll,
    Confirm,
    SelectHistorySlot(usize),
    RenameHistorySlot { index: usize, name: String },
    RemoveHistorySlot(usize),
    OpenNewFolderIntoSlot(PathBuf),
    MapStructure,
}

/// What the core tells the View after an intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A new snapshot is loaded, or none is left.
    FolderChanged(Option<PathBuf>),
    SelectionChanged(Vec<PathBuf>),
    HistoryChanged,
    ExportSucceeded(String),
    ExportFailed(String),
    Warning(String),
}

/// Source of a folder when the session has nothing to resume.
pub trait FolderPicker {
    fn pick_folder(&mut self) -> Option<PathBuf>;
}

/// One interactive session: the open snapshot with its selection, the history
/// and the clipboard. All View intents go through [`Session::apply`].
pub struct Session<C: ClipboardSink> {
    settings: Settings,
    ignore: IgnoreMatcher,
    history: HistoryStore,
    current: Option<SelectionModel>,
    clipboard: C,
}

impl<C: ClipboardSink> Session<C> {
    pub fn new(settings: Settings, clipboard: C) -> Self {
        let ignore = IgnoreMatcher::with_extra_file(&settings.ignore_file);
        Self::with_ignore(settings, ignore, clipboard)
    }

    pub fn with_ignore(settings: Settings, ignore: IgnoreMatcher, clipboard: C) -> Self {
        let history = HistoryStore::load(
            &settings.history_file,
            settings.history_capacity,
            settings.max_name_len,
        );
        Self {
            settings,
            ignore,
            history,
            current: None,
            clipboard,
        }
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub const fn history(&self) -> &HistoryStore {
        &self.history
    }

    #[must_use]
    pub const fn selection(&self) -> Option<&SelectionModel> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn current_folder(&self) -> Option<&Path> {
        self.current.as_ref().map(|m| m.root().path.as_path())
    }

    #[must_use]
    pub const fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// Reopens the most recent folder, or asks `picker` for one when the
    /// history is empty. A freshly picked folder is recorded right away.
    /// Returns `None` when no folder could be opened (picker cancelled).
    pub fn start<P: FolderPicker>(&mut self, picker: &mut P) -> Option<Vec<Notification>> {
        if !self.history.is_empty() {
            let notes = self.select_history_slot(0);
            if self.current.is_some() {
                return Some(notes);
            }
        }
        let Some(folder) = picker.pick_folder() else {
            info!("no folder selected");
            return None;
        };
        let notes = self.open_new_folder_into_slot(&folder);
        self.current.is_some().then_some(notes)
    }

    pub fn apply(&mut self, intent: Intent) -> Vec<Notification> {
        debug!(?intent, "apply");
        match intent {
            Intent::OpenFolder(p) => self.open_folder(&p),
            Intent::ToggleFile { path, value } => {
                self.with_selection(|m| m.toggle_file(&path, value))
            }
            Intent::ToggleFolder { path, value } => {
                self.with_selection(|m| m.toggle_folder(&path, value))
            }
            Intent::SelectAll => self.with_selection(|m| {
                m.select_all();
                Ok(vec![m.root().path.clone()])
            }),
            Intent::DeselectAll => self.with_selection(|m| {
                m.deselect_all();
                Ok(vec![m.root().path.clone()])
            }),
            Intent::Confirm => self.confirm(),
            Intent::SelectHistorySlot(i) => self.select_history_slot(i),
            Intent::RenameHistorySlot { index, name } => {
                let res = self.history.rename(index, &name);
                history_notes(res)
            }
            Intent::RemoveHistorySlot(i) => self.remove_history_slot(i),
            Intent::OpenNewFolderIntoSlot(p) => self.open_new_folder_into_slot(&p),
            Intent::MapStructure => self.map_structure(),
        }
    }

    /* ------------------------------ folders ------------------------------ */

    fn open_folder(&mut self, folder: &Path) -> Vec<Notification> {
        let folder = normalize_path(folder);
        let key = folder.to_string_lossy().into_owned();
        let prior = self
            .history
            .find(&key)
            .and_then(|i| self.history.get(i))
            .map(|s| s.selected.clone())
            .unwrap_or_default();
        self.load_snapshot(&folder, &prior)
    }

    fn load_snapshot(&mut self, folder: &Path, prior: &[String]) -> Vec<Notification> {
        if !folder.is_dir() {
            return vec![Notification::Warning(format!(
                "{} is not a folder",
                folder.display()
            ))];
        }
        let root = scan_dir_to_node(folder, &self.ignore);
        let model = SelectionModel::seed(root, prior);
        info!(
            folder = %folder.display(),
            files = model.file_count(),
            selected = model.selected_count(),
            "opened folder"
        );
        self.current = Some(model);
        vec![Notification::FolderChanged(Some(folder.to_path_buf()))]
    }

    fn with_selection<F>(&mut self, f: F) -> Vec<Notification>
    where
        F: FnOnce(&mut SelectionModel) -> CoreResult<Vec<PathBuf>>,
    {
        let Some(model) = self.current.as_mut() else {
            return vec![Notification::Warning(CoreError::NoFolderOpen.to_string())];
        };
        match f(model) {
            Ok(affected) => vec![Notification::SelectionChanged(affected)],
            Err(e) => vec![Notification::Warning(e.to_string())],
        }
    }

    /* ------------------------------ history ------------------------------ */

    fn select_history_slot(&mut self, index: usize) -> Vec<Notification> {
        let Some(slot) = self.history.get(index).cloned() else {
            return vec![Notification::Warning(
                CoreError::SlotOutOfRange {
                    index,
                    len: self.history.len(),
                }
                .to_string(),
            )];
        };
        let folder = normalize_path(Path::new(&slot.path));
        self.load_snapshot(&folder, &slot.selected)
    }

    fn open_new_folder_into_slot(&mut self, folder: &Path) -> Vec<Notification> {
        let folder = normalize_path(folder);
        if !folder.is_dir() {
            return vec![Notification::Warning(format!(
                "{} is not a folder",
                folder.display()
            ))];
        }
        let key = folder.to_string_lossy().into_owned();
        let mut notes = history_notes(self.history.upsert(&key, Vec::new(), None));
        notes.extend(self.load_snapshot(&folder, &[]));
        notes
    }

    fn remove_history_slot(&mut self, index: usize) -> Vec<Notification> {
        let mut notes = history_notes(self.history.remove(index).map(|_| ()));
        if !notes.contains(&Notification::HistoryChanged) {
            return notes;
        }
        if self.history.is_empty() {
            self.current = None;
            notes.push(Notification::FolderChanged(None));
        } else {
            notes.extend(self.select_history_slot(0));
        }
        notes
    }

    /* ------------------------------ exports ------------------------------ */

    fn confirm(&mut self) -> Vec<Notification> {
        let Some(model) = self.current.as_ref() else {
            return vec![Notification::ExportFailed(CoreError::NoFolderOpen.to_string())];
        };
        let selected = model.collect();
        let folder = model.root().path.to_string_lossy().into_owned();
        if selected.is_empty() {
            // Nothing to copy, but the cleared selection is still remembered.
            let mut notes = vec![Notification::ExportFailed("No files selected.".to_string())];
            notes.extend(history_notes(self.history.upsert(&folder, Vec::new(), None)));
            return notes;
        }
        let selected_strings = model.collect_strings();

        let report = export_bundle(&selected, &self.settings.output_file, &mut self.clipboard);

        let mut notes = Vec::new();
        let mut summary = report.bundle.stats_line();
        if !report.bundle.unreadable.is_empty() {
            summary.push_str(&format!(
                " ({} unreadable)",
                report.bundle.unreadable.len()
            ));
        }

        match (&report.clipboard, &report.artifact) {
            (Err(e), Ok(artifact)) => notes.push(Notification::ExportFailed(format!(
                "{e}; bundle saved to {}",
                artifact.display()
            ))),
            (Err(e), Err(ae)) => notes.push(Notification::ExportFailed(format!("{e}; {ae}"))),
            (Ok(()), Err(ae)) => {
                notes.push(Notification::Warning(ae.to_string()));
                notes.push(Notification::ExportSucceeded(format!(
                    "Copied to clipboard: {summary}"
                )));
            }
            (Ok(()), Ok(_)) => notes.push(Notification::ExportSucceeded(format!(
                "Copied to clipboard: {summary}"
            ))),
        }

        notes.extend(history_notes(
            self.history.upsert(&folder, selected_strings, None),
        ));
        notes
    }

    fn map_structure(&mut self) -> Vec<Notification> {
        let Some(model) = self.current.as_ref() else {
            return vec![Notification::ExportFailed(CoreError::NoFolderOpen.to_string())];
        };
        let text = render_tree_text(model.root());
        let lines = text.lines().count();
        match self.clipboard.set_text(&text) {
            Ok(()) => vec![Notification::ExportSucceeded(format!(
                "Folder tree copied to clipboard ({lines} lines)"
            ))],
            Err(e) => vec![Notification::ExportFailed(e.to_string())],
        }
    }
}

/// A failed history write still leaves the in-memory change in place, so it
/// reports both the change and a warning.
fn history_notes(res: CoreResult<()>) -> Vec<Notification> {
    match res {
        Ok(()) => vec![Notification::HistoryChanged],
        Err(e @ CoreError::HistoryWrite(_)) => vec![
            Notification::HistoryChanged,
            Notification::Warning(e.to_string()),
        ],
        Err(e) => vec![Notification::Warning(e.to_string())],
    }
}
