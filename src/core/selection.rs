use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::core::{CoreError, CoreResult, Node};

/// Derived checkbox state of a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirState {
    Empty,
    Partial,
    Full,
}

/// Selection state for one snapshot.
///
/// Files carry the real booleans. Directories carry a display flag that
/// toggles and seeding keep in step with their descendants; the authoritative
/// folder state is always [`SelectionModel::dir_state`], computed from files.
#[derive(Debug, Clone)]
pub struct SelectionModel {
    root: Node,
    files: HashMap<PathBuf, bool>,
    dir_flags: HashMap<PathBuf, bool>,
}

impl SelectionModel {
    /// Seeds from a prior selection. Entries that are not files of `root`
    /// are dropped.
    pub fn seed<I, P>(root: Node, prior: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let prior: HashSet<PathBuf> = prior
            .into_iter()
            .map(|p| p.as_ref().to_path_buf())
            .collect();

        let mut files = HashMap::new();
        let mut dir_flags = HashMap::new();
        seed_rec(&root, &prior, &mut files, &mut dir_flags);

        let kept = files.values().filter(|v| **v).count();
        if kept < prior.len() {
            debug!(
                dropped = prior.len() - kept,
                "dropped stale paths from saved selection"
            );
        }

        Self {
            root,
            files,
            dir_flags,
        }
    }

    #[must_use]
    pub fn empty(root: Node) -> Self {
        Self::seed(root, std::iter::empty::<PathBuf>())
    }

    #[must_use]
    pub const fn root(&self) -> &Node {
        &self.root
    }

    #[must_use]
    pub fn is_selected(&self, file: &Path) -> bool {
        self.files.get(file).copied().unwrap_or(false)
    }

    /// The display flag of a directory, as last set by seeding or a toggle.
    #[must_use]
    pub fn dir_flag(&self, dir: &Path) -> bool {
        self.dir_flags.get(dir).copied().unwrap_or(false)
    }

    /// Full / partial / empty, recomputed from the descendant files. A folder
    /// without any files reports its display flag.
    #[must_use]
    pub fn dir_state(&self, dir: &Path) -> DirState {
        let Some(node) = self.root.find(dir).filter(|n| n.is_dir()) else {
            return DirState::Empty;
        };
        let (mut on, mut total) = (0usize, 0usize);
        for f in node.descendant_files() {
            total += 1;
            if self.is_selected(f) {
                on += 1;
            }
        }
        match (on, total) {
            (_, 0) if self.dir_flag(dir) => DirState::Full,
            (0, _) => DirState::Empty,
            (on, total) if on == total => DirState::Full,
            _ => DirState::Partial,
        }
    }

    /// Sets one file. Returns the paths whose state may have changed (the file
    /// and its ancestor folders).
    pub fn toggle_file(&mut self, file: &Path, value: bool) -> CoreResult<Vec<PathBuf>> {
        match self.files.get_mut(file) {
            Some(v) => *v = value,
            None => return Err(CoreError::UnknownPath(file.to_path_buf())),
        }
        let mut affected = vec![file.to_path_buf()];
        affected.extend(self.refresh_ancestor_flags(file));
        Ok(affected)
    }

    /// Cascades `value` to every descendant of `dir` and mirrors it on the
    /// folder's own flag.
    pub fn toggle_folder(&mut self, dir: &Path, value: bool) -> CoreResult<Vec<PathBuf>> {
        let Some(node) = self.root.find(dir).filter(|n| n.is_dir()) else {
            return Err(CoreError::UnknownPath(dir.to_path_buf()));
        };
        let mut affected = Vec::new();
        cascade(node, value, &mut self.files, &mut self.dir_flags, &mut affected);
        affected.extend(self.refresh_ancestor_flags(dir));
        Ok(affected)
    }

    /// Routes to [`Self::toggle_file`] or [`Self::toggle_folder`] by node kind.
    pub fn toggle(&mut self, path: &Path, value: bool) -> CoreResult<Vec<PathBuf>> {
        match self.root.find(path) {
            Some(n) if n.is_dir() => self.toggle_folder(path, value),
            Some(_) => self.toggle_file(path, value),
            None => Err(CoreError::UnknownPath(path.to_path_buf())),
        }
    }

    pub fn select_all(&mut self) {
        self.set_all(true);
    }

    pub fn deselect_all(&mut self) {
        self.set_all(false);
    }

    fn set_all(&mut self, value: bool) {
        self.files.values_mut().for_each(|v| *v = value);
        self.dir_flags.values_mut().for_each(|v| *v = value);
    }

    /// Selected files in snapshot order.
    #[must_use]
    pub fn collect(&self) -> Vec<PathBuf> {
        self.root
            .descendant_files()
            .into_iter()
            .filter(|p| self.is_selected(p))
            .map(Path::to_path_buf)
            .collect()
    }

    /// Selected files rendered as strings, the form the history file stores.
    #[must_use]
    pub fn collect_strings(&self) -> Vec<String> {
        self.collect()
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect()
    }

    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.files.values().filter(|v| **v).count()
    }

    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    fn refresh_ancestor_flags(&mut self, path: &Path) -> Vec<PathBuf> {
        let mut changed = Vec::new();
        let mut cur = path.parent();
        while let Some(dir) = cur {
            if !dir.starts_with(&self.root.path) {
                break;
            }
            if let Some(node) = self.root.find(dir) {
                let any = node.descendant_files().iter().any(|f| self.is_selected(f));
                self.dir_flags.insert(dir.to_path_buf(), any);
                changed.push(dir.to_path_buf());
            }
            cur = dir.parent();
        }
        changed
    }
}

fn seed_rec(
    n: &Node,
    prior: &HashSet<PathBuf>,
    files: &mut HashMap<PathBuf, bool>,
    dirs: &mut HashMap<PathBuf, bool>,
) -> bool {
    if n.is_file() {
        let on = prior.contains(&n.path);
        files.insert(n.path.clone(), on);
        return on;
    }
    let mut any = false;
    for c in &n.children {
        any |= seed_rec(c, prior, files, dirs);
    }
    dirs.insert(n.path.clone(), any);
    any
}

fn cascade(
    n: &Node,
    value: bool,
    files: &mut HashMap<PathBuf, bool>,
    dirs: &mut HashMap<PathBuf, bool>,
    affected: &mut Vec<PathBuf>,
) {
    if n.is_file() {
        files.insert(n.path.clone(), value);
    } else {
        dirs.insert(n.path.clone(), value);
        for c in &n.children {
            cascade(c, value, files, dirs, affected);
        }
    }
    affected.push(n.path.clone());
}
