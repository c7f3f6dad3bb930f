use std::{collections::HashSet, path::PathBuf};

use treecopy::core::{DirState, Node, SelectionModel};

/// One printed line of the tree.
#[derive(Debug, Clone)]
pub struct Row {
    pub path: PathBuf,
    pub name: String,
    pub level: usize,
    pub is_dir: bool,
    pub collapsed: bool,
    /// Files: selected. Folders: derived state is `Full`.
    pub checked: bool,
    pub partial: bool,
}

#[derive(Default)]
pub struct ViewState {
    pub collapsed: HashSet<PathBuf>,
    pub rows: Vec<Row>,
    pub quit: bool,
}

impl ViewState {
    pub fn rebuild_rows(&mut self, model: Option<&SelectionModel>) {
        self.rows = model.map_or_else(Vec::new, |m| flatten_tree(m, &self.collapsed));
    }

    pub fn toggle_collapsed(&mut self, index: usize) -> bool {
        let Some(row) = self.rows.get(index).filter(|r| r.is_dir) else {
            return false;
        };
        let path = row.path.clone();
        if !self.collapsed.remove(&path) {
            self.collapsed.insert(path);
        }
        true
    }
}

fn flatten_tree(model: &SelectionModel, collapsed: &HashSet<PathBuf>) -> Vec<Row> {
    fn walk(
        n: &Node,
        model: &SelectionModel,
        collapsed: &HashSet<PathBuf>,
        level: usize,
        rows: &mut Vec<Row>,
    ) {
        let (checked, partial) = if n.is_dir() {
            match model.dir_state(&n.path) {
                DirState::Full => (true, false),
                DirState::Partial => (false, true),
                DirState::Empty => (false, false),
            }
        } else {
            (model.is_selected(&n.path), false)
        };
        let is_collapsed = n.is_dir() && collapsed.contains(&n.path);
        rows.push(Row {
            path: n.path.clone(),
            name: n.name.clone(),
            level,
            is_dir: n.is_dir(),
            collapsed: is_collapsed,
            checked,
            partial,
        });
        if n.is_dir() && !is_collapsed {
            for c in &n.children {
                walk(c, model, collapsed, level + 1, rows);
            }
        }
    }

    let mut rows = Vec::new();
    walk(model.root(), model, collapsed, 0, &mut rows);
    rows
}
