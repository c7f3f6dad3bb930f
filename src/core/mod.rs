use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory,
}

/// UI-free representation of a filesystem entry inside a snapshot.
///
/// `path` is absolute and unique within the snapshot. Only directories carry
/// children; they are fully materialized when the snapshot is built.
#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,
    pub path: PathBuf,
    pub kind: NodeKind,
    pub children: Vec<Node>,
}

impl Node {
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory)
    }

    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File)
    }

    /// Finds the node with exactly `target` as its path.
    #[must_use]
    pub fn find(&self, target: &Path) -> Option<&Self> {
        if self.path == target {
            return Some(self);
        }
        if !self.is_dir() || !target.starts_with(&self.path) {
            return None;
        }
        self.children.iter().find_map(|c| c.find(target))
    }

    /// Every file below (or at) this node, in snapshot traversal order.
    #[must_use]
    pub fn descendant_files(&self) -> Vec<&Path> {
        let mut out = Vec::new();
        push_files(self, &mut out);
        out
    }
}

fn push_files<'a>(n: &'a Node, out: &mut Vec<&'a Path>) {
    if n.is_file() {
        out.push(&n.path);
        return;
    }
    for c in &n.children {
        push_files(c, out);
    }
}

mod config;
mod error;
mod export;
mod fs;
mod history;
mod ignore;
mod selection;
mod session;
mod text;

pub use config::*;
pub use error::*;
pub use export::*;
pub use fs::*;
pub use history::*;
pub use ignore::*;
pub use selection::*;
pub use session::*;
pub use text::*;
