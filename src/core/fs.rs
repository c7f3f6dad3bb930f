use crate::core::{IgnoreMatcher, Node, NodeKind};
use std::{
    ffi::OsString,
    fs, io,
    path::{Component, Path, PathBuf},
};
use tracing::debug;

type NamePath = (String, PathBuf);

/* =========================== Filesystem & paths ============================ */

/// Forward-slash rendering of `p`. Windows prefixes keep their drive or
/// server name with their backslashes flipped.
#[must_use]
pub fn path_to_unix(p: &Path) -> String {
    let mut s = String::new();
    for comp in p.components() {
        match comp {
            Component::RootDir => {
                if !s.ends_with('/') {
                    s.push('/');
                }
            }
            Component::Prefix(prefix) => {
                s.push_str(&prefix.as_os_str().to_string_lossy().replace('\\', "/"));
            }
            _ => {
                if !s.is_empty() && !s.ends_with('/') {
                    s.push('/');
                }
                s.push_str(&comp.as_os_str().to_string_lossy());
            }
        }
    }
    s
}

/// Absolute, canonical form of `p` when it exists; otherwise a lexical
/// cleanup of `.` and `..` components.
#[must_use]
pub fn normalize_path(p: &Path) -> PathBuf {
    if p.as_os_str().is_empty() {
        return PathBuf::new();
    }

    if let Ok(c) = dunce::canonicalize(p) {
        return c;
    }

    let mut out = PathBuf::new();
    let mut parts: Vec<OsString> = Vec::new();

    for comp in p.components() {
        match comp {
            Component::Prefix(_) | Component::RootDir => {
                out.push(comp.as_os_str());
            }
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(last) if last != ".." => {
                    parts.pop();
                }
                _ if out.as_os_str().is_empty() => parts.push(OsString::from("..")),
                _ => {}
            },
            Component::Normal(name) => parts.push(name.to_os_string()),
        }
    }

    for part in parts {
        out.push(part);
    }
    out
}

/// Write-temp-then-rename, so a crash mid-write leaves the previous file intact.
pub fn write_atomically(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    fs::write(&tmp, data)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}

/* ================================ Scanning ================================= */

#[derive(Default, Debug)]
pub struct ScanStats {
    /// Root-relative paths left out by the ignore matcher (subtrees not walked).
    pub ignored: Vec<String>,
    /// Directories whose listing failed and were treated as empty.
    pub unreadable_dirs: Vec<PathBuf>,
}

#[derive(Debug)]
pub struct ScanResult {
    pub node: Node,
    pub stats: ScanStats,
}

/// Builds an immutable snapshot of `dir`.
///
/// Ignore patterns are matched against the root-relative, forward-slash path
/// of each entry. Children are ordered files first, then directories, each
/// group case-insensitively by name. Unreadable directories come back empty.
#[must_use]
pub fn scan_dir_to_node(dir: &Path, ignore: &IgnoreMatcher) -> Node {
    scan_dir_to_node_with_stats(dir, ignore).node
}

#[must_use]
pub fn scan_dir_to_node_with_stats(dir: &Path, ignore: &IgnoreMatcher) -> ScanResult {
    let mut stats = ScanStats::default();
    let node = scan_dir_internal(dir, dir, ignore, &mut stats);
    debug!(
        root = %dir.display(),
        ignored = stats.ignored.len(),
        unreadable = stats.unreadable_dirs.len(),
        "scanned folder"
    );
    ScanResult { node, stats }
}

fn scan_dir_internal(
    root: &Path,
    dir: &Path,
    ignore: &IgnoreMatcher,
    stats: &mut ScanStats,
) -> Node {
    let name = dir
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let mut node = Node {
        name,
        path: dir.to_path_buf(),
        kind: NodeKind::Directory,
        children: Vec::new(),
    };

    let (mut files, mut dirs) = gather_dir_entries(root, dir, ignore, stats);

    sort_case_insensitive(&mut files);
    sort_case_insensitive(&mut dirs);

    node.children.reserve(files.len() + dirs.len());

    for (basename, path) in files {
        node.children.push(Node {
            name: basename,
            path,
            kind: NodeKind::File,
            children: Vec::new(),
        });
    }

    for (_basename, path) in dirs {
        let child = scan_dir_internal(root, &path, ignore, stats);
        node.children.push(child);
    }

    node
}

fn sort_case_insensitive(entries: &mut [NamePath]) {
    entries.sort_by(|a, b| {
        a.0.to_lowercase()
            .cmp(&b.0.to_lowercase())
            .then_with(|| a.0.cmp(&b.0))
    });
}

fn gather_dir_entries(
    root: &Path,
    dir: &Path,
    ignore: &IgnoreMatcher,
    stats: &mut ScanStats,
) -> (Vec<NamePath>, Vec<NamePath>) {
    let entries = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "treating unreadable folder as empty");
            stats.unreadable_dirs.push(dir.to_path_buf());
            return (Vec::new(), Vec::new());
        }
    };

    let mut dirs: Vec<NamePath> = Vec::new();
    let mut files: Vec<NamePath> = Vec::new();

    for ent in entries.flatten() {
        let path = ent.path();
        let base: String = ent.file_name().to_string_lossy().into_owned();

        let abs = path_to_unix(&path);
        let rel = path
            .strip_prefix(root)
            .map_or_else(|_| abs.clone(), path_to_unix);
        if ignore.should_ignore_entry(&rel, &abs) {
            stats.ignored.push(rel);
            continue;
        }

        let Ok(ft) = ent.file_type() else {
            continue;
        };
        if ft.is_dir() {
            dirs.push((base, path));
            continue;
        }
        // Symlinked folders are not followed; they could loop back into the tree.
        if ft.is_symlink() && fs::metadata(&path).is_ok_and(|m| m.is_dir()) {
            continue;
        }

        files.push((base, path));
    }

    (files, dirs)
}
