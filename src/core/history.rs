use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{CoreError, CoreResult, write_atomically};

pub const DEFAULT_HISTORY_CAPACITY: usize = 30;
pub const DEFAULT_NAME_MAX_LEN: usize = 30;
const FALLBACK_SLOT_NAME: &str = "History";

/* ================================ Slots ==================================== */

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct HistorySlot {
    /// Absolute folder path; empty marks an unused slot.
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub selected: Vec<String>,
    /// ISO-8601 local time, or empty when never saved.
    #[serde(default)]
    pub saved_at: String,
    #[serde(default)]
    pub name: String,
}

impl HistorySlot {
    #[must_use]
    pub const fn is_unused(&self) -> bool {
        self.path.is_empty()
    }

    /// Name shown to the user: the stored name, else the folder's base name.
    #[must_use]
    pub fn display_name(&self) -> String {
        if !self.name.trim().is_empty() {
            return self.name.clone();
        }
        folder_base_name(&self.path).unwrap_or_else(|| "No folder".to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HistoryFile {
    #[serde(default)]
    pub history: Vec<HistorySlot>,
}

/// Case-insensitive folder comparison that also ignores separator style and
/// trailing separators.
#[must_use]
pub fn same_folder(a: &str, b: &str) -> bool {
    fn norm(s: &str) -> String {
        let s = s.replace('\\', "/").to_lowercase();
        let trimmed = s.trim_end_matches('/');
        if trimmed.is_empty() { s } else { trimmed.to_string() }
    }
    norm(a) == norm(b)
}

fn folder_base_name(path: &str) -> Option<String> {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
}

#[must_use]
pub fn timestamp_now() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Trims and cuts `name` to `max_len` characters.
#[must_use]
pub fn bound_name(name: &str, max_len: usize) -> String {
    name.trim().chars().take(max_len).collect()
}

/* ============================== Persistence ================================ */

/// Reads the history file. Missing or malformed files yield `None`.
#[must_use]
pub fn read_history_file(path: &Path) -> Option<HistoryFile> {
    let data = fs::read(path).ok()?;
    match serde_json::from_slice::<HistoryFile>(&data) {
        Ok(f) => Some(f),
        Err(e) => {
            warn!(file = %path.display(), error = %e, "history file is corrupt; starting empty");
            None
        }
    }
}

pub fn write_history_file(path: &Path, slots: &[HistorySlot]) -> io::Result<()> {
    let file = HistoryFile {
        history: slots.to_vec(),
    };
    let data = serde_json::to_vec_pretty(&file).map_err(|e| io::Error::other(e.to_string()))?;
    write_atomically(path, &data)
}

/// Brings a loaded list in line with the MRU policy: unused slots dropped,
/// duplicate folders collapsed onto their first (most recent) slot, and the
/// list cut to `capacity` keeping positions.
#[must_use]
pub fn normalize_slots(slots: Vec<HistorySlot>, capacity: usize) -> Vec<HistorySlot> {
    let mut out: Vec<HistorySlot> = Vec::with_capacity(slots.len().min(capacity));
    for slot in slots {
        if slot.is_unused() {
            continue;
        }
        if out.iter().any(|s| same_folder(&s.path, &slot.path)) {
            continue;
        }
        out.push(slot);
    }
    out.truncate(capacity);
    out
}

/* ================================= Store =================================== */

/// Most-recently-used history of folders and their selections.
///
/// Every mutation is written through to disk. A failed write is returned to
/// the caller but the in-memory list keeps the change.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    file: PathBuf,
    capacity: usize,
    name_max_len: usize,
    slots: Vec<HistorySlot>,
}

impl HistoryStore {
    /// Loads `file`, never failing: a missing or corrupt file gives an empty store.
    #[must_use]
    pub fn load(file: &Path, capacity: usize, name_max_len: usize) -> Self {
        let capacity = capacity.max(1);
        let raw = read_history_file(file).map(|f| f.history).unwrap_or_default();
        let slots = normalize_slots(raw, capacity);
        debug!(file = %file.display(), slots = slots.len(), "loaded history");
        Self {
            file: file.to_path_buf(),
            capacity,
            name_max_len,
            slots,
        }
    }

    #[must_use]
    pub fn slots(&self) -> &[HistorySlot] {
        &self.slots
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&HistorySlot> {
        self.slots.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Index of the slot holding `folder`, compared case-insensitively.
    #[must_use]
    pub fn find(&self, folder: &str) -> Option<usize> {
        self.slots.iter().position(|s| same_folder(&s.path, folder))
    }

    /// Records `selected` for `folder` and moves that slot to the front.
    /// A new folder gets a fresh slot; the oldest slots past capacity are evicted.
    pub fn upsert(
        &mut self,
        folder: &str,
        selected: Vec<String>,
        name: Option<&str>,
    ) -> CoreResult<()> {
        let name = name
            .map(|n| bound_name(n, self.name_max_len))
            .filter(|n| !n.is_empty());

        let slot = match self.find(folder) {
            Some(i) => {
                let mut slot = self.slots.remove(i);
                slot.selected = selected;
                slot.saved_at = timestamp_now();
                if let Some(n) = name {
                    slot.name = n;
                }
                slot
            }
            None => HistorySlot {
                path: folder.to_string(),
                selected,
                saved_at: timestamp_now(),
                name: name.unwrap_or_else(|| {
                    folder_base_name(folder).map_or_else(
                        || FALLBACK_SLOT_NAME.to_string(),
                        |n| bound_name(&n, self.name_max_len),
                    )
                }),
            },
        };
        self.slots.insert(0, slot);

        if self.slots.len() > self.capacity {
            for evicted in self.slots.drain(self.capacity..) {
                debug!(path = %evicted.path, "evicted history slot");
            }
        }
        self.save()
    }

    /// Renames a slot. Slot 0 always tracks the most recent folder and cannot
    /// be renamed.
    pub fn rename(&mut self, index: usize, new_name: &str) -> CoreResult<()> {
        if index == 0 {
            return Err(CoreError::ReservedSlot(0));
        }
        let len = self.slots.len();
        let max = self.name_max_len;
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(CoreError::SlotOutOfRange { index, len })?;
        let bounded = bound_name(new_name, max);
        if bounded.is_empty() {
            return Err(CoreError::EmptyName);
        }
        slot.name = bounded;
        self.save()
    }

    /// Removes a slot and shifts the later ones up.
    pub fn remove(&mut self, index: usize) -> CoreResult<HistorySlot> {
        if index >= self.slots.len() {
            return Err(CoreError::SlotOutOfRange {
                index,
                len: self.slots.len(),
            });
        }
        let removed = self.slots.remove(index);
        self.save()?;
        Ok(removed)
    }

    pub fn save(&self) -> CoreResult<()> {
        write_history_file(&self.file, &self.slots).map_err(|e| {
            warn!(file = %self.file.display(), error = %e, "could not write history");
            CoreError::HistoryWrite(e)
        })
    }
}
