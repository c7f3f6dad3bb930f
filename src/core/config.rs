use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::core::{DEFAULT_HISTORY_CAPACITY, DEFAULT_NAME_MAX_LEN, write_atomically};

pub const APP_DIR_NAME: &str = "treecopy";
pub const HISTORY_FILE_NAME: &str = "selection_state.json";
pub const IGNORE_FILE_NAME: &str = "never_select.json";
pub const OUTPUT_FILE_NAME: &str = "output.txt";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/* ================================ Settings ================================= */

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub version: u32,
    pub history_file: PathBuf,
    pub ignore_file: PathBuf,
    pub output_file: PathBuf,
    pub history_capacity: usize,
    pub max_name_len: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self::in_dir(&default_data_dir())
    }
}

impl Settings {
    /// Settings with every file placed inside `dir`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            version: 1,
            history_file: dir.join(HISTORY_FILE_NAME),
            ignore_file: dir.join(IGNORE_FILE_NAME),
            output_file: dir.join(OUTPUT_FILE_NAME),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            max_name_len: DEFAULT_NAME_MAX_LEN,
        }
    }
}

/// Per-user data directory, or the current directory when the platform has none.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir().map_or_else(|| PathBuf::from("."), |d| d.join(APP_DIR_NAME))
}

#[must_use]
pub fn default_settings_file() -> PathBuf {
    dirs::config_dir().map_or_else(
        || PathBuf::from(SETTINGS_FILE_NAME),
        |d| d.join(APP_DIR_NAME).join(SETTINGS_FILE_NAME),
    )
}

/* =============================== Settings IO =============================== */

#[must_use]
pub fn load_settings(path: &Path) -> Option<Settings> {
    let data = fs::read(path).ok()?;
    serde_json::from_slice::<Settings>(&data).ok()
}

pub fn save_settings(path: &Path, settings: &Settings) -> io::Result<()> {
    let data = serde_json::to_vec_pretty(settings).map_err(|e| io::Error::other(e.to_string()))?;
    write_atomically(path, &data)
}
