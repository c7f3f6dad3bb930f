use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("history slot {0} is reserved for the most recent folder")]
    ReservedSlot(usize),

    #[error("history slot {index} does not exist ({len} slots)")]
    SlotOutOfRange { index: usize, len: usize },

    #[error("a slot name cannot be empty")]
    EmptyName,

    #[error("{} is not part of the current snapshot", .0.display())]
    UnknownPath(PathBuf),

    #[error("no folder is open")]
    NoFolderOpen,

    #[error("history file could not be written: {0}")]
    HistoryWrite(#[source] std::io::Error),

    #[error("export artifact could not be written: {0}")]
    ArtifactWrite(#[source] std::io::Error),

    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
