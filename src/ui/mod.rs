// This module is only used when the `ui` feature is enabled.
pub mod commands;
pub mod handlers;
pub mod platform;
pub mod state;

pub use commands::{Command, parse_command};
pub use handlers::{on_command, show_notifications};
pub use platform::{ArboardClipboard, DialogFolderPicker};
pub use state::ViewState;
