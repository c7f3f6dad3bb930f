#![allow(clippy::needless_return)]

#[cfg(feature = "ui")]
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};
use treecopy::core::{Settings, default_settings_file, load_settings, save_settings};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Folder to open instead of the most recent history slot.
    folder: Option<PathBuf>,
    /// Settings file (JSON).
    #[arg(long)]
    settings: Option<PathBuf>,
    /// History file, overriding the settings.
    #[arg(long)]
    history_file: Option<PathBuf>,
    /// Extra ignore-pattern file (JSON array of strings).
    #[arg(long)]
    ignore_file: Option<PathBuf>,
    /// Where the export artifact is written.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Number of history slots kept.
    #[arg(long)]
    capacity: Option<usize>,
    /// Write the effective settings to the settings file and exit.
    #[arg(long)]
    write_settings: bool,
}

impl CliArgs {
    fn settings_file(&self) -> PathBuf {
        self.settings.clone().unwrap_or_else(default_settings_file)
    }

    fn settings(&self) -> Settings {
        let mut s = load_settings(&self.settings_file()).unwrap_or_default();
        if let Some(p) = &self.history_file {
            s.history_file.clone_from(p);
        }
        if let Some(p) = &self.ignore_file {
            s.ignore_file.clone_from(p);
        }
        if let Some(p) = &self.output {
            s.output_file.clone_from(p);
        }
        if let Some(c) = self.capacity {
            s.history_capacity = c.max(1);
        }
        s
    }
}

/// Persists the merged settings so later runs pick them up without flags.
fn write_settings(args: &CliArgs) -> anyhow::Result<()> {
    let file = args.settings_file();
    save_settings(&file, &args.settings())
        .with_context(|| format!("writing settings to {}", file.display()))?;
    println!("Settings written to {}", file.display());
    Ok(())
}

fn initialize_logger() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("treecopy=info"));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "ui")]
fn main() -> anyhow::Result<()> {
    use std::io::{BufRead, Write};
    use treecopy::core::{Intent, Session};
    use ui::{
        ArboardClipboard, DialogFolderPicker, ViewState, on_command, parse_command,
        show_notifications,
    };

    let args = CliArgs::parse();
    initialize_logger();
    if args.write_settings {
        return write_settings(&args);
    }

    let mut session = Session::new(args.settings(), ArboardClipboard);
    let mut picker = DialogFolderPicker::default();
    let mut view = ViewState::default();

    let notes = match &args.folder {
        Some(folder) => session.apply(Intent::OpenFolder(folder.clone())),
        None => match session.start(&mut picker) {
            Some(notes) => notes,
            None => {
                println!("No folder was selected.");
                return Ok(());
            }
        },
    };
    show_notifications(&session, &mut view, &notes);
    println!("Type ? for help.");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    while !view.quit {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        on_command(&mut session, &mut view, &mut picker, parse_command(&line?));
    }
    Ok(())
}

#[cfg(not(feature = "ui"))]
fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    initialize_logger();
    if args.write_settings {
        return write_settings(&args);
    }
    eprintln!(
        "Built without the `ui` feature; nothing to run. \
Enable it with `--features ui`, or just run tests with `--no-default-features`."
    );
    Ok(())
}
