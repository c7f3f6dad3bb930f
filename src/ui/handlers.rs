use super::{Command, ViewState, commands::HELP};
use chrono::Local;
use treecopy::core::{ClipboardSink, FolderPicker, Intent, Notification, Session};

/* =============================== UI Actions =============================== */

pub fn on_command<C: ClipboardSink, P: FolderPicker>(
    session: &mut Session<C>,
    view: &mut ViewState,
    picker: &mut P,
    cmd: Command,
) {
    let notes = match cmd {
        Command::Show => {
            render_tree(session, view);
            return;
        }
        Command::Help => {
            println!("{HELP}");
            return;
        }
        Command::Quit => {
            view.quit = true;
            return;
        }
        Command::Unknown(line) => {
            println!("Unknown command: {line:?} (type ? for help)");
            return;
        }
        Command::History => {
            render_history(session);
            return;
        }
        Command::Collapse(idx) => {
            if view.toggle_collapsed(idx) {
                render_tree(session, view);
            } else {
                println!("Row {idx} is not a folder.");
            }
            return;
        }
        Command::Toggle(indices) => on_toggle_rows(session, view, &indices),
        Command::SelectAll => session.apply(Intent::SelectAll),
        Command::DeselectAll => session.apply(Intent::DeselectAll),
        Command::Slot(i) => session.apply(Intent::SelectHistorySlot(i)),
        Command::Rename(index, name) => session.apply(Intent::RenameHistorySlot { index, name }),
        Command::Remove(i) => {
            if let Some(slot) = session.history().get(i) {
                println!("Removing: {}", slot.display_name());
            }
            session.apply(Intent::RemoveHistorySlot(i))
        }
        Command::OpenNew(path) => {
            let Some(folder) = path.or_else(|| picker.pick_folder()) else {
                return;
            };
            session.apply(Intent::OpenNewFolderIntoSlot(folder))
        }
        Command::MapStructure => session.apply(Intent::MapStructure),
        Command::Export { then_quit } => {
            let notes = session.apply(Intent::Confirm);
            if then_quit {
                view.quit = true;
            }
            notes
        }
    };
    show_notifications(session, view, &notes);
}

fn on_toggle_rows<C: ClipboardSink>(
    session: &mut Session<C>,
    view: &ViewState,
    indices: &[usize],
) -> Vec<Notification> {
    let mut notes = Vec::new();
    for &idx in indices {
        let Some(row) = view.rows.get(idx) else {
            notes.push(Notification::Warning(format!("No row {idx}.")));
            continue;
        };
        let path = row.path.clone();
        let value = !row.checked;
        let intent = if row.is_dir {
            Intent::ToggleFolder { path, value }
        } else {
            Intent::ToggleFile { path, value }
        };
        notes.extend(session.apply(intent));
    }
    notes
}

pub fn show_notifications<C: ClipboardSink>(
    session: &Session<C>,
    view: &mut ViewState,
    notes: &[Notification],
) {
    let mut redraw = false;
    for n in notes {
        match n {
            Notification::FolderChanged(Some(p)) => {
                view.collapsed.clear();
                println!("Opened {}", p.display());
                redraw = true;
            }
            Notification::FolderChanged(None) => {
                view.collapsed.clear();
                println!("No folder open. Use `o` to open one.");
                redraw = true;
            }
            Notification::SelectionChanged(_) => redraw = true,
            Notification::HistoryChanged => render_history(session),
            Notification::ExportSucceeded(msg) => {
                println!("[{}] {msg}", Local::now().format("%H:%M:%S"));
            }
            Notification::ExportFailed(msg) => println!("Error: {msg}"),
            Notification::Warning(msg) => println!("Warning: {msg}"),
        }
    }
    if redraw {
        render_tree(session, view);
    }
}

pub fn render_tree<C: ClipboardSink>(session: &Session<C>, view: &mut ViewState) {
    view.rebuild_rows(session.selection());
    let Some(model) = session.selection() else {
        println!("No folder open.");
        return;
    };
    let width = view.rows.len().to_string().len();
    for (i, row) in view.rows.iter().enumerate() {
        let mark = match (row.checked, row.partial) {
            (true, _) => "[x]",
            (false, true) => "[~]",
            (false, false) => "[ ]",
        };
        let indent = "  ".repeat(row.level);
        let suffix = match (row.is_dir, row.collapsed) {
            (true, true) => "/ (+)",
            (true, false) => "/",
            _ => "",
        };
        println!("{i:>width$} {mark} {indent}{}{suffix}", row.name);
    }
    println!(
        "{} of {} files selected",
        model.selected_count(),
        model.file_count()
    );
}

pub fn render_history<C: ClipboardSink>(session: &Session<C>) {
    let history = session.history();
    if history.is_empty() {
        println!("History is empty.");
        return;
    }
    println!("History ({}/{}):", history.len(), history.capacity());
    for (i, slot) in history.slots().iter().enumerate() {
        let current = session
            .current_folder()
            .is_some_and(|p| treecopy::core::same_folder(&p.to_string_lossy(), &slot.path));
        println!(
            "{} {i:>2}. {:<30} {} ({} files, {})",
            if current { "*" } else { " " },
            slot.display_name(),
            slot.path,
            slot.selected.len(),
            if slot.saved_at.is_empty() {
                "never saved"
            } else {
                slot.saved_at.as_str()
            }
        );
    }
}
