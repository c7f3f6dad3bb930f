use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Toggle(Vec<usize>),
    Collapse(usize),
    SelectAll,
    DeselectAll,
    History,
    Slot(usize),
    Rename(usize, String),
    Remove(usize),
    OpenNew(Option<PathBuf>),
    MapStructure,
    Export { then_quit: bool },
    Help,
    Quit,
    Unknown(String),
}

pub const HELP: &str = "\
  <enter> | l       show the tree
  t N [N ...]       toggle rows (folders cascade)
  c N               collapse / expand a folder row
  a | n             select all / deselect all
  h                 list history slots
  s N               open history slot N
  r N NAME          rename history slot N (not slot 0)
  d N               remove history slot N
  o [PATH]          open a new folder (dialog when no PATH)
  m                 copy the folder tree to the clipboard
  y | yq            export and copy (yq: then quit)
  q                 quit";

fn index(arg: &str) -> Option<usize> {
    arg.trim().parse().ok()
}

#[must_use]
pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (head, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(h, r)| (h, r.trim()));

    match head {
        "" | "l" => Command::Show,
        "t" => {
            let rows: Option<Vec<usize>> =
                rest.split_whitespace().map(|s| s.parse().ok()).collect();
            match rows {
                Some(r) if !r.is_empty() => Command::Toggle(r),
                _ => Command::Unknown(line.to_string()),
            }
        }
        "c" => index(rest).map_or_else(|| Command::Unknown(line.to_string()), Command::Collapse),
        "a" => Command::SelectAll,
        "n" => Command::DeselectAll,
        "h" => Command::History,
        "s" => index(rest).map_or_else(|| Command::Unknown(line.to_string()), Command::Slot),
        "d" => index(rest).map_or_else(|| Command::Unknown(line.to_string()), Command::Remove),
        "r" => {
            let (idx, name) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            match index(idx) {
                Some(i) if !name.trim().is_empty() => Command::Rename(i, name.trim().to_string()),
                _ => Command::Unknown(line.to_string()),
            }
        }
        "o" => Command::OpenNew((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "m" => Command::MapStructure,
        "y" => Command::Export { then_quit: false },
        "yq" => Command::Export { then_quit: true },
        "?" | "help" => Command::Help,
        "q" | "quit" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}
