use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::core::{CoreError, CoreResult, count_tokens, write_atomically};

/// Where a finished bundle goes besides the artifact file.
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> CoreResult<()>;
}

/// Keeps the last copied text in memory. Useful headless and in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
    pub fail_with: Option<String>,
}

impl MemoryClipboard {
    #[must_use]
    pub fn failing(reason: &str) -> Self {
        Self {
            contents: None,
            fail_with: Some(reason.to_string()),
        }
    }
}

impl ClipboardSink for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> CoreResult<()> {
        if let Some(reason) = &self.fail_with {
            return Err(CoreError::Clipboard(reason.clone()));
        }
        self.contents = Some(text.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Bundle {
    pub text: String,
    /// Number of `=== path ===` blocks, one per requested path.
    pub blocks: usize,
    /// Paths that got an error marker instead of their contents.
    pub unreadable: Vec<PathBuf>,
}

impl Bundle {
    #[must_use]
    pub fn stats_line(&self) -> String {
        format!(
            "{} files • {} chars • {} tokens",
            self.blocks,
            self.text.chars().count(),
            count_tokens(&self.text)
        )
    }
}

#[must_use]
pub fn block_header(path: &Path) -> String {
    format!("=== {} ===\n", path.display())
}

/// Reads a file as UTF-8 text. Content with NUL bytes counts as binary.
pub fn read_text_file(path: &Path) -> io::Result<String> {
    let contents = fs::read_to_string(path)?;
    if contents.contains('\0') {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "binary content",
        ));
    }
    Ok(contents)
}

/// Concatenates `paths` in order. A file that cannot be read keeps its header
/// and gets a single `[unreadable: …]` line in place of its contents.
#[must_use]
pub fn render_bundle<P: AsRef<Path>>(paths: &[P]) -> Bundle {
    let mut out = String::new();
    let mut unreadable = Vec::new();

    for p in paths {
        let p = p.as_ref();
        out.push_str(&block_header(p));
        match read_text_file(p) {
            Ok(contents) => out.push_str(&contents),
            Err(e) => {
                debug!(file = %p.display(), error = %e, "unreadable file in export");
                out.push_str(&format!("[unreadable: {e}]"));
                unreadable.push(p.to_path_buf());
            }
        }
        out.push_str("\n\n");
    }

    Bundle {
        text: out,
        blocks: paths.len(),
        unreadable,
    }
}

/// Outcome of [`export_bundle`]. The artifact and clipboard results are kept
/// apart so one failing does not hide the other.
#[derive(Debug)]
pub struct ExportReport {
    pub bundle: Bundle,
    pub artifact: CoreResult<PathBuf>,
    pub clipboard: CoreResult<()>,
}

/// Renders the bundle, writes it to `artifact`, then copies it to `sink`.
pub fn export_bundle<P: AsRef<Path>>(
    paths: &[P],
    artifact: &Path,
    sink: &mut dyn ClipboardSink,
) -> ExportReport {
    let bundle = render_bundle(paths);

    let artifact_res = write_atomically(artifact, bundle.text.as_bytes())
        .map(|()| artifact.to_path_buf())
        .map_err(|e| {
            warn!(file = %artifact.display(), error = %e, "could not write export artifact");
            CoreError::ArtifactWrite(e)
        });

    let clipboard = sink.set_text(&bundle.text);
    if let Err(e) = &clipboard {
        warn!(error = %e, "clipboard copy failed");
    }

    ExportReport {
        bundle,
        artifact: artifact_res,
        clipboard,
    }
}
