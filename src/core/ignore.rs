use std::{fs, path::Path};

use tracing::{debug, warn};

/// Built-in patterns. A leading `*` means "ends with", anything else is a
/// plain substring test.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    ".git",
    "node_modules",
    "__pycache__",
    ".DS_Store",
    ".vscode",
    "*.pyc",
    "*.pyo",
    "*.exe",
    "*.dll",
    "*.so",
    "*.dylib",
    "*.log",
    "*.db",
    "*.tmp",
    "*.swp",
    "*.swo",
    "*.bak",
    ".idea",
    "*.class",
    "*.jar",
    "*.war",
    "*.zip",
    "*.tar",
    "*.gz",
    "*.7z",
    "*.rar",
    "dist",
    "build",
    "*.egg-info",
    "env",
    ".env",
    "venv",
    ".coverage",
    ".pytest_cache",
    ".mypy_cache",
    "coverage.xml",
    ".gradle",
    ".next",
    ".nuxt",
    ".yarn",
    "yarn.lock",
    "package-lock.json",
    "*.lock",
    "Thumbs.db",
    ".sass-cache",
    ".cache",
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Rule {
    Suffix(String),
    Contains(String),
}

impl Rule {
    fn parse(pattern: &str) -> Self {
        match pattern.strip_prefix('*') {
            Some(suffix) => Self::Suffix(suffix.to_string()),
            None => Self::Contains(pattern.to_string()),
        }
    }

    fn matches(&self, path: &str) -> bool {
        match self {
            Self::Suffix(s) => path.ends_with(s.as_str()),
            Self::Contains(s) => path.contains(s.as_str()),
        }
    }

    /// Patterns with a `/` name folders, so they may reach above the root.
    fn spans_folders(&self) -> bool {
        match self {
            Self::Suffix(s) | Self::Contains(s) => s.contains('/'),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IgnoreMatcher {
    patterns: Vec<String>,
    rules: Vec<Rule>,
}

impl Default for IgnoreMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORE_PATTERNS.iter().map(|s| (*s).to_string()))
    }
}

impl IgnoreMatcher {
    pub fn new<I>(patterns: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut m = Self {
            patterns: Vec::new(),
            rules: Vec::new(),
        };
        m.extend(patterns);
        m
    }

    /// A matcher that never ignores anything.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// Built-in defaults followed by the patterns of `extra_file`, if it holds a
    /// JSON array of strings. A missing or malformed file leaves the defaults.
    #[must_use]
    pub fn with_extra_file(extra_file: &Path) -> Self {
        let mut m = Self::default();
        if let Some(extra) = load_extra_patterns(extra_file) {
            debug!(count = extra.len(), file = %extra_file.display(), "extra ignore patterns");
            m.extend(extra);
        }
        m
    }

    /// Appends patterns not already present, keeping list order.
    pub fn extend<I>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = String>,
    {
        for p in patterns {
            if p.is_empty() || self.patterns.contains(&p) {
                continue;
            }
            self.rules.push(Rule::parse(&p));
            self.patterns.push(p);
        }
    }

    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    #[must_use]
    pub fn should_ignore(&self, path: &str) -> bool {
        self.rules.iter().any(|r| r.matches(path))
    }

    /// Decides for one scanned entry. Every pattern sees the root-relative
    /// path; patterns containing a `/` are also tried on the absolute path, so
    /// `myproj/secret` or a full path still excludes its subtree.
    #[must_use]
    pub fn should_ignore_entry(&self, rel: &str, abs: &str) -> bool {
        self.rules
            .iter()
            .any(|r| r.matches(rel) || (r.spans_folders() && r.matches(abs)))
    }

    /// The first pattern that matches `path`, in list order.
    #[must_use]
    pub fn matching_pattern(&self, path: &str) -> Option<&str> {
        self.rules
            .iter()
            .position(|r| r.matches(path))
            .map(|i| self.patterns[i].as_str())
    }
}

#[must_use]
pub fn load_extra_patterns(path: &Path) -> Option<Vec<String>> {
    let data = fs::read(path).ok()?;
    match serde_json::from_slice::<Vec<String>>(&data) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(file = %path.display(), error = %e, "ignoring malformed ignore-pattern file");
            None
        }
    }
}
