//! Configuration record for ssstatus.
//!
//! The config file is a small TOML document of integer keys:
//!
//! ```toml
//! max_length=80
//! current_line=1
//! total_lines=1
//! ```
//!
//! Values are read one key at a time so that a single bad entry only falls
//! back to that key's default, even when that entry makes the file invalid
//! TOML. Writes go through `toml_edit` and keep any unrelated content in the
//! file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use toml_edit::{DocumentMut, value};

/// Integer keys stored in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    MaxLength,
    CurrentLine,
    TotalLines,
}

impl ConfigKey {
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::MaxLength,
            ConfigKey::CurrentLine,
            ConfigKey::TotalLines,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            ConfigKey::MaxLength => "max_length",
            ConfigKey::CurrentLine => "current_line",
            ConfigKey::TotalLines => "total_lines",
        }
    }

    /// Value substituted when the key is missing or unparsable.
    pub fn default_value(self) -> i64 {
        match self {
            ConfigKey::MaxLength => MaxLength::DEFAULT as i64,
            ConfigKey::CurrentLine | ConfigKey::TotalLines => 1,
        }
    }
}

impl std::fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of looking up one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    Int(i64),
    /// Present but not an integer; holds the raw text for diagnostics.
    Invalid(String),
    Missing,
}

/// Maximum status line width, always within `[MIN, MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MaxLength(usize);

impl MaxLength {
    pub const MIN: usize = 1;
    pub const MAX: usize = 10_000;
    pub const DEFAULT: usize = 80;

    pub fn clamped(requested: i64) -> Self {
        let clamped = crate::scroll::clamp(requested, Self::MIN as i64, Self::MAX as i64);
        Self(clamped as usize)
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for MaxLength {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Contents written by `setup`.
pub fn default_config_text() -> String {
    ConfigKey::all()
        .iter()
        .map(|key| format!("{}={}\n", key.name(), key.default_value()))
        .collect()
}

/// Parsed config text.
///
/// Valid TOML is edited through `toml_edit`. Anything else (typically an
/// unquoted bad value such as `max_length=abc`) is read line by line as
/// `key=value`, so one broken entry does not hide the others.
#[derive(Debug, Clone)]
pub enum ConfigDocument {
    Toml(DocumentMut),
    Lines(String),
}

impl ConfigDocument {
    pub fn parse(text: &str) -> Self {
        match text.parse::<DocumentMut>() {
            Ok(doc) => ConfigDocument::Toml(doc),
            Err(err) => {
                tracing::debug!("config is not valid TOML, reading it line by line: {err}");
                ConfigDocument::Lines(text.to_string())
            }
        }
    }

    /// Looks up a single key.
    pub fn lookup(&self, key: ConfigKey) -> ConfigValue {
        match self {
            ConfigDocument::Toml(doc) => lookup_toml(doc, key),
            ConfigDocument::Lines(text) => lookup_line(text, key),
        }
    }

    /// Sets the given keys, preserving everything else, and renders the text.
    pub fn apply_updates(self, updates: &[(ConfigKey, i64)]) -> String {
        match self {
            ConfigDocument::Toml(mut doc) => {
                for (key, n) in updates {
                    doc[key.name()] = value(*n);
                }
                doc.to_string()
            }
            ConfigDocument::Lines(text) => update_lines(&text, updates),
        }
    }
}

fn lookup_toml(doc: &DocumentMut, key: ConfigKey) -> ConfigValue {
    let Some(item) = doc.get(key.name()) else {
        return ConfigValue::Missing;
    };

    match item.as_integer() {
        Some(n) => ConfigValue::Int(n),
        None => match item.as_str() {
            // Quoted numbers are accepted: hand-written configs are untyped text.
            Some(s) => parse_int(s),
            None => ConfigValue::Invalid(item.to_string().trim().to_string()),
        },
    }
}

fn lookup_line(text: &str, key: ConfigKey) -> ConfigValue {
    let Some(raw) = text.lines().find_map(|line| line_value(line, key)) else {
        return ConfigValue::Missing;
    };
    // Only the first token counts, as in `max_length=80 # comment`.
    parse_int(raw.split_whitespace().next().unwrap_or_default())
}

/// Returns the text after `=` if `line` assigns `key`.
fn line_value(line: &str, key: ConfigKey) -> Option<&str> {
    let (name, raw) = line.split_once('=')?;
    (name.trim() == key.name()).then_some(raw)
}

fn parse_int(raw: &str) -> ConfigValue {
    raw.trim()
        .parse::<i64>()
        .map_or_else(|_| ConfigValue::Invalid(raw.to_string()), ConfigValue::Int)
}

fn update_lines(text: &str, updates: &[(ConfigKey, i64)]) -> String {
    let mut pending: Vec<(ConfigKey, i64)> = updates.to_vec();
    let mut out = String::with_capacity(text.len());

    for line in text.lines() {
        let updated = pending
            .iter()
            .position(|(key, _)| line_value(line, *key).is_some())
            .map(|index| pending.remove(index));
        match updated {
            Some((key, n)) => out.push_str(&format!("{}={n}", key.name())),
            None => out.push_str(line),
        }
        out.push('\n');
    }

    for (key, n) in pending {
        out.push_str(&format!("{}={n}\n", key.name()));
    }
    out
}

/// Applies integer updates to config text, preserving everything else.
pub fn apply_updates(text: &str, updates: &[(ConfigKey, i64)]) -> String {
    ConfigDocument::parse(text).apply_updates(updates)
}

/// Writes a file via a temporary sibling and rename.
pub(crate) fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, content)
        .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| {
        format!(
            "Failed to rename {} to {}",
            tmp_path.display(),
            path.display()
        )
    })?;

    Ok(())
}

pub mod paths {
    //! Path resolution for the ssstatus home directory.
    //!
    //! SSSTATUS_HOME resolution order:
    //! 1. SSSTATUS_HOME environment variable (if set)
    //! 2. ~/.config/ssstatus (default)

    use std::path::PathBuf;

    use anyhow::{Context, Result};

    /// Returns the ssstatus home directory.
    ///
    /// # Errors
    /// Returns an error if no home directory can be determined.
    pub fn ssstatus_home() -> Result<PathBuf> {
        if let Ok(home) = std::env::var("SSSTATUS_HOME") {
            return Ok(PathBuf::from(home));
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("ssstatus"))
            .context("Could not determine home directory")
    }

    /// Files kept in the home directory.
    #[derive(Debug, Clone)]
    pub struct Paths {
        pub home: PathBuf,
    }

    impl Paths {
        pub fn new(home: impl Into<PathBuf>) -> Self {
            Self { home: home.into() }
        }

        /// Resolves paths from the environment.
        pub fn resolve() -> Result<Self> {
            ssstatus_home().map(Self::new)
        }

        pub fn config(&self) -> PathBuf {
            self.home.join("config")
        }

        pub fn status(&self) -> PathBuf {
            self.home.join("status")
        }

        pub fn log(&self) -> PathBuf {
            self.home.join("log")
        }

        pub fn lock(&self) -> PathBuf {
            self.home.join("lock")
        }
    }
}
