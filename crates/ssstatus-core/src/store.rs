//! Persistence for the status text and the config record.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::{self, ConfigDocument, ConfigKey, ConfigValue, paths::Paths};

/// Storage the controller reads from and writes to.
///
/// All access to persisted state goes through this trait so the controller
/// can run against [`MemoryStore`] in tests.
pub trait StateStore {
    /// Reads one config key.
    fn config_value(&self, key: ConfigKey) -> Result<ConfigValue>;

    /// Writes the given config keys, leaving the others untouched.
    fn write_config(&mut self, updates: &[(ConfigKey, i64)]) -> Result<()>;

    /// Reads the stored status text. Missing status reads as empty.
    fn read_status(&self) -> Result<String>;

    fn write_status(&mut self, status: &str) -> Result<()>;

    /// Overwrites status and config with their initial contents.
    fn reset(&mut self, status: &str, config_text: &str) -> Result<()>;
}

/// Store backed by the `status` and `config` files in the home directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    paths: Paths,
}

impl FileStore {
    pub fn new(paths: Paths) -> Self {
        Self { paths }
    }

    fn read_config_text(&self) -> Result<String> {
        read_or_empty(&self.paths.config())
    }
}

fn read_or_empty(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(err).with_context(|| format!("Failed to read {}", path.display())),
    }
}

impl StateStore for FileStore {
    fn config_value(&self, key: ConfigKey) -> Result<ConfigValue> {
        let text = self.read_config_text()?;
        Ok(ConfigDocument::parse(&text).lookup(key))
    }

    fn write_config(&mut self, updates: &[(ConfigKey, i64)]) -> Result<()> {
        let text = self.read_config_text()?;
        let updated = config::apply_updates(&text, updates);
        config::write_atomic(&self.paths.config(), &updated)
    }

    fn read_status(&self) -> Result<String> {
        read_or_empty(&self.paths.status())
    }

    fn write_status(&mut self, status: &str) -> Result<()> {
        config::write_atomic(&self.paths.status(), status)
    }

    fn reset(&mut self, status: &str, config_text: &str) -> Result<()> {
        config::write_atomic(&self.paths.status(), status)?;
        config::write_atomic(&self.paths.config(), config_text)
    }
}

/// In-memory store for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<ConfigKey, ConfigValue>,
    status: String,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a raw config value, including invalid ones.
    #[must_use]
    pub fn with_value(mut self, key: ConfigKey, value: ConfigValue) -> Self {
        self.values.insert(key, value);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn status(&self) -> &str {
        &self.status
    }
}

impl StateStore for MemoryStore {
    fn config_value(&self, key: ConfigKey) -> Result<ConfigValue> {
        Ok(self
            .values
            .get(&key)
            .cloned()
            .unwrap_or(ConfigValue::Missing))
    }

    fn write_config(&mut self, updates: &[(ConfigKey, i64)]) -> Result<()> {
        for (key, n) in updates {
            self.values.insert(*key, ConfigValue::Int(*n));
        }
        Ok(())
    }

    fn read_status(&self) -> Result<String> {
        Ok(self.status.clone())
    }

    fn write_status(&mut self, status: &str) -> Result<()> {
        status.clone_into(&mut self.status);
        Ok(())
    }

    fn reset(&mut self, status: &str, config_text: &str) -> Result<()> {
        let doc = ConfigDocument::parse(config_text);
        self.values = ConfigKey::all()
            .iter()
            .map(|key| (*key, doc.lookup(*key)))
            .filter(|(_, value)| *value != ConfigValue::Missing)
            .collect();
        status.clone_into(&mut self.status);
        Ok(())
    }
}
