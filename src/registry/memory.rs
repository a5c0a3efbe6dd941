//! In-memory registry backend
//!
//! Stands in for the live registry in tests and benchmarks. Key and value
//! names are case-insensitive, as in the real registry.

use crate::error::{Result, ShelfError, StringError};
use crate::registry::path::RegistryPath;
use crate::registry::probe::RegistryBackend;
use std::collections::{BTreeMap, BTreeSet};

/// Registry contents held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    keys: BTreeMap<String, BTreeMap<String, String>>,
    denied: BTreeSet<String>,
}

fn canonical(path: &str) -> String {
    RegistryPath::parse(path)
        .map_or_else(|| path.to_string(), |key| key.to_string())
        .to_lowercase()
}

impl MemoryRegistry {
    /// Add an empty key
    #[must_use]
    pub fn with_key(mut self, path: &str) -> Self {
        self.keys.entry(canonical(path)).or_default();
        self
    }

    /// Add a string value, creating its key
    #[must_use]
    pub fn with_value(mut self, path: &str, name: &str, value: &str) -> Self {
        self.keys
            .entry(canonical(path))
            .or_default()
            .insert(name.to_lowercase(), value.to_string());
        self
    }

    /// Make every query for this key (and below it) fail with access denied
    #[must_use]
    pub fn denying(mut self, path: &str) -> Self {
        self.denied.insert(canonical(path));
        self
    }

    fn check_access(&self, key: &str) -> Result<()> {
        let denied = self
            .denied
            .iter()
            .any(|prefix| key == prefix || key.starts_with(&format!("{prefix}\\")));
        if denied {
            return Err(ShelfError::RegistryError(StringError::new(format!(
                "access denied: {key}"
            ))));
        }
        Ok(())
    }
}

impl RegistryBackend for MemoryRegistry {
    fn key_exists(&self, key: &RegistryPath) -> Result<bool> {
        let wanted = key.to_string().to_lowercase();
        self.check_access(&wanted)?;
        let parent_prefix = format!("{}\\", wanted.trim_end_matches('\\'));
        Ok(self
            .keys
            .keys()
            .any(|stored| *stored == wanted || stored.starts_with(&parent_prefix)))
    }

    fn read_value(&self, key: &RegistryPath, name: &str) -> Result<Option<String>> {
        let wanted = key.to_string().to_lowercase();
        self.check_access(&wanted)?;
        Ok(self
            .keys
            .get(&wanted)
            .and_then(|values| values.get(&name.to_lowercase()))
            .cloned())
    }
}
