//! Registry probe with a pluggable fallback strategy
//!
//! Registry presence is speculative: a missing key, a denied read and a
//! malformed path all answer `false`/`None` and are only logged.

use crate::error::{Result, ShelfError};
use crate::registry::path::{Hive, RegistryPath};
use tracing::debug;

/// A way of reading the registry
pub trait RegistryBackend {
    /// Whether the key can be opened
    fn key_exists(&self, key: &RegistryPath) -> Result<bool>;

    /// Named value coerced to a string, `None` if key or value is absent
    ///
    /// An empty `name` addresses the key's default value.
    fn read_value(&self, key: &RegistryPath, name: &str) -> Result<Option<String>>;
}

/// Backend for hosts without a registry
#[cfg_attr(windows, allow(dead_code))]
struct Unavailable;

impl RegistryBackend for Unavailable {
    fn key_exists(&self, _key: &RegistryPath) -> Result<bool> {
        Err(ShelfError::Unsupported("Registry access"))
    }

    fn read_value(&self, _key: &RegistryPath, _name: &str) -> Result<Option<String>> {
        Err(ShelfError::Unsupported("Registry access"))
    }
}

/// Answers existence and value queries against the registry
///
/// Queries go to the structured backend, except `HKU` paths (per-SID
/// subtrees are commonly unmounted there) and everything when
/// `force_fallback` is set, which go to the fallback backend.
pub struct RegistryProbe {
    structured: Box<dyn RegistryBackend>,
    fallback: Box<dyn RegistryBackend>,
    force_fallback: bool,
}

impl RegistryProbe {
    /// Create a probe from a structured backend and a fallback backend
    pub fn new(structured: Box<dyn RegistryBackend>, fallback: Box<dyn RegistryBackend>) -> Self {
        Self {
            structured,
            fallback,
            force_fallback: false,
        }
    }

    /// Route every query through the fallback backend
    #[must_use]
    pub fn with_force_fallback(mut self, force_fallback: bool) -> Self {
        self.force_fallback = force_fallback;
        self
    }

    /// Probe backed by the live registry
    ///
    /// Uses `winreg` with a `reg.exe` fallback on Windows. Other hosts have
    /// no registry; every query answers `false`/`None`.
    pub fn system() -> Self {
        #[cfg(windows)]
        {
            use crate::registry::{RegQueryBackend, WinRegBackend};
            Self::new(Box::new(WinRegBackend), Box::new(RegQueryBackend::default()))
        }

        #[cfg(not(windows))]
        {
            Self::new(Box::new(Unavailable), Box::new(Unavailable))
        }
    }

    fn backend_for(&self, key: &RegistryPath) -> &dyn RegistryBackend {
        if self.force_fallback || key.hive == Hive::Users {
            self.fallback.as_ref()
        } else {
            self.structured.as_ref()
        }
    }

    /// Existence check at three levels of detail
    ///
    /// - `name` omitted: the key is reachable
    /// - `name` given, `value` omitted: the named value exists
    /// - both given: the named value equals `value` as a string
    pub fn exists(&self, path: &str, name: Option<&str>, value: Option<&str>) -> bool {
        let Some(key) = RegistryPath::parse(path) else {
            debug!("Not a registry path: {path}");
            return false;
        };
        let backend = self.backend_for(&key);

        let Some(name) = name else {
            return backend.key_exists(&key).unwrap_or_else(|e| {
                debug!("Registry key check failed for {key}: {e}");
                false
            });
        };

        match backend.read_value(&key, name) {
            Ok(Some(actual)) => value.is_none_or(|expected| actual == expected),
            Ok(None) => false,
            Err(e) => {
                debug!("Registry value check failed for {key} [{name}]: {e}");
                false
            }
        }
    }

    /// Read a named value as a string
    pub fn read_value(&self, path: &str, name: &str) -> Option<String> {
        let Some(key) = RegistryPath::parse(path) else {
            debug!("Not a registry path: {path}");
            return None;
        };
        self.backend_for(&key)
            .read_value(&key, name)
            .unwrap_or_else(|e| {
                debug!("Registry read failed for {key} [{name}]: {e}");
                None
            })
    }
}
