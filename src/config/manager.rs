//! Persistence of [`AppConfig`]
//!
//! The file lives in the shared data folder next to the logs. A missing or
//! unparsable file is never fatal: the shelf starts with defaults.

use crate::config::models::AppConfig;
use crate::error::Result;
use crate::utils::{data_dir, write_atomic};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// File name inside [`data_dir`]
const CONFIG_FILE_NAME: &str = "config.json";

/// Configuration manager
pub struct ConfigManager;

impl ConfigManager {
    /// `%APPDATA%\PortableShelf\config.json`
    pub fn get_config_path() -> PathBuf {
        data_dir().join(CONFIG_FILE_NAME)
    }

    /// Create the data folder if needed and return it
    pub fn ensure_config_dir() -> Result<PathBuf> {
        let dir = data_dir();
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Load the saved settings, or defaults when there are none usable
    pub fn load() -> Result<AppConfig> {
        let path = Self::get_config_path();
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No configuration at {}, using defaults", path.display());
                return Ok(AppConfig::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config = serde_json::from_str(text.trim_start_matches('\u{feff}')).unwrap_or_else(|e| {
            warn!("Ignoring unparsable {}: {e}", path.display());
            AppConfig::default()
        });
        info!("Configuration read from {}", path.display());
        Ok(config)
    }

    /// Persist the settings, replacing the previous file atomically
    pub fn save(config: &AppConfig) -> Result<()> {
        let path = Self::ensure_config_dir()?.join(CONFIG_FILE_NAME);
        write_atomic(&path, serde_json::to_string_pretty(config)?.as_bytes())?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Filter;
    use crate::test_utils::{AppdataGuard, create_test_dir};

    #[test]
    fn test_config_path() {
        let path = ConfigManager::get_config_path();
        assert!(path.to_string_lossy().contains("PortableShelf"));
        assert!(path.to_string_lossy().ends_with("config.json"));
    }

    #[test]
    fn test_load_missing_config() {
        let dir = create_test_dir();
        let _guard = AppdataGuard::new(&dir);
        assert_eq!(ConfigManager::load().unwrap(), AppConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = create_test_dir();
        let _guard = AppdataGuard::new(&dir);

        let config = AppConfig {
            portable_root: Some(PathBuf::from("D:\\Portable")),
            default_filter: Filter::PortableNotUsed,
            ..AppConfig::default()
        };
        ConfigManager::save(&config).unwrap();
        let files = std::fs::read_dir(dir.path().join("PortableShelf")).unwrap().count();
        assert_eq!(files, 1);
        assert_eq!(ConfigManager::load().unwrap(), config);
    }

    #[test]
    fn test_config_with_bom_and_unknown_fields() {
        let dir = create_test_dir();
        let _guard = AppdataGuard::new(&dir);
        ConfigManager::ensure_config_dir().unwrap();
        std::fs::write(
            ConfigManager::get_config_path(),
            "\u{feff}{\"force_registry_fallback\":true,\"window\":{}}",
        )
        .unwrap();
        assert!(ConfigManager::load().unwrap().force_registry_fallback);
    }

    #[test]
    fn test_corrupt_config_falls_back_to_defaults() {
        let dir = create_test_dir();
        let _guard = AppdataGuard::new(&dir);
        ConfigManager::ensure_config_dir().unwrap();
        std::fs::write(ConfigManager::get_config_path(), "{not json").unwrap();
        assert_eq!(ConfigManager::load().unwrap(), AppConfig::default());
    }
}
