//! Location store
//!
//! Persists the name→address map and the API credential as one JSON
//! document at ~/.config/waze-home/config.json. Absence of the file is not
//! an error: built-in defaults apply, overridable through environment
//! variables.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default home address
pub const DEFAULT_HOME: &str = "91 Abbett St, Scarborough WA 6019";

/// Default work address
pub const DEFAULT_WORK: &str = "11 Mount St, Perth WA 6000";

const CONFIG_FILE: &str = "config.json";

/// The persisted configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Named locations and their street addresses
    #[serde(default)]
    pub locations: BTreeMap<String, String>,

    /// API credential, unused by the public endpoints but kept with the
    /// rest of the configuration
    #[serde(default)]
    pub waze_api_key: String,
}

/// Store for named locations, constructed with an explicit directory so
/// tests can point it at a temp dir.
pub struct LocationStore {
    config_dir: PathBuf,
}

impl LocationStore {
    pub fn new(config_dir: &Path) -> Self {
        Self {
            config_dir: config_dir.to_path_buf(),
        }
    }

    /// The per-user config directory (~/.config/waze-home).
    pub fn default_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("waze-home")
    }

    fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    /// Load the configuration document. When the file is absent the
    /// defaults apply, with environment overrides.
    pub fn load(&self) -> Result<Config> {
        let path = self.config_path();

        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            return serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config from {}", path.display()));
        }

        let mut locations = BTreeMap::new();
        locations.insert(
            "home".to_string(),
            env::var("WAZE_HOME_LOCATION").unwrap_or_else(|_| DEFAULT_HOME.to_string()),
        );
        locations.insert(
            "work".to_string(),
            env::var("WAZE_WORK_LOCATION").unwrap_or_else(|_| DEFAULT_WORK.to_string()),
        );

        Ok(Config {
            locations,
            waze_api_key: env::var("WAZE_API_KEY").unwrap_or_default(),
        })
    }

    /// Persist the whole configuration document.
    pub fn save(&self, config: &Config) -> Result<()> {
        fs::create_dir_all(&self.config_dir).with_context(|| {
            format!(
                "Failed to create config directory: {}",
                self.config_dir.display()
            )
        })?;

        let path = self.config_path();
        let content =
            serde_json::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// Look up a named location. Unset names fall back to the built-in
    /// defaults for "home" and "work"; anything else is `None`.
    pub fn get_location(&self, name: &str) -> Result<Option<String>> {
        let config = self.load()?;

        if let Some(address) = config.locations.get(name) {
            if !address.is_empty() {
                return Ok(Some(address.clone()));
            }
        }

        Ok(match name {
            "home" => Some(DEFAULT_HOME.to_string()),
            "work" => Some(DEFAULT_WORK.to_string()),
            _ => None,
        })
    }

    /// Set a named location and persist the document.
    pub fn set_location(&self, name: &str, address: &str) -> Result<()> {
        let mut config = self.load()?;
        config
            .locations
            .insert(name.to_string(), address.to_string());
        self.save(&config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::tempdir;

    // load() reads process-global env vars when the file is absent, so
    // tests touching them serialize here
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults_when_no_file() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::remove_var("WAZE_HOME_LOCATION");
        env::remove_var("WAZE_WORK_LOCATION");

        let dir = tempdir().unwrap();
        let store = LocationStore::new(dir.path());

        assert_eq!(
            store.get_location("home").unwrap().as_deref(),
            Some(DEFAULT_HOME)
        );
        assert_eq!(
            store.get_location("work").unwrap().as_deref(),
            Some(DEFAULT_WORK)
        );
        assert_eq!(store.get_location("gym").unwrap(), None);
    }

    #[test]
    fn test_env_overrides_when_no_file() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var("WAZE_HOME_LOCATION", "1 Test St");
        env::set_var("WAZE_API_KEY", "secret");

        let dir = tempdir().unwrap();
        let store = LocationStore::new(dir.path());

        let config = store.load().unwrap();
        assert_eq!(config.locations["home"], "1 Test St");
        assert_eq!(config.waze_api_key, "secret");

        env::remove_var("WAZE_HOME_LOCATION");
        env::remove_var("WAZE_API_KEY");
    }

    #[test]
    fn test_set_and_get_round_trip() {
        let _guard = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let store = LocationStore::new(dir.path());

        store.set_location("gym", "5 Fitness Ave, Perth").unwrap();
        assert_eq!(
            store.get_location("gym").unwrap().as_deref(),
            Some("5 Fitness Ave, Perth")
        );

        // The document persisted as JSON on disk
        let raw = fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap();
        let config: Config = serde_json::from_str(&raw).unwrap();
        assert_eq!(config.locations["gym"], "5 Fitness Ave, Perth");
    }

    #[test]
    fn test_set_overwrites_existing_location() {
        let _guard = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let store = LocationStore::new(dir.path());

        store.set_location("home", "2 New Home Rd").unwrap();
        store.set_location("home", "3 Newer Home Rd").unwrap();
        assert_eq!(
            store.get_location("home").unwrap().as_deref(),
            Some("3 Newer Home Rd")
        );
    }

    #[test]
    fn test_empty_address_falls_back_to_default() {
        let _guard = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let store = LocationStore::new(dir.path());

        store.set_location("home", "").unwrap();
        assert_eq!(
            store.get_location("home").unwrap().as_deref(),
            Some(DEFAULT_HOME)
        );
    }
}
