use std::{fs, path::Path, path::PathBuf};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

const DATABASE_VAR: &str = "EVENT_BOOKING_DATABASE";
const SEED_VAR: &str = "EVENT_BOOKING_SEED";
const MEMORY: &str = ":memory:";

static DATA_ROOT: Lazy<PathBuf> = Lazy::new(|| {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("event-booking")
});

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    // `:memory:` keeps everything in memory
    pub database_path: Option<PathBuf>,
    pub seed_featured: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            seed_featured: true,
        }
    }
}

impl AppConfig {
    pub fn load() -> Self {
        let path = DATA_ROOT.join("config.json");
        let config = match read_config(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("ignoring unreadable config {:?}: {err}", path);
                AppConfig::default()
            }
        };
        config.with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides<F>(mut self, var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = var(DATABASE_VAR).filter(|v| !v.trim().is_empty()) {
            self.database_path = Some(PathBuf::from(path.trim()));
        }
        if let Some(seed) = var(SEED_VAR) {
            match seed.trim().parse::<bool>() {
                Ok(seed) => self.seed_featured = seed,
                Err(_) => tracing::warn!("ignoring {SEED_VAR}={seed:?}, expected true or false"),
            }
        }
        self
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| DATA_ROOT.join("event-booking.sqlite"))
    }

    pub(crate) fn prepare_database_dir(&self) -> PathBuf {
        let path = self.database_path();
        if path == Path::new(MEMORY) {
            return path;
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(err) = fs::create_dir_all(parent) {
                tracing::warn!("failed to create database directory {:?}: {err}", parent);
            }
        }
        path
    }
}

fn read_config(path: &Path) -> Result<AppConfig, String> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = fs::read_to_string(path).map_err(|err| err.to_string())?;
    serde_json::from_str(&contents).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn env_overrides_file_values() {
        let config = AppConfig::default().with_overrides(overrides(&[
            (DATABASE_VAR, " :memory: "),
            (SEED_VAR, "false"),
        ]));
        assert_eq!(config.database_path(), PathBuf::from(":memory:"));
        assert!(!config.seed_featured);
    }

    #[test]
    fn bad_values_are_ignored() {
        let config = AppConfig::default().with_overrides(overrides(&[
            (DATABASE_VAR, "   "),
            (SEED_VAR, "maybe"),
        ]));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.database_path(), DATA_ROOT.join("event-booking.sqlite"));
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"database_path": "/tmp/x.sqlite"}"#).unwrap();
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/x.sqlite")));
        assert!(config.seed_featured);
    }

    #[test]
    fn database_dir_is_created_before_opening() {
        let root = std::env::temp_dir().join(format!("event-booking-config-{}", std::process::id()));
        let target = root.join("nested").join("events.sqlite");
        let config = AppConfig {
            database_path: Some(target.clone()),
            ..AppConfig::default()
        };

        assert_eq!(config.prepare_database_dir(), target);
        assert!(root.join("nested").is_dir());
        assert!(!target.exists());
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn in_memory_database_needs_no_dir() {
        let config = AppConfig {
            database_path: Some(PathBuf::from(MEMORY)),
            ..AppConfig::default()
        };
        assert_eq!(config.prepare_database_dir(), PathBuf::from(MEMORY));
        assert!(!Path::new(MEMORY).exists());
    }
}
