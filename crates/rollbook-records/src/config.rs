//! App configuration file (`config.toml` in the data directory).
//!
//! Holds the settings that are not roster records, currently the
//! neighborhood map image. Absent file means defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Map image settings for the plots view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub image_alt: String,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub map: MapConfig,
}

/// Errors from reading or writing the config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access {path}: {message}")]
    Io { path: String, message: String },

    #[error("invalid toml at {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(String),
}

/// Load the config file; an absent file yields defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let raw = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Write the config file, creating parent directories as needed.
pub fn save_config(path: impl AsRef<Path>, config: &AppConfig) -> Result<(), ConfigError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
            path: parent.display().to_string(),
            message: e.to_string(),
        })?;
    }
    let raw = toml::to_string_pretty(config).map_err(|e| ConfigError::Serialize(e.to_string()))?;
    fs::write(path, raw).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(prefix: &str) -> std::path::PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "rollbook-config-{prefix}-{}-{unique}.toml",
            std::process::id()
        ))
    }

    #[test]
    fn absent_config_loads_defaults() {
        let config = load_config(temp_path("absent")).expect("defaults should load");
        assert_eq!(config, AppConfig::default());
        assert!(config.map.image_url.is_empty());
    }

    #[test]
    fn config_round_trips_through_toml() {
        let path = temp_path("round-trip");
        let config = AppConfig {
            map: MapConfig {
                image_url: "https://example.org/map.png".to_string(),
                image_alt: "Neighborhood map".to_string(),
            },
        };
        save_config(&path, &config).expect("config should save");
        let loaded = load_config(&path).expect("config should load");
        assert_eq!(loaded, config);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn invalid_toml_reports_path() {
        let path = temp_path("invalid");
        fs::write(&path, "map = \"not a table\"").expect("fixture should write");
        let err = load_config(&path).expect_err("invalid toml should error");
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("invalid toml at"));

        let _ = fs::remove_file(path);
    }
}
