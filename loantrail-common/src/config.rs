//! Configuration loading and data folder resolution

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Environment variable overriding the data folder.
pub const ENV_DATA_DIR: &str = "LOANTRAIL_DATA";

/// Filename of the durable lead collection inside the data folder.
pub const LEADS_FILE: &str = "leads.json";

/// Optional TOML config at `<config dir>/loantrail/config.toml`.
/// Missing files and missing fields are never fatal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Data folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. `LOANTRAIL_DATA` environment variable
/// 3. `data_dir` key in the TOML config file
/// 4. OS-dependent default (fallback)
pub fn resolve_data_dir(cli_arg: Option<&Path>) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ENV_DATA_DIR) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(config) = load_toml_config() {
        if let Some(data_dir) = config.data_dir {
            return data_dir;
        }
    }

    default_data_dir()
}

/// Load the TOML config file, tolerating absence and parse failures.
pub fn load_toml_config() -> Option<TomlConfig> {
    let path = config_file_path()?;
    let text = std::fs::read_to_string(&path).ok()?;
    match toml::from_str(&text) {
        Ok(config) => Some(config),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "ignoring unparseable config file");
            None
        }
    }
}

/// Log filter used when `RUST_LOG` is unset: the config file's logging
/// level, or "warn" without a config file so command output stays clean.
pub fn log_filter(config: Option<&TomlConfig>) -> String {
    config
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|| "warn".to_string())
}

fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("loantrail").join("config.toml"))
}

/// OS-dependent default data folder
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("loantrail"))
        .unwrap_or_else(|| PathBuf::from("./loantrail_data"))
}

/// Create the data folder if needed (idempotent).
pub fn ensure_dir_exists(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    Ok(())
}

/// Path of the durable lead collection inside the data folder.
pub fn leads_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LEADS_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leads_path() {
        let dir = PathBuf::from("/tmp/loantrail-root");
        assert_eq!(leads_path(&dir), dir.join("leads.json"));
    }

    #[test]
    fn test_toml_missing_fields_default() {
        let config: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(config.data_dir, None);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_toml_round_trip() {
        let config = TomlConfig {
            data_dir: Some(PathBuf::from("/leads")),
            logging: LoggingConfig {
                level: "debug".to_string(),
            },
        };
        let text = toml::to_string(&config).unwrap();
        let parsed: TomlConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.data_dir, Some(PathBuf::from("/leads")));
        assert_eq!(parsed.logging.level, "debug");
    }

    #[test]
    fn test_log_filter_uses_config_level() {
        let config = TomlConfig {
            logging: LoggingConfig {
                level: "debug".to_string(),
            },
            ..TomlConfig::default()
        };
        assert_eq!(log_filter(Some(&config)), "debug");
        assert_eq!(log_filter(None), "warn");
    }

    #[test]
    fn test_default_data_dir_non_empty() {
        assert!(!default_data_dir().as_os_str().is_empty());
    }
}
