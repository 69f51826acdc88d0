//! Tests for data folder resolution and graceful config degradation
//!
//! Note: Uses the serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate LOANTRAIL_DATA are marked with #[serial] so they run
//! sequentially, not in parallel.

use std::env;
use std::path::{Path, PathBuf};

use loantrail_common::config::{
    default_data_dir, ensure_dir_exists, leads_path, resolve_data_dir, TomlConfig, ENV_DATA_DIR,
};
use serial_test::serial;

#[test]
#[serial]
fn test_cli_arg_has_highest_priority() {
    env::set_var(ENV_DATA_DIR, "/tmp/loantrail-env");
    let resolved = resolve_data_dir(Some(Path::new("/tmp/loantrail-cli")));
    assert_eq!(resolved, PathBuf::from("/tmp/loantrail-cli"));
    env::remove_var(ENV_DATA_DIR);
}

#[test]
#[serial]
fn test_env_var_beats_default() {
    env::set_var(ENV_DATA_DIR, "/tmp/loantrail-env");
    let resolved = resolve_data_dir(None);
    assert_eq!(resolved, PathBuf::from("/tmp/loantrail-env"));
    env::remove_var(ENV_DATA_DIR);
}

#[test]
#[serial]
fn test_blank_env_var_is_ignored() {
    env::set_var(ENV_DATA_DIR, "   ");
    let resolved = resolve_data_dir(None);
    assert_ne!(resolved, PathBuf::from("   "));
    env::remove_var(ENV_DATA_DIR);
}

#[test]
#[serial]
fn test_no_overrides_falls_back_to_platform_default() {
    env::remove_var(ENV_DATA_DIR);
    let resolved = resolve_data_dir(None);
    assert!(!resolved.as_os_str().is_empty());
}

#[test]
fn test_leads_path_is_fixed_key() {
    let dir = PathBuf::from("/tmp/loantrail-data");
    assert_eq!(leads_path(&dir), dir.join("leads.json"));
}

#[test]
fn test_default_data_dir_mentions_app() {
    let default = default_data_dir();
    assert!(default.to_string_lossy().contains("loantrail"));
}

#[test]
fn test_ensure_dir_exists_is_idempotent() {
    let dir = tempfile::TempDir::new().unwrap();
    let nested = dir.path().join("a").join("b");
    ensure_dir_exists(&nested).unwrap();
    ensure_dir_exists(&nested).unwrap();
    assert!(nested.is_dir());
}

#[test]
fn test_toml_config_tolerates_missing_fields() {
    let config: TomlConfig = toml::from_str("data_dir = \"/leads\"").unwrap();
    assert_eq!(config.data_dir, Some(PathBuf::from("/leads")));
    assert_eq!(config.logging.level, "info");
}
