//! Startup configuration.
//!
//! Loaded once from an optional TOML file before the shell starts. Runtime
//! settings live in the shell's option table; the `[options]` section here
//! only seeds it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ClickerError, Result};

/// Name of the state file written by save and read by load.
pub const DOTFILE: &str = ".clickerrc";

/// Top-level startup configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClickerConfig {
    /// State file used by save/load when no filename is given.
    pub dotfile: Option<PathBuf>,
    /// Replay the state file at startup when it exists.
    pub autoload: bool,
    /// How long the hotkey listener waits for a key before re-checking
    /// `enable_hotkey`.
    pub hotkey_poll_ms: u64,
    /// Listener sleep while hotkeys are disabled.
    pub hotkey_idle_ms: u64,
    /// Sampler period.
    pub sample_interval_ms: u64,
    /// Option table overrides applied at startup.
    pub options: BTreeMap<String, String>,
}

impl Default for ClickerConfig {
    fn default() -> Self {
        Self {
            dotfile: None,
            autoload: false,
            hotkey_poll_ms: 50,
            hotkey_idle_ms: 100,
            sample_interval_ms: 1000,
            options: BTreeMap::new(),
        }
    }
}

impl ClickerConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        if config.sample_interval_ms == 0 {
            return Err(ClickerError::Config(
                "sample_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(config)
    }

    /// Load a configuration file, or defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    ClickerError::Config(format!("{}: {e}", path.display()))
                })?;
                let config = Self::from_toml(&text)?;
                log::info!("Loaded config from {}", path.display());
                Ok(config)
            },
            None => Ok(Self::default()),
        }
    }

    /// The effective state file path.
    pub fn dotfile_path(&self) -> PathBuf {
        self.dotfile.clone().unwrap_or_else(default_dotfile)
    }

    pub fn hotkey_poll(&self) -> Duration {
        Duration::from_millis(self.hotkey_poll_ms)
    }

    pub fn hotkey_idle(&self) -> Duration {
        Duration::from_millis(self.hotkey_idle_ms)
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }
}

/// `~/.clickerrc`, or `./.clickerrc` when no home directory is known.
pub fn default_dotfile() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(DOTFILE),
        None => PathBuf::from(DOTFILE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let config = ClickerConfig::from_toml("").unwrap();
        assert!(!config.autoload);
        assert_eq!(config.hotkey_poll_ms, 50);
        assert_eq!(config.hotkey_idle_ms, 100);
        assert_eq!(config.sample_interval_ms, 1000);
        assert!(config.options.is_empty());
    }

    #[test]
    fn parses_all_fields() {
        let text = r#"
            dotfile = "/tmp/macros.rc"
            autoload = true
            hotkey_poll_ms = 20
            sample_interval_ms = 500

            [options]
            quiet = "true"
            leader = "> "
        "#;
        let config = ClickerConfig::from_toml(text).unwrap();
        assert_eq!(config.dotfile_path(), PathBuf::from("/tmp/macros.rc"));
        assert!(config.autoload);
        assert_eq!(config.hotkey_poll(), Duration::from_millis(20));
        assert_eq!(config.sample_interval(), Duration::from_millis(500));
        assert_eq!(config.options.get("leader").map(String::as_str), Some("> "));
    }

    #[test]
    fn unknown_field_rejected() {
        assert!(ClickerConfig::from_toml("colour = \"red\"").is_err());
    }

    #[test]
    fn zero_sample_interval_rejected() {
        let err = ClickerConfig::from_toml("sample_interval_ms = 0").unwrap_err();
        assert!(matches!(err, ClickerError::Config(_)));
    }

    #[test]
    fn default_dotfile_name() {
        assert!(default_dotfile().ends_with(DOTFILE));
        assert!(ClickerConfig::default().dotfile_path().ends_with(DOTFILE));
    }

    #[test]
    fn load_none_is_default() {
        let config = ClickerConfig::load(None).unwrap();
        assert_eq!(config.sample_interval_ms, 1000);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clicker.toml");
        std::fs::write(&path, "autoload = true\n").unwrap();
        let config = ClickerConfig::load(Some(&path)).unwrap();
        assert!(config.autoload);
    }

    #[test]
    fn load_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClickerConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ClickerError::Config(_)));
    }
}
