//! Bridge configuration
//!
//! Defaults, an optional TOML file and `HOSTBRIDGE_*` environment variables,
//! with the environment taking precedence.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_VAR: &str = "HOSTBRIDGE_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "hostbridge.toml";

const LOG_VAR: &str = "HOSTBRIDGE_LOG";
const FAULT_OPERATION_VAR: &str = "HOSTBRIDGE_FAULT_OPERATION";
const AUTOLOAD_CORE_VAR: &str = "HOSTBRIDGE_AUTOLOAD_CORE";

/// Complete bridge configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BridgeConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub log_filter: Option<String>,

    /// Fault message configuration
    pub faults: FaultConfig,

    /// Type directory configuration
    pub directory: DirectoryConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaultConfig {
    /// Prefix fault messages with the failing entry point's name
    pub include_operation: bool,
}

impl Default for FaultConfig {
    fn default() -> Self {
        Self {
            include_operation: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Register the core library at startup instead of on first lookup
    pub autoload_core: bool,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            autoload_core: true,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl BridgeConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::default().merge_from(|key| std::env::var(key).ok())
    }

    /// Overlay values found through `lookup` onto `self`.
    pub fn merge_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(filter) = lookup(LOG_VAR).filter(|value| !value.trim().is_empty()) {
            self.log_filter = Some(filter);
        }

        if let Some(flag) = lookup(FAULT_OPERATION_VAR).as_deref().and_then(parse_flag) {
            self.faults.include_operation = flag;
        }

        if let Some(flag) = lookup(AUTOLOAD_CORE_VAR).as_deref().and_then(parse_flag) {
            self.directory.autoload_core = flag;
        }

        self
    }

    /// Merge with environment variables (env vars take precedence)
    pub fn merge_with_env(self) -> Self {
        self.merge_from(|key| std::env::var(key).ok())
    }

    /// Load configuration from TOML file
    #[cfg(feature = "toml-config")]
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: BridgeConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from TOML file (stub when toml feature is disabled)
    #[cfg(not(feature = "toml-config"))]
    pub fn from_file(_path: &Path) -> anyhow::Result<Self> {
        anyhow::bail!("TOML support not enabled. Enable the 'toml-config' feature.")
    }

    /// Save configuration to TOML file
    #[cfg(feature = "toml-config")]
    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Save configuration to TOML file (stub when toml feature is disabled)
    #[cfg(not(feature = "toml-config"))]
    pub fn save_to_file(&self, _path: &Path) -> anyhow::Result<()> {
        anyhow::bail!("TOML support not enabled. Enable the 'toml-config' feature.")
    }

    /// Configuration for the process-wide bridge: the file named by
    /// `HOSTBRIDGE_CONFIG` (or `hostbridge.toml` when present), then the
    /// environment. A file that fails to load is logged and skipped.
    pub fn load() -> Self {
        let path = std::env::var_os(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .or_else(|| {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            });

        let config = match path {
            Some(path) => Self::from_file(&path).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), "ignoring bridge config: {err}");
                Self::default()
            }),
            None => Self::default(),
        };
        config.merge_with_env()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect::<HashMap<_, _>>();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = BridgeConfig::default();
        assert!(config.faults.include_operation);
        assert!(config.directory.autoload_core);
        assert!(config.log_filter.is_none());
    }

    #[test]
    fn test_environment_overrides() {
        let config = BridgeConfig::default().merge_from(lookup(&[
            (LOG_VAR, "hostbridge=debug"),
            (FAULT_OPERATION_VAR, "off"),
            (AUTOLOAD_CORE_VAR, "0"),
        ]));
        assert_eq!(config.log_filter.as_deref(), Some("hostbridge=debug"));
        assert!(!config.faults.include_operation);
        assert!(!config.directory.autoload_core);
    }

    #[test]
    fn test_unparseable_flags_are_ignored() {
        let config = BridgeConfig::default().merge_from(lookup(&[
            (FAULT_OPERATION_VAR, "maybe"),
            (LOG_VAR, "   "),
        ]));
        assert_eq!(config, BridgeConfig::default());
    }

    #[test]
    #[cfg(not(feature = "toml-config"))]
    fn test_file_loading_requires_feature() {
        assert!(BridgeConfig::from_file(Path::new(DEFAULT_CONFIG_FILE)).is_err());
    }

    #[test]
    #[cfg(feature = "toml-config")]
    fn test_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        let mut config = BridgeConfig::default();
        config.log_filter = Some("hostbridge=trace".into());
        config.directory.autoload_core = false;
        config.save_to_file(&path).unwrap();
        assert_eq!(BridgeConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    #[cfg(feature = "toml-config")]
    fn test_partial_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[faults]\ninclude_operation = false\n").unwrap();
        let config = BridgeConfig::from_file(&path).unwrap();
        assert!(!config.faults.include_operation);
        assert!(config.directory.autoload_core);
    }
}
