/*!
 * Kernel Configuration
 * Runtime-tunable limits with defaults, env overrides and JSON files
 *
 * Environment variables:
 * - KERNEL_MAX_OPEN_FILES: descriptor table capacity (default: 1)
 * - KERNEL_MAX_USER_STRING: scan limit for user strings (default: 4096)
 * - KERNEL_MAX_READ_SIZE: largest Read request (default: 65536)
 * - KERNEL_RANDOM_SEED: fixed seed for RandomNum (default: entropy)
 * - KERNEL_STORAGE_PATH: host directory backing Open (default: /tmp/trap-kernel-storage)
 */

use crate::core::limits::{
    DEFAULT_MAX_OPEN_FILES, DEFAULT_MAX_READ_SIZE, DEFAULT_MAX_USER_STRING, DEFAULT_STORAGE_PATH,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} has invalid value {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("failed to read {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },
}

/// Limits and collaborator settings for one kernel instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Capacity of the open-file descriptor table
    pub max_open_files: usize,
    /// Bytes scanned before a user string is rejected
    pub max_user_string: usize,
    /// Largest byte count a single Read may request
    pub max_read_size: usize,
    /// Fixed RandomNum seed; `None` seeds from OS entropy
    pub random_seed: Option<u64>,
    /// Root directory for `LocalFS`
    pub storage_path: PathBuf,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            max_open_files: DEFAULT_MAX_OPEN_FILES,
            max_user_string: DEFAULT_MAX_USER_STRING,
            max_read_size: DEFAULT_MAX_READ_SIZE,
            random_seed: None,
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
        }
    }
}

impl KernelConfig {
    /// Defaults overridden by any `KERNEL_*` variables that are set
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load a JSON config file; missing fields keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay `KERNEL_*` environment variables onto this config
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(v) = env_parse("KERNEL_MAX_OPEN_FILES")? {
            self.max_open_files = v;
        }
        if let Some(v) = env_parse("KERNEL_MAX_USER_STRING")? {
            self.max_user_string = v;
        }
        if let Some(v) = env_parse("KERNEL_MAX_READ_SIZE")? {
            self.max_read_size = v;
        }
        if let Some(v) = env_parse("KERNEL_RANDOM_SEED")? {
            self.random_seed = Some(v);
        }
        if let Ok(path) = std::env::var("KERNEL_STORAGE_PATH") {
            self.storage_path = PathBuf::from(path);
        }
        self.validate()?;
        debug!(config = ?self, "Kernel configuration loaded");
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_open_files == 0 {
            return Err(ConfigError::Zero("max_open_files"));
        }
        if self.max_user_string == 0 {
            return Err(ConfigError::Zero("max_user_string"));
        }
        if self.max_read_size == 0 {
            return Err(ConfigError::Zero("max_read_size"));
        }
        Ok(())
    }

    pub fn with_max_open_files(mut self, n: usize) -> Self {
        self.max_open_files = n;
        self
    }

    pub fn with_max_user_string(mut self, n: usize) -> Self {
        self.max_user_string = n;
        self
    }

    pub fn with_max_read_size(mut self, n: usize) -> Self {
        self.max_read_size = n;
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self
    }
}

fn env_parse<T: FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { var, value }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for var in [
            "KERNEL_MAX_OPEN_FILES",
            "KERNEL_MAX_USER_STRING",
            "KERNEL_MAX_READ_SIZE",
            "KERNEL_RANDOM_SEED",
            "KERNEL_STORAGE_PATH",
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_defaults() {
        let config = KernelConfig::default();
        assert_eq!(config.max_open_files, 1);
        assert_eq!(config.max_user_string, 4096);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        std::env::set_var("KERNEL_MAX_OPEN_FILES", "4");
        std::env::set_var("KERNEL_RANDOM_SEED", "99");
        std::env::set_var("KERNEL_STORAGE_PATH", "/srv/files");

        let config = KernelConfig::from_env().unwrap();
        assert_eq!(config.max_open_files, 4);
        assert_eq!(config.random_seed, Some(99));
        assert_eq!(config.storage_path, PathBuf::from("/srv/files"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_env_invalid() {
        clear_env();
        std::env::set_var("KERNEL_MAX_READ_SIZE", "lots");
        assert!(matches!(
            KernelConfig::from_env(),
            Err(ConfigError::InvalidEnv { var: "KERNEL_MAX_READ_SIZE", .. })
        ));

        std::env::set_var("KERNEL_MAX_READ_SIZE", "0");
        assert_eq!(
            KernelConfig::from_env(),
            Err(ConfigError::Zero("max_read_size"))
        );
        clear_env();
    }

    #[test]
    fn test_from_file_partial() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("kernel.json");
        std::fs::write(&path, r#"{"max_open_files": 3, "random_seed": 7}"#).unwrap();

        let config = KernelConfig::from_file(&path).unwrap();
        assert_eq!(config.max_open_files, 3);
        assert_eq!(config.random_seed, Some(7));
        assert_eq!(config.max_read_size, DEFAULT_MAX_READ_SIZE);
    }

    #[test]
    fn test_from_file_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(matches!(
            KernelConfig::from_file(dir.path().join("absent.json")),
            Err(ConfigError::Io { .. })
        ));

        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            KernelConfig::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
