//! Loads `config.toml`.

use std::fs;
use std::path::{Path, PathBuf};
use zwen_core::config::ZwenConfig;
use zwen_core::error::{Result, ZwenError};

/// Reads the application configuration from a TOML file.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration.
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load(&self) -> Result<ZwenConfig> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "No config file, using defaults");
            return Ok(ZwenConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let config = ZwenConfig::from_toml_str(&content).map_err(|e| {
            ZwenError::config(format!("{}: {}", self.path.display(), e))
        })?;

        tracing::info!(path = %self.path.display(), "Loaded configuration");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(temp_dir.path().join("config.toml"));
        assert_eq!(service.load().unwrap(), ZwenConfig::default());
    }

    #[test]
    fn test_loads_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[chat]\ngreeting = \"Hey there\"\n").unwrap();

        let config = ConfigService::new(path).load().unwrap();
        assert_eq!(config.chat.greeting, "Hey there");
    }

    #[test]
    fn test_malformed_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[chat\n").unwrap();

        let err = ConfigService::new(path).load().unwrap_err();
        assert!(matches!(err, ZwenError::Config(_)));
    }
}
