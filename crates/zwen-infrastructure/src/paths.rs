//! Unified path management for Zwen AI files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/zwen/              # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/zwen/         # Data directory
//! ├── storage.json             # Persisted chat sessions
//! └── logs/                    # Application logs
//!     └── zwen.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;
use zwen_core::error::{PersistenceError, ZwenError};

const APP_DIR_NAME: &str = "zwen";

/// Resolves platform directories, optionally rooted at an override.
///
/// With a base directory every path lives under it, which keeps tests and
/// portable installs away from the user's real profile.
#[derive(Debug, Clone, Default)]
pub struct ZwenPaths {
    base_dir: Option<PathBuf>,
}

impl ZwenPaths {
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self { base_dir }
    }

    /// Returns the configuration directory (e.g., `~/.config/zwen/`).
    pub fn config_dir(&self) -> Result<PathBuf, ZwenError> {
        self.resolve(dirs::config_dir())
    }

    /// Returns the data directory (e.g., `~/.local/share/zwen/`).
    pub fn data_dir(&self) -> Result<PathBuf, ZwenError> {
        self.resolve(dirs::data_dir())
    }

    pub fn config_file(&self) -> Result<PathBuf, ZwenError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, ZwenError> {
        Ok(self.data_dir()?.join("logs"))
    }

    fn resolve(&self, platform_dir: Option<PathBuf>) -> Result<PathBuf, ZwenError> {
        if let Some(base) = &self.base_dir {
            return Ok(base.clone());
        }
        platform_dir
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or_else(|| PersistenceError::unavailable("Cannot find home directory").into())
    }
}
