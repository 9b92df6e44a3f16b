//! Persisted presentation-layer preferences.
//!
//! The extractor core never reads these; only the front end does, to
//! remember where the last archive came from. Stored as a small TOML file
//! in the per-user data directory. A missing or unparsable file falls back
//! to defaults rather than failing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Directory the most recently extracted archive lived in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_directory: Option<PathBuf>,
}

impl Settings {
    /// Location of the settings file, if a per-user data directory exists.
    pub fn storage_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("mcunzip").join("settings.toml"))
    }

    pub fn load() -> Self {
        match Self::storage_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(raw) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        toml::from_str(&raw).unwrap_or_else(|e| {
            debug!("ignoring unparsable settings file {}: {e}", path.display());
            Self::default()
        })
    }

    pub fn store(&self) -> Result<()> {
        let path = Self::storage_path().context("no per-user data directory")?;
        self.store_to(&path)
    }

    pub fn store_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("couldn't create {}", parent.display()))?;
        }
        let raw = toml::to_string(self).context("couldn't serialize settings")?;
        std::fs::write(path, raw).with_context(|| format!("couldn't write {}", path.display()))
    }
}
