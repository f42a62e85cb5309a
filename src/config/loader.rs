//! Settings file discovery and loading.

use std::path::{Path, PathBuf};

use super::types::Config;
use crate::error::{Error, Result};

const FILE_NAME: &str = "credvault.kdl";

impl Config {
    /// Get the explicit ~/.config/credvault/credvault.kdl path (XDG-style, cross-platform)
    fn xdg_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".config/credvault").join(FILE_NAME))
    }

    /// Get the list of settings file search paths in priority order
    fn get_config_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. ./credvault.kdl (current directory)
        paths.push(PathBuf::from(FILE_NAME));

        // 2. ~/.config/credvault/credvault.kdl
        if let Some(xdg_path) = Self::xdg_config_path() {
            paths.push(xdg_path);
        }

        // 3. Platform-native config directory, unless it is the XDG path again
        if let Some(config_dir) = dirs::config_dir() {
            let native_path = config_dir.join("credvault").join(FILE_NAME);
            if Self::xdg_config_path().as_ref() != Some(&native_path) {
                paths.push(native_path);
            }
        }

        // 4. ~/.local/share/credvault/credvault.kdl
        if let Some(data_dir) = dirs::data_dir() {
            paths.push(data_dir.join("credvault").join(FILE_NAME));
        }

        paths
    }

    /// Find existing settings file by searching all standard locations
    pub fn find_existing_config() -> Option<PathBuf> {
        Self::get_config_search_paths()
            .into_iter()
            .find(|path| path.exists())
    }

    /// Load settings from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&path.to_string_lossy(), &content)
    }

    /// Parse settings from KDL text; `name` is used in error messages.
    pub fn parse(name: &str, content: &str) -> Result<Self> {
        knuffel::parse::<Config>(name, content)
            .map_err(|e| Error::config(format!("{}: {}", name, e)))
    }

    /// Load settings from credvault.kdl, searching multiple locations.
    /// Falls back to built-in defaults when no file exists.
    pub fn load() -> Result<Self> {
        match Self::find_existing_config() {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading settings");
                Self::load_from_path(&path)
            }
            None => Ok(Config::default()),
        }
    }
}
