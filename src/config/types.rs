//! Configuration type definitions.

use knuffel::Decode;
use std::path::{Path, PathBuf};

/// Environment variable overriding the AWS config file location.
pub const AWS_CONFIG_FILE_ENV: &str = "AWS_CONFIG_FILE";

/// Default keychain service name.
const DEFAULT_KEYRING_SERVICE: &str = "credvault";

/// Expand tilde (~) prefix to the user's home directory.
/// Handles both "~" alone and "~/path/to/something" patterns.
pub(crate) fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

/// Main configuration structure parsed from credvault.kdl.
#[derive(Debug, Decode, Clone, Default)]
pub struct Config {
    #[knuffel(child)]
    pub defaults: Option<Defaults>,
}

/// Default settings for credvault.
#[derive(Debug, Decode, Clone, Default)]
pub struct Defaults {
    #[knuffel(property(name = "keyring_service"))]
    pub keyring_service: Option<String>,

    #[knuffel(property(name = "aws_config_file"))]
    pub aws_config_file: Option<String>,

    #[knuffel(property(name = "session_dir"))]
    pub session_dir: Option<String>,
}

impl Config {
    /// Keychain service name, defaulting to "credvault".
    pub fn keyring_service(&self) -> String {
        self.defaults
            .as_ref()
            .and_then(|d| d.keyring_service.clone())
            .unwrap_or_else(|| DEFAULT_KEYRING_SERVICE.to_string())
    }

    /// Path of the AWS config file, defaulting to ~/.aws/config.
    ///
    /// `override_path` (from the command line) beats `AWS_CONFIG_FILE`, which
    /// beats the settings file.
    pub fn aws_config_file(&self, override_path: Option<&Path>) -> PathBuf {
        let from_env = std::env::var(AWS_CONFIG_FILE_ENV)
            .ok()
            .filter(|v| !v.is_empty());
        self.aws_config_file_from(override_path, from_env.as_deref())
    }

    fn aws_config_file_from(&self, override_path: Option<&Path>, from_env: Option<&str>) -> PathBuf {
        if let Some(path) = override_path {
            return path.to_path_buf();
        }
        if let Some(path) = from_env {
            return expand_tilde(path);
        }
        self.defaults
            .as_ref()
            .and_then(|d| d.aws_config_file.as_deref())
            .map(expand_tilde)
            .unwrap_or_else(|| expand_tilde("~/.aws/config"))
    }

    /// Directory holding cached sessions, defaulting to <cache dir>/credvault/sessions.
    pub fn session_dir(&self) -> PathBuf {
        self.defaults
            .as_ref()
            .and_then(|d| d.session_dir.as_deref())
            .map(expand_tilde)
            .or_else(|| dirs::cache_dir().map(|c| c.join("credvault").join("sessions")))
            .unwrap_or_else(|| PathBuf::from("./.credvault/sessions"))
    }
}
