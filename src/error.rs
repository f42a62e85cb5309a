//! Unified error type for credvault.
//!
//! All public APIs return `Result<T, Error>`. Each variant names the profile or
//! input that caused it so the binary can print it verbatim and exit.

use std::path::PathBuf;

use crate::profile::DelegationKind;

/// The unified error type for all credvault operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // ── Profile validation ─────────────────────────────────────────────
    /// The profile obtains its credentials from another profile.
    #[error(
        "Your profile has a {kind} of {target}, adding credentials to {profile} won't have any effect"
    )]
    DelegationConflict {
        profile: String,
        kind: DelegationKind,
        target: String,
    },

    // ── Credential acquisition ─────────────────────────────────────────
    /// A required environment variable was unset or empty.
    #[error("Missing value for {variable}")]
    MissingCredentialInput { variable: String },

    /// Reading from the terminal failed.
    #[error("failed to read {field}: {source}")]
    PromptFailure {
        field: String,
        #[source]
        source: std::io::Error,
    },

    // ── Backends ───────────────────────────────────────────────────────
    /// The credential store rejected the write.
    #[error("failed to store credentials for profile {profile:?}: {source}")]
    StoreWriteFailure {
        profile: String,
        #[source]
        source: StoreError,
    },

    /// Cached sessions could not be removed. Only logged by the add workflow,
    /// never returned from it.
    #[error("failed to delete cached sessions for profile {profile:?}: {source}")]
    SessionInvalidationFailure {
        profile: String,
        #[source]
        source: StoreError,
    },

    /// Appending the profile section to the config file failed.
    #[error("Error adding profile {profile:?} to {}: {source}", .path.display())]
    ConfigWriteFailure {
        profile: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Configuration ──────────────────────────────────────────────────
    /// Tool settings file could not be parsed.
    #[error("config error: {0}")]
    Config(String),

    // ── User input ─────────────────────────────────────────────────────
    /// Input validation failed.
    #[error("{0}")]
    Validation(String),

    // ── I/O ────────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors raised by the credential store and session cache backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("could not encode credentials: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Some records were deleted before one could not be.
    #[error("removed {removed} session(s) before failing: {source}")]
    PartialRemoval {
        removed: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Other(String),
}

// ── Convenience constructors ───────────────────────────────────────────

impl Error {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Whether the error leaves already-stored credentials behind.
    pub fn is_partial_success(&self) -> bool {
        matches!(self, Error::ConfigWriteFailure { .. })
    }
}

/// Convenience type alias for Results using credvault's Error.
pub type Result<T> = std::result::Result<T, Error>;
