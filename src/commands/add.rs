//! Add command handlers - storing long-lived credentials for a profile.
//!
//! The workflow runs strictly in order: reject delegating profiles, obtain the
//! credential material, write it to the store, drop cached sessions minted
//! from the old material, then register the profile in the config file. A
//! failure in the first three steps stops everything after it. Session removal
//! failures are only reported. A config write failure is returned, but the
//! credentials stay stored.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::{AwsConfigFile, Config, ProfileConfig};
use crate::credentials::{CredentialSource, EnvSource, PromptSource, TerminalPrompt};
use crate::error::{Error, Result};
use crate::keychain::{CredentialStore, KeyringStore};
use crate::profile::ProfileSection;
use crate::sessions::{SessionCache, SessionStore};

/// What to add and whether to register the profile.
#[derive(Debug, Clone, Copy)]
pub struct AddInput<'a> {
    pub profile: &'a str,
    pub add_config: bool,
}

/// The external state the workflow reads and writes.
pub struct Backends<'a> {
    pub config: &'a mut dyn ProfileConfig,
    pub store: &'a dyn CredentialStore,
    pub sessions: &'a dyn SessionStore,
}

/// Result of a completed add.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct AddOutcome {
    /// Sessions removed, or `None` if removal failed.
    pub sessions_removed: Option<usize>,
    /// Path of the config file the profile was added to, if it was.
    pub registered_in: Option<PathBuf>,
}

/// Run the add workflow for one profile.
///
/// User-facing acknowledgements are written to `out`.
pub fn add_credentials(
    input: AddInput<'_>,
    backends: &mut Backends<'_>,
    source: &dyn CredentialSource,
    out: &mut dyn Write,
) -> Result<AddOutcome> {
    let profile = input.profile;
    validate_profile_name(profile)?;

    ensure_not_delegating(&*backends.config, profile)?;

    let creds = source.resolve()?;
    tracing::debug!(profile, "resolved credentials");

    backends
        .store
        .set(profile, &creds)
        .map_err(|source| Error::StoreWriteFailure {
            profile: profile.to_string(),
            source,
        })?;
    drop(creds);
    acknowledge(
        out,
        format_args!("Added credentials to profile \"{}\" in vault", profile),
    );

    let mut outcome = AddOutcome {
        sessions_removed: invalidate_sessions(backends.sessions, profile),
        registered_in: None,
    };
    if let Some(n) = outcome.sessions_removed
        && n > 0
    {
        acknowledge(out, format_args!("Deleted {} existing sessions.", n));
    }

    if input.add_config {
        outcome.registered_in = register_profile(&mut *backends.config, profile)?;
    }

    Ok(outcome)
}

/// Reject names that would not read back as the same `[profile NAME]` header.
fn validate_profile_name(profile: &str) -> Result<()> {
    if profile.trim().is_empty() {
        return Err(Error::validation("Profile name cannot be empty"));
    }
    if profile.trim() != profile {
        return Err(Error::validation(format!(
            "Profile name {:?} cannot start or end with whitespace",
            profile
        )));
    }
    if let Some(c) = profile
        .chars()
        .find(|c| *c == '[' || *c == ']' || c.is_control())
    {
        return Err(Error::validation(format!(
            "Profile name {:?} cannot contain {:?}",
            profile, c
        )));
    }
    Ok(())
}

/// Print a user-facing line. The credentials are already stored by the time
/// this runs, so a closed stdout must not stop the remaining steps.
fn acknowledge(out: &mut dyn Write, line: std::fmt::Arguments<'_>) {
    if let Err(e) = writeln!(out, "{}", line) {
        tracing::warn!(error = %e, "could not write to output");
    }
}

fn ensure_not_delegating(config: &dyn ProfileConfig, profile: &str) -> Result<()> {
    let delegation = config
        .profile_section(profile)
        .and_then(|section| section.delegation());

    match delegation {
        Some(d) => Err(Error::DelegationConflict {
            profile: profile.to_string(),
            kind: d.kind,
            target: d.target,
        }),
        None => Ok(()),
    }
}

fn invalidate_sessions(sessions: &dyn SessionStore, profile: &str) -> Option<usize> {
    match sessions.delete(profile) {
        Ok(n) => {
            tracing::debug!(profile, removed = n, "invalidated cached sessions");
            Some(n)
        }
        Err(source) => {
            let err = Error::SessionInvalidationFailure {
                profile: profile.to_string(),
                source,
            };
            tracing::warn!("{}", err);
            None
        }
    }
}

/// Add a minimal section for `profile` unless one already exists.
fn register_profile(config: &mut dyn ProfileConfig, profile: &str) -> Result<Option<PathBuf>> {
    if config.profile_section(profile).is_some() {
        return Ok(None);
    }

    let path = config.path().to_path_buf();
    tracing::info!(profile, path = %path.display(), "adding profile to config");
    config
        .add(ProfileSection::new(profile))
        .map_err(|source| Error::ConfigWriteFailure {
            profile: profile.to_string(),
            path: path.clone(),
            source,
        })?;
    Ok(Some(path))
}

/// Handle the add command - wire the real keychain, session cache and config file.
pub fn handle_add(
    config: &Config,
    config_file: Option<&Path>,
    keyring_service: Option<&str>,
    profile: &str,
    from_env: bool,
    add_config: bool,
) -> Result<()> {
    let aws_path = config.aws_config_file(config_file);
    let mut aws_config = AwsConfigFile::load(&aws_path)
        .map_err(|e| Error::config(format!("could not read {}: {}", aws_path.display(), e)))?;

    let store = KeyringStore::new(
        keyring_service
            .map(str::to_string)
            .unwrap_or_else(|| config.keyring_service()),
    );
    let sessions = SessionCache::new(config.session_dir());

    let source: Box<dyn CredentialSource> = if from_env {
        Box::new(EnvSource::new())
    } else {
        Box::new(PromptSource::new(TerminalPrompt))
    };

    let mut backends = Backends {
        config: &mut aws_config,
        store: &store,
        sessions: &sessions,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    add_credentials(
        AddInput {
            profile,
            add_config,
        },
        &mut backends,
        source.as_ref(),
        &mut out,
    )?;

    Ok(())
}
