//! Cache of temporary sessions minted from stored credentials.
//!
//! Each session record is a file whose name identifies it:
//! `session,<profile>,<mfa serial>,<expiry>` where profile and MFA serial are
//! URL-safe base64 without padding and expiry is a Unix timestamp. Only
//! removal is handled here; sessions are written by whatever mints them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};

use crate::error::StoreError;

const PREFIX: &str = "session";

/// Removal of cached sessions by profile.
pub trait SessionStore {
    /// Delete every cached session for `profile`, returning how many were removed.
    fn delete(&self, profile: &str) -> Result<usize, StoreError>;
}

/// Identifies one cached session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKey {
    pub profile: String,
    pub mfa_serial: String,
    pub expiration: DateTime<Utc>,
}

impl SessionKey {
    pub fn new(
        profile: impl Into<String>,
        mfa_serial: impl Into<String>,
        expiration: DateTime<Utc>,
    ) -> Self {
        Self {
            profile: profile.into(),
            mfa_serial: mfa_serial.into(),
            expiration,
        }
    }

    /// Encoded record name.
    pub fn file_name(&self) -> String {
        format!(
            "{},{},{},{}",
            PREFIX,
            URL_SAFE_NO_PAD.encode(&self.profile),
            URL_SAFE_NO_PAD.encode(&self.mfa_serial),
            self.expiration.timestamp()
        )
    }

    /// Decode a record name. Returns `None` for anything that isn't one.
    pub fn parse(name: &str) -> Option<Self> {
        let mut parts = name.split(',');
        if parts.next()? != PREFIX {
            return None;
        }
        let profile = decode(parts.next()?)?;
        let mfa_serial = decode(parts.next()?)?;
        let expiration = DateTime::from_timestamp(parts.next()?.parse().ok()?, 0)?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self {
            profile,
            mfa_serial,
            expiration,
        })
    }

    pub fn is_expired(&self) -> bool {
        self.expiration <= Utc::now()
    }
}

fn decode(part: &str) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(part).ok()?;
    String::from_utf8(bytes).ok()
}

/// Directory-backed [`SessionStore`].
#[derive(Debug, Clone)]
pub struct SessionCache {
    dir: PathBuf,
}

impl SessionCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All session records currently cached, with their paths.
    pub fn keys(&self) -> io::Result<Vec<(PathBuf, SessionKey)>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            if let Some(key) = name.to_str().and_then(SessionKey::parse) {
                keys.push((entry.path(), key));
            }
        }
        Ok(keys)
    }
}

impl SessionStore for SessionCache {
    fn delete(&self, profile: &str) -> Result<usize, StoreError> {
        let matching = self
            .keys()?
            .into_iter()
            .filter(|(_, key)| key.profile == profile)
            .map(|(path, key)| {
                tracing::debug!(
                    path = %path.display(),
                    expired = key.is_expired(),
                    "removing cached session"
                );
                path
            });
        remove_records(matching, |path| fs::remove_file(path))
    }
}

/// Remove every record, carrying on past failures. The first failure is
/// returned together with how many records did get removed.
fn remove_records(
    paths: impl IntoIterator<Item = PathBuf>,
    mut remove: impl FnMut(&Path) -> io::Result<()>,
) -> Result<usize, StoreError> {
    let mut removed = 0;
    let mut first_error = None;
    for path in paths {
        match remove(&path) {
            Ok(()) => removed += 1,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "could not remove session");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }
    match first_error {
        Some(source) => Err(StoreError::PartialRemoval { removed, source }),
        None => Ok(removed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_file_name_parses_back() {
        let expiration = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let key = SessionKey::new("work", "arn:aws:iam::123456789012:mfa/me", expiration);
        let name = key.file_name();

        assert!(name.starts_with("session,"));
        assert!(!name.contains('/'));
        assert_eq!(SessionKey::parse(&name), Some(key));
    }

    #[test]
    fn test_parse_rejects_foreign_names() {
        assert_eq!(SessionKey::parse("README"), None);
        assert_eq!(SessionKey::parse("session,d29yaw"), None);
        assert_eq!(SessionKey::parse("session,d29yaw,,notanumber"), None);
        assert_eq!(SessionKey::parse("session,d29yaw,,1,extra"), None);
    }

    #[test]
    fn test_empty_mfa_serial() {
        let key = SessionKey::new("work", "", Utc::now());
        let parsed = SessionKey::parse(&key.file_name()).unwrap();
        assert_eq!(parsed.mfa_serial, "");
    }

    #[test]
    fn test_is_expired() {
        assert!(SessionKey::new("p", "", Utc::now() - Duration::hours(1)).is_expired());
        assert!(!SessionKey::new("p", "", Utc::now() + Duration::hours(1)).is_expired());
    }

    #[test]
    fn test_remove_records_keeps_count_past_a_failure() {
        let paths = vec![
            PathBuf::from("a"),
            PathBuf::from("locked"),
            PathBuf::from("b"),
        ];
        let mut attempted = Vec::new();

        let err = remove_records(paths, |path| {
            attempted.push(path.to_path_buf());
            if path == Path::new("locked") {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
            } else {
                Ok(())
            }
        })
        .unwrap_err();

        assert_eq!(attempted.len(), 3);
        match err {
            StoreError::PartialRemoval { removed, source } => {
                assert_eq!(removed, 2);
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_remove_records_all_succeed() {
        let paths = vec![PathBuf::from("a"), PathBuf::from("b")];
        assert_eq!(remove_records(paths, |_| Ok(())).unwrap(), 2);
    }

    #[test]
    fn test_delete_from_missing_dir_is_zero() {
        let cache = SessionCache::new("/nonexistent/credvault/sessions");
        assert_eq!(cache.delete("work").unwrap(), 0);
    }
}
