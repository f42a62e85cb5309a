//! OS keychain storage for long-lived credentials.
//!
//! Each profile's access key pair is stored as one keychain entry under the
//! configured service name, with the profile name as the entry user. The value
//! is a small JSON document:
//!
//! ```json
//! {"AccessKeyID":"AKIA...","SecretAccessKey":"..."}
//! ```
//!
//! Writing an entry replaces whatever was stored before.

use serde::Serialize;

use crate::credentials::Credentials;
use crate::error::StoreError;

/// Persistent credential storage keyed by profile name.
pub trait CredentialStore {
    /// Store `creds` for `profile`, replacing any previous value.
    fn set(&self, profile: &str, creds: &Credentials) -> Result<(), StoreError>;
}

#[derive(Serialize)]
struct StoredCredentials<'a> {
    #[serde(rename = "AccessKeyID")]
    access_key_id: &'a str,
    #[serde(rename = "SecretAccessKey")]
    secret_access_key: &'a str,
}

fn encode(creds: &Credentials) -> Result<String, StoreError> {
    let stored = StoredCredentials {
        access_key_id: &creds.access_key_id,
        secret_access_key: creds.secret(),
    };
    Ok(serde_json::to_string(&stored)?)
}

/// [`CredentialStore`] backed by the platform keychain via the `keyring` crate.
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }
}

impl CredentialStore for KeyringStore {
    fn set(&self, profile: &str, creds: &Credentials) -> Result<(), StoreError> {
        let value = encode(creds)?;
        let entry = keyring::Entry::new(&self.service, profile)?;
        entry.set_password(&value)?;
        tracing::debug!(service = %self.service, profile, "wrote keychain entry");
        Ok(())
    }
}
