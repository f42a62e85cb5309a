//! Credential material and the strategies that obtain it.
//!
//! A [`CredentialSource`] yields one access key pair per call. Two strategies
//! exist: [`EnvSource`] reads the standard AWS environment variables and
//! [`PromptSource`] asks on the terminal with echo disabled. Neither retries.

use std::io::{self, Write};

use secrecy::{ExposeSecret, SecretString};

use crate::error::{Error, Result};

/// Environment variable holding the access key id.
pub const ACCESS_KEY_ID_ENV: &str = "AWS_ACCESS_KEY_ID";
/// Environment variable holding the secret access key.
pub const SECRET_ACCESS_KEY_ENV: &str = "AWS_SECRET_ACCESS_KEY";

const ACCESS_KEY_ID_LABEL: &str = "Enter Access Key ID";
const SECRET_ACCESS_KEY_LABEL: &str = "Enter Secret Access Key";

/// A long-lived access key pair. The secret half is redacted in `Debug`.
#[derive(Debug)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: SecretString,
}

impl Credentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: SecretString::from(secret_access_key.into()),
        }
    }

    /// The secret access key in plaintext. Only the store should call this.
    pub fn secret(&self) -> &str {
        self.secret_access_key.expose_secret()
    }
}

/// Something that can produce credential material.
pub trait CredentialSource {
    fn resolve(&self) -> Result<Credentials>;
}

type Lookup = Box<dyn Fn(&str) -> Option<String>>;

/// Reads `AWS_ACCESS_KEY_ID` and `AWS_SECRET_ACCESS_KEY`.
pub struct EnvSource {
    lookup: Lookup,
}

impl EnvSource {
    /// Read from the process environment.
    pub fn new() -> Self {
        Self::with_lookup(|name| std::env::var(name).ok())
    }

    /// Read variables through `lookup` instead of the process environment.
    pub fn with_lookup(lookup: impl Fn(&str) -> Option<String> + 'static) -> Self {
        Self {
            lookup: Box::new(lookup),
        }
    }

    fn require(&self, variable: &str) -> Result<String> {
        match (self.lookup)(variable) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(Error::MissingCredentialInput {
                variable: variable.to_string(),
            }),
        }
    }
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialSource for EnvSource {
    fn resolve(&self) -> Result<Credentials> {
        let access_key_id = self.require(ACCESS_KEY_ID_ENV)?;
        let secret_access_key = self.require(SECRET_ACCESS_KEY_ENV)?;
        Ok(Credentials::new(access_key_id, secret_access_key))
    }
}

/// Reads one value from the user per call, without echo.
pub trait Prompt {
    fn prompt(&self, label: &str) -> io::Result<String>;
}

/// Masked prompt on the controlling terminal.
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn prompt(&self, label: &str) -> io::Result<String> {
        eprint!("{}: ", label);
        io::stderr().flush()?;
        rpassword::read_password()
    }
}

/// Asks for the access key id, then the secret access key.
pub struct PromptSource<P: Prompt> {
    prompt: P,
}

impl<P: Prompt> PromptSource<P> {
    pub fn new(prompt: P) -> Self {
        Self { prompt }
    }

    fn ask(&self, label: &str, field: &str) -> Result<String> {
        let value = self
            .prompt
            .prompt(label)
            .map_err(|source| Error::PromptFailure {
                field: field.to_string(),
                source,
            })?;

        let value = value.trim().to_string();
        if value.is_empty() {
            return Err(Error::MissingCredentialInput {
                variable: field.to_string(),
            });
        }
        Ok(value)
    }
}

impl<P: Prompt> CredentialSource for PromptSource<P> {
    fn resolve(&self) -> Result<Credentials> {
        let access_key_id = self.ask(ACCESS_KEY_ID_LABEL, "Access Key ID")?;
        let secret_access_key = self.ask(SECRET_ACCESS_KEY_LABEL, "Secret Access Key")?;
        Ok(Credentials::new(access_key_id, secret_access_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> EnvSource {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvSource::with_lookup(move |name| vars.get(name).cloned())
    }

    struct ScriptedPrompt {
        answers: RefCell<Vec<io::Result<String>>>,
        labels: RefCell<Vec<String>>,
    }

    impl ScriptedPrompt {
        fn new(answers: Vec<io::Result<String>>) -> Self {
            Self {
                answers: RefCell::new(answers),
                labels: RefCell::new(Vec::new()),
            }
        }
    }

    impl Prompt for &ScriptedPrompt {
        fn prompt(&self, label: &str) -> io::Result<String> {
            self.labels.borrow_mut().push(label.to_string());
            self.answers.borrow_mut().remove(0)
        }
    }

    #[test]
    fn test_env_source_reads_both_variables() {
        let creds = env(&[
            (ACCESS_KEY_ID_ENV, "AKIAEXAMPLE"),
            (SECRET_ACCESS_KEY_ENV, "s3cr3t"),
        ])
        .resolve()
        .unwrap();
        assert_eq!(creds.access_key_id, "AKIAEXAMPLE");
        assert_eq!(creds.secret(), "s3cr3t");
    }

    #[test]
    fn test_env_source_missing_access_key() {
        let err = env(&[(SECRET_ACCESS_KEY_ENV, "s3cr3t")]).resolve().unwrap_err();
        match err {
            Error::MissingCredentialInput { variable } => assert_eq!(variable, ACCESS_KEY_ID_ENV),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_env_source_empty_secret_counts_as_missing() {
        let err = env(&[(ACCESS_KEY_ID_ENV, "AKIAEXAMPLE"), (SECRET_ACCESS_KEY_ENV, "")])
            .resolve()
            .unwrap_err();
        assert!(
            matches!(err, Error::MissingCredentialInput { ref variable } if variable == SECRET_ACCESS_KEY_ENV)
        );
    }

    #[test]
    fn test_prompt_source_asks_in_order() {
        let prompt = ScriptedPrompt::new(vec![Ok("AKIA...1\n".to_string()), Ok("abc123".to_string())]);
        let creds = PromptSource::new(&prompt).resolve().unwrap();

        assert_eq!(creds.access_key_id, "AKIA...1");
        assert_eq!(creds.secret(), "abc123");
        assert_eq!(
            *prompt.labels.borrow(),
            vec![ACCESS_KEY_ID_LABEL.to_string(), SECRET_ACCESS_KEY_LABEL.to_string()]
        );
    }

    #[test]
    fn test_prompt_failure_names_field() {
        let prompt = ScriptedPrompt::new(vec![
            Ok("AKIA...1".to_string()),
            Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted")),
        ]);
        let err = PromptSource::new(&prompt).resolve().unwrap_err();
        assert!(matches!(err, Error::PromptFailure { ref field, .. } if field == "Secret Access Key"));
    }

    #[test]
    fn test_prompt_failure_stops_before_second_prompt() {
        let prompt = ScriptedPrompt::new(vec![Err(io::Error::other("no tty"))]);
        assert!(PromptSource::new(&prompt).resolve().is_err());
        assert_eq!(prompt.labels.borrow().len(), 1);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::new("AKIAEXAMPLE", "topsecret");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("AKIAEXAMPLE"));
        assert!(!debug.contains("topsecret"));
    }
}
