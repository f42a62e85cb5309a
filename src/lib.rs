//! credvault - store long-lived AWS credentials in the OS keychain.
//!
//! This crate provides functionality to:
//! - Refuse credentials for profiles that delegate to another profile
//! - Read an access key pair from the environment or a masked prompt
//! - Store it in the platform keychain, replacing any previous value
//! - Drop cached sessions minted from the old credentials
//! - Register the profile in `~/.aws/config` if it is missing
//!
//! # Example
//!
//! ```no_run
//! use credvault::commands::{AddInput, Backends, add_credentials};
//! use credvault::config::{AwsConfigFile, Config};
//! use credvault::credentials::EnvSource;
//! use credvault::keychain::KeyringStore;
//! use credvault::sessions::SessionCache;
//!
//! fn main() -> credvault::Result<()> {
//!     let config = Config::load()?;
//!     let mut aws_config = AwsConfigFile::load(config.aws_config_file(None))?;
//!     let store = KeyringStore::new(config.keyring_service());
//!     let sessions = SessionCache::new(config.session_dir());
//!
//!     let mut backends = Backends {
//!         config: &mut aws_config,
//!         store: &store,
//!         sessions: &sessions,
//!     };
//!     let input = AddInput { profile: "work", add_config: true };
//!     add_credentials(input, &mut backends, &EnvSource::new(), &mut std::io::stdout())?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod credentials;
pub mod error;
pub mod keychain;
pub mod profile;
pub mod sessions;

// Re-export commonly used types at the crate root
pub use config::Config;
pub use error::{Error, Result};
