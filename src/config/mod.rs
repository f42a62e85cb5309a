//! Configuration loading and management.
//!
//! Two files are involved: the tool's own settings (`credvault.kdl`) and the
//! AWS-style profile file that profiles are registered in.

pub mod aws;
mod loader;
mod types;

pub use aws::{AwsConfigFile, ProfileConfig};
pub use types::{Config, Defaults};
