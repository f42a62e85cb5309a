//! Command handlers for the credvault CLI.

mod add;

pub use add::{AddInput, AddOutcome, Backends, add_credentials, handle_add};
