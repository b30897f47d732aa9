//! Settings loading and validation for mailer-ses.
//!
//! The settings document is read once, and the mailer section is turned
//! into a strongly typed [`MailerConfig`] before any event is handled.

mod env;
mod secret;
mod types;

pub use env::resolve_env_vars;
pub use secret::SecretString;
pub use types::{
    DEFAULT_CONFIG_PATH, DEFAULT_REGION, DEFAULT_SECTION, MailerConfig, Settings,
};

#[cfg(test)]
pub(crate) use types::tests::sample_config;
