//! Centralized error types for mailer-ses using thiserror.
//!
//! A dispatch timeout is deliberately absent from this module: it is a
//! [`DispatchOutcome`](crate::notify::DispatchOutcome), not an error.

use thiserror::Error;

/// Errors related to settings loading and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load settings file: {0}")]
    LoadError(String),
    #[error("invalid settings document: {0}")]
    ParseError(String),
    #[error("settings section '{0}' not found")]
    MissingSection(String),
    #[error("invalid settings section '{section}': {message}")]
    InvalidSection { section: String, message: String },
    #[error("{}", undefined_vars_message(.0))]
    UndefinedEnvVar(Vec<String>),
}

fn undefined_vars_message(names: &[String]) -> String {
    format!(
        "undefined environment variable{}: {}",
        if names.len() > 1 { "s" } else { "" },
        names.join(", ")
    )
}

/// Errors related to reading the monitoring event.
#[derive(Error, Debug)]
pub enum EventError {
    #[error("failed to read event: {0}")]
    Read(String),
    #[error("invalid event: {0}")]
    Invalid(String),
}

/// Errors raised by the email provider.
///
/// These are never caught by the handler: they propagate to the caller,
/// which decides whether to re-invoke.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("email service request failed: {0}")]
    Http(String),
    #[error("email service rejected the message ({status} {code}): {message}")]
    Rejected {
        status: u16,
        code: String,
        message: String,
    },
    #[error("failed to sign email service request: {0}")]
    Signing(String),
}
