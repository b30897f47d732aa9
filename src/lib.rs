// src/lib.rs
//! mailer-ses - Mail monitoring events through Amazon SES.

pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod handler;
pub mod notify;
pub mod render;

// Re-export commonly used types
pub use cli::LogFormat;
pub use config::{MailerConfig, Settings};
pub use error::{ConfigError, EventError, ProviderError};
pub use event::Event;
pub use handler::{handle, handle_with_budget};
pub use notify::{
    DISPATCH_TIMEOUT, DispatchOutcome, EmailTransport, OutgoingEmail, SendReceipt, SesTransport,
    dispatch,
};
pub use render::{Classification, classify_action, render_body, render_subject, resolve_identity};
