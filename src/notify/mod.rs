//! Email dispatch for mailer-ses.
//!
//! This module implements:
//! - Abstract `EmailTransport` trait for the sending capability
//! - `SesTransport`, the Amazon SES implementation
//! - A time-bounded `dispatch` whose outcome is a value, not an interrupt
//!
//! # Architecture
//!
//! ```text
//! event.rs -> render.rs -> notify::dispatch -> EmailTransport
//! ```
//!
//! The deadline governs only how long the caller waits. When it expires the
//! in-flight send future is dropped; nothing is signalled to the provider.

pub mod ses;
pub mod sigv4;
mod traits;

#[cfg(test)]
pub(crate) mod mock;

use std::time::Duration;

use crate::error::ProviderError;

pub use ses::SesTransport;
pub use traits::EmailTransport;

/// Wall-clock budget for one send.
pub const DISPATCH_TIMEOUT: Duration = Duration::from_secs(10);

/// A fully rendered mail ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub text_body: String,
}

/// What the provider returned for an accepted mail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendReceipt {
    /// Provider message id, when the response carried one.
    pub message_id: Option<String>,
}

/// Terminal outcome of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The send completed within the budget.
    Sent(SendReceipt),
    /// The budget elapsed before the send completed.
    TimedOut,
}

/// Send one mail, waiting at most `budget`.
///
/// # Returns
///
/// * `Ok(DispatchOutcome::Sent)` - The transport completed in time
/// * `Ok(DispatchOutcome::TimedOut)` - The budget elapsed first
/// * `Err(ProviderError)` - The transport failed in time; passed through as is
pub async fn dispatch(
    transport: &dyn EmailTransport,
    email: &OutgoingEmail,
    budget: Duration,
) -> Result<DispatchOutcome, ProviderError> {
    tracing::debug!(
        transport = transport.transport_type(),
        to = %email.to,
        budget_secs = budget.as_secs(),
        "Dispatching mail"
    );

    match tokio::time::timeout(budget, transport.send_email(email)).await {
        Ok(Ok(receipt)) => Ok(DispatchOutcome::Sent(receipt)),
        Ok(Err(e)) => Err(e),
        Err(_elapsed) => Ok(DispatchOutcome::TimedOut),
    }
}
