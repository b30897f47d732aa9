//! One handler invocation: render the event, dispatch it, report.
//!
//! Exactly one status line is written per completed invocation. Only the
//! timeout is turned into a report; provider errors are returned to the
//! caller untouched.

use std::io::Write;
use std::time::Duration;

use tracing::Instrument;

use crate::config::MailerConfig;
use crate::error::ProviderError;
use crate::event::Event;
use crate::notify::{DISPATCH_TIMEOUT, DispatchOutcome, EmailTransport, OutgoingEmail, dispatch};
use crate::render::{render_body, render_subject, resolve_identity};

/// Build the mail for an event.
pub fn compose(config: &MailerConfig, event: &Event) -> OutgoingEmail {
    OutgoingEmail {
        to: config.mail_to.clone(),
        from: config.mail_from.clone(),
        subject: render_subject(config, event),
        text_body: render_body(event, config.timezone),
    }
}

/// The human-readable line reported for an outcome.
pub fn status_line(
    outcome: &DispatchOutcome,
    identity: &str,
    config: &MailerConfig,
    event: &Event,
) -> String {
    match outcome {
        DispatchOutcome::Sent(_) => {
            format!("mail -- sent alert for {} to {}", identity, config.mail_to)
        }
        DispatchOutcome::TimedOut => format!(
            "mail -- timed out while attempting to {} an incident -- {}",
            event.action, identity
        ),
    }
}

/// Handle one event with the default 10 second budget.
pub async fn handle<W: Write>(
    config: &MailerConfig,
    event: &Event,
    transport: &dyn EmailTransport,
    out: &mut W,
) -> Result<DispatchOutcome, ProviderError> {
    handle_with_budget(config, event, transport, out, DISPATCH_TIMEOUT).await
}

/// Handle one event, waiting at most `budget` for the transport.
pub async fn handle_with_budget<W: Write>(
    config: &MailerConfig,
    event: &Event,
    transport: &dyn EmailTransport,
    out: &mut W,
    budget: Duration,
) -> Result<DispatchOutcome, ProviderError> {
    let identity = resolve_identity(event);
    let span = tracing::info_span!("handle", identity = %identity, action = %event.action);

    async {
        let email = compose(config, event);

        let outcome = match dispatch(transport, &email, budget).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "Email service error");
                return Err(e);
            }
        };

        match &outcome {
            DispatchOutcome::Sent(receipt) => tracing::info!(
                to = %config.mail_to,
                message_id = receipt.message_id.as_deref().unwrap_or("-"),
                "Mail sent"
            ),
            DispatchOutcome::TimedOut => tracing::warn!(
                budget_secs = budget.as_secs(),
                "Timed out waiting for email service"
            ),
        }

        let line = status_line(&outcome, &identity, config, event);
        if let Err(e) = writeln!(out, "{}", line).and_then(|()| out.flush()) {
            tracing::error!(error = %e, "Failed to write status line");
        }

        Ok(outcome)
    }
    .instrument(span)
    .await
}
