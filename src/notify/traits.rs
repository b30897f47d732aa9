//! Email transport trait definition.

use async_trait::async_trait;

use super::{OutgoingEmail, SendReceipt};
use crate::error::ProviderError;

/// Abstract email-sending capability.
///
/// Implementations must be `Send + Sync` so a transport can be shared
/// behind an `Arc`. Transports perform a single attempt: retries are not
/// part of this contract.
///
/// # Example
///
/// ```ignore
/// use mailer_ses::notify::{EmailTransport, OutgoingEmail, SendReceipt};
///
/// struct StdoutTransport;
///
/// #[async_trait]
/// impl EmailTransport for StdoutTransport {
///     fn transport_type(&self) -> &str { "stdout" }
///     async fn send_email(&self, email: &OutgoingEmail) -> Result<SendReceipt, ProviderError> {
///         println!("{}", email.subject);
///         Ok(SendReceipt::default())
///     }
/// }
/// ```
#[async_trait]
pub trait EmailTransport: Send + Sync {
    /// Short transport identifier used in logs (e.g. "ses").
    fn transport_type(&self) -> &str;

    /// Submit one email.
    ///
    /// # Returns
    ///
    /// * `Ok(SendReceipt)` - The provider accepted the message
    /// * `Err(ProviderError)` - The request failed or the provider refused it
    async fn send_email(&self, email: &OutgoingEmail) -> Result<SendReceipt, ProviderError>;
}

impl std::fmt::Debug for dyn EmailTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailTransport")
            .field("type", &self.transport_type())
            .finish()
    }
}
