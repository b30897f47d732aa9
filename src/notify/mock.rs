//! Mock transport for unit tests without an SES endpoint.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{EmailTransport, OutgoingEmail, SendReceipt};
use crate::error::ProviderError;

/// How the mock answers every send.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    Succeed,
    /// Sleep (on the tokio clock) before succeeding.
    Delay(Duration),
    Fail(ProviderError),
}

/// Records every accepted mail.
pub struct MockEmailTransport {
    behavior: MockBehavior,
    sent: Mutex<Vec<OutgoingEmail>>,
    send_count: AtomicU32,
}

impl MockEmailTransport {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            sent: Mutex::new(Vec::new()),
            send_count: AtomicU32::new(0),
        }
    }

    pub fn send_count(&self) -> u32 {
        self.send_count.load(Ordering::SeqCst)
    }

    pub fn sent_emails(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailTransport for MockEmailTransport {
    fn transport_type(&self) -> &str {
        "mock"
    }

    async fn send_email(&self, email: &OutgoingEmail) -> Result<SendReceipt, ProviderError> {
        let attempt = self.send_count.fetch_add(1, Ordering::SeqCst) + 1;

        match &self.behavior {
            MockBehavior::Succeed => {}
            MockBehavior::Delay(delay) => tokio::time::sleep(*delay).await,
            MockBehavior::Fail(error) => return Err(error.clone()),
        }

        self.sent.lock().unwrap().push(email.clone());
        Ok(SendReceipt {
            message_id: Some(format!("mock-message-{}", attempt)),
        })
    }
}

pub fn sample_email() -> OutgoingEmail {
    OutgoingEmail {
        to: "ops@example.com".to_string(),
        from: "alerts@example.com".to_string(),
        subject: "[PROD] ALERT - web1/disk: Disk critical".to_string(),
        text_body: "92% used\nHost: web1\n".to_string(),
    }
}
