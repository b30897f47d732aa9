//! Monitoring event model.
//!
//! The event arrives as a JSON document (one per invocation) and is parsed
//! into typed structures once. Every field the mailer reads is required
//! here, so nothing downstream performs fallible lookups.

use std::fmt;
use std::io::Read;

use serde::Deserialize;

use crate::error::EventError;

/// Action value marking an event as a resolution.
pub const ACTION_RESOLVE: &str = "resolve";

/// A monitoring event describing a check's current state.
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub client: Client,
    pub check: Check,
    /// Consecutive times the check reported the same non-OK state.
    pub occurrences: u64,
    /// Event action as received (`resolve`, `create`, `flapping`, ...).
    pub action: String,
}

/// The monitored host.
#[derive(Debug, Clone, Deserialize)]
pub struct Client {
    pub name: String,
    pub address: String,
}

/// The check whose result triggered the event.
#[derive(Debug, Clone, Deserialize)]
pub struct Check {
    pub name: String,
    pub output: String,
    /// Unix timestamp (seconds) of when the check fired.
    pub issued: i64,
    pub command: String,
    pub status: CheckStatus,
    pub notification: String,
}

/// Check result code, numeric or textual depending on the producer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CheckStatus {
    Code(i64),
    Text(String),
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStatus::Code(code) => write!(f, "{}", code),
            CheckStatus::Text(text) => f.write_str(text),
        }
    }
}

impl Event {
    /// Parse an event from a JSON string.
    ///
    /// # Errors
    /// Returns [`EventError::Invalid`] if the document is not valid JSON or
    /// a required field is missing or mistyped.
    pub fn from_json(json: &str) -> Result<Self, EventError> {
        serde_json::from_str(json).map_err(|e| EventError::Invalid(e.to_string()))
    }

    /// Read the whole reader and parse it as an event.
    ///
    /// # Errors
    /// Returns [`EventError::Read`] on I/O failure, [`EventError::Invalid`]
    /// on a malformed document.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, EventError> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|e| EventError::Read(e.to_string()))?;
        Self::from_json(&content)
    }

    /// Whether this event resolves a previous alert.
    pub fn is_resolution(&self) -> bool {
        self.action == ACTION_RESOLVE
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SAMPLE_EVENT: &str = r#"{
        "client": {"name": "web1", "address": "10.0.0.5", "subscriptions": ["base"]},
        "check": {
            "name": "disk",
            "output": "92% used",
            "issued": 1700000000,
            "command": "check_disk",
            "status": 2,
            "notification": "Disk critical",
            "interval": 60
        },
        "occurrences": 3,
        "action": "create",
        "id": "8a5b6a0e-0000-4000-8000-000000000000"
    }"#;

    pub(crate) fn sample_event() -> Event {
        Event::from_json(SAMPLE_EVENT).unwrap()
    }

    #[test]
    fn parses_full_event_ignoring_unknown_fields() {
        let event = sample_event();

        assert_eq!(event.client.name, "web1");
        assert_eq!(event.client.address, "10.0.0.5");
        assert_eq!(event.check.name, "disk");
        assert_eq!(event.check.issued, 1_700_000_000);
        assert_eq!(event.check.status, CheckStatus::Code(2));
        assert_eq!(event.occurrences, 3);
        assert_eq!(event.action, "create");
    }

    #[test]
    fn status_accepts_text_values() {
        let json = SAMPLE_EVENT.replace(r#""status": 2"#, r#""status": "critical""#);
        let event = Event::from_json(&json).unwrap();

        assert_eq!(event.check.status, CheckStatus::Text("critical".to_string()));
        assert_eq!(event.check.status.to_string(), "critical");
    }

    #[test]
    fn missing_field_is_reported_at_parse_time() {
        let json = SAMPLE_EVENT.replace(r#""action": "create","#, "");
        let err = Event::from_json(&json).unwrap_err();

        match err {
            EventError::Invalid(message) => assert!(message.contains("action")),
            other => panic!("Expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn malformed_json_is_invalid() {
        assert!(matches!(
            Event::from_json("{not json"),
            Err(EventError::Invalid(_))
        ));
    }

    #[test]
    fn from_reader_parses_bytes() {
        let event = Event::from_reader(SAMPLE_EVENT.as_bytes()).unwrap();
        assert_eq!(event.check.notification, "Disk critical");
    }

    #[test]
    fn resolution_detection() {
        let mut event = sample_event();
        assert!(!event.is_resolution());

        event.action = "resolve".to_string();
        assert!(event.is_resolution());
    }
}
