//! Amazon SES transport.
//!
//! Submits mails through the SES v1 Query API (`Action=SendEmail`) with a
//! SigV4-signed form POST. One request per mail, no retries.

use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use url::Url;

use super::sigv4::{CanonicalRequest, SigningParams, amz_date};
use super::{EmailTransport, OutgoingEmail, SendReceipt};
use crate::config::{MailerConfig, SecretString};
use crate::error::ProviderError;

/// SES Query API version.
const SES_API_VERSION: &str = "2010-12-01";

/// SigV4 service name for SES.
const SES_SERVICE: &str = "ses";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

static MESSAGE_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<MessageId>([^<]*)</MessageId>").expect("pattern is valid"));
static ERROR_CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<Code>([^<]*)</Code>").expect("pattern is valid"));
static ERROR_MESSAGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<Message>([^<]*)</Message>").expect("pattern is valid"));

/// SES transport built from the mailer settings.
pub struct SesTransport {
    client: reqwest::Client,
    endpoint: Url,
    host: String,
    region: String,
    access_key: String,
    secret_key: SecretString,
}

impl SesTransport {
    /// Create a transport using a shared HTTP client.
    ///
    /// The client's own timeout should exceed the dispatch budget so that
    /// the dispatcher's deadline is the one that fires.
    pub fn new(config: &MailerConfig, client: reqwest::Client) -> Self {
        let host = match (config.endpoint.host_str(), config.endpoint.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            // MailerConfig guarantees a host.
            (None, _) => String::new(),
        };

        Self {
            client,
            endpoint: config.endpoint.clone(),
            host,
            region: config.region.clone(),
            access_key: config.aws_access_key.clone(),
            secret_key: config.aws_secret_key.clone(),
        }
    }

    /// Form-encoded `SendEmail` request body.
    pub fn encode_send_email(email: &OutgoingEmail) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("Action", "SendEmail")
            .append_pair("Version", SES_API_VERSION)
            .append_pair("Source", &email.from)
            .append_pair("Destination.ToAddresses.member.1", &email.to)
            .append_pair("Message.Subject.Data", &email.subject)
            .append_pair("Message.Subject.Charset", "UTF-8")
            .append_pair("Message.Body.Text.Data", &email.text_body)
            .append_pair("Message.Body.Text.Charset", "UTF-8")
            .finish()
    }

    fn authorization(&self, time: DateTime<Utc>, body: &str) -> Result<String, ProviderError> {
        let date = amz_date(time);
        let headers = [
            ("content-type", FORM_CONTENT_TYPE),
            ("host", self.host.as_str()),
            ("x-amz-date", date.as_str()),
        ];

        CanonicalRequest {
            method: "POST",
            path: self.endpoint.path(),
            query: "",
            headers: &headers,
            payload: body.as_bytes(),
        }
        .authorization(&SigningParams {
            access_key: &self.access_key,
            secret_key: self.secret_key.expose(),
            region: &self.region,
            service: SES_SERVICE,
            time,
        })
    }
}

fn capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Build a [`ProviderError::Rejected`] from an SES `<ErrorResponse>` body.
pub fn parse_error_response(status: u16, body: &str) -> ProviderError {
    ProviderError::Rejected {
        status,
        code: capture(&ERROR_CODE_PATTERN, body).unwrap_or_else(|| "Unknown".to_string()),
        message: capture(&ERROR_MESSAGE_PATTERN, body)
            .unwrap_or_else(|| body.trim().to_string()),
    }
}

#[async_trait]
impl EmailTransport for SesTransport {
    fn transport_type(&self) -> &str {
        "ses"
    }

    async fn send_email(&self, email: &OutgoingEmail) -> Result<SendReceipt, ProviderError> {
        let body = Self::encode_send_email(email);
        // x-amz-date and the signature scope must come from one instant.
        let now = Utc::now();
        let authorization = self.authorization(now, &body)?;

        let authorization = HeaderValue::from_str(&authorization)
            .map_err(|e| ProviderError::Signing(e.to_string()))?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header("x-amz-date", amz_date(now))
            .header(AUTHORIZATION, authorization)
            .body(body)
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        if status.is_success() {
            Ok(SendReceipt {
                message_id: capture(&MESSAGE_ID_PATTERN, &text),
            })
        } else {
            Err(parse_error_response(status.as_u16(), &text))
        }
    }
}

impl std::fmt::Debug for SesTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SesTransport")
            .field("endpoint", &self.endpoint.as_str())
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .finish_non_exhaustive()
    }
}
