//! Settings document and the typed mailer section.

use std::path::Path;

use chrono_tz::Tz;
use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

use super::env::resolve_env_vars;
use super::secret::SecretString;
use crate::error::ConfigError;

/// Default settings file path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/sensu/config.json";

/// Default name of the settings section read by the mailer.
pub const DEFAULT_SECTION: &str = "mailer-ses";

/// Region used when none is configured and the endpoint does not name one.
pub const DEFAULT_REGION: &str = "us-east-1";

/// A whole settings document, keyed by section name.
#[derive(Debug, Clone)]
pub struct Settings {
    sections: Map<String, Value>,
}

impl Settings {
    /// Load settings from a JSON file, or YAML when the extension is
    /// `.yaml` / `.yml`.
    ///
    /// # Errors
    /// Returns [`ConfigError::LoadError`] if the file cannot be read and
    /// [`ConfigError::ParseError`] if it is not a valid document.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadError(format!("{}: {}", path.display(), e)))?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        let document: Value = if is_yaml {
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?
        } else {
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?
        };

        Self::from_value(document)
    }

    /// Build settings from an already-parsed document.
    ///
    /// # Errors
    /// Returns [`ConfigError::ParseError`] if the document is not an object.
    pub fn from_value(document: Value) -> Result<Self, ConfigError> {
        match document {
            Value::Object(sections) => Ok(Self { sections }),
            other => Err(ConfigError::ParseError(format!(
                "expected an object of settings sections, found {}",
                value_kind(&other)
            ))),
        }
    }

    /// Extract and validate one mailer section.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingSection`] when the section is absent,
    /// [`ConfigError::InvalidSection`] when it fails validation, and
    /// [`ConfigError::UndefinedEnvVar`] when a `${VAR}` reference is unset.
    pub fn section(&self, name: &str) -> Result<MailerConfig, ConfigError> {
        let value = self
            .sections
            .get(name)
            .ok_or_else(|| ConfigError::MissingSection(name.to_string()))?;

        let raw = RawMailerConfig::deserialize(value).map_err(|e| ConfigError::InvalidSection {
            section: name.to_string(),
            message: e.to_string(),
        })?;

        raw.compile(name)
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Mailer section as written in the settings file.
#[derive(Deserialize)]
struct RawMailerConfig {
    mail_to: String,
    mail_from: String,
    aws_access_key: String,
    aws_secret_key: SecretString,
    aws_ses_endpoint: String,
    #[serde(default)]
    aws_region: Option<String>,
    #[serde(default)]
    subject_prefix: Option<String>,
    #[serde(default)]
    timestamp_timezone: Option<String>,
}

impl RawMailerConfig {
    fn compile(self, section: &str) -> Result<MailerConfig, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidSection {
            section: section.to_string(),
            message,
        };

        let mail_to = resolve_env_vars(&self.mail_to)?;
        let mail_from = resolve_env_vars(&self.mail_from)?;
        let aws_access_key = resolve_env_vars(&self.aws_access_key)?;
        let aws_secret_key = SecretString::new(resolve_env_vars(self.aws_secret_key.expose())?);
        let endpoint_raw = resolve_env_vars(&self.aws_ses_endpoint)?;

        if mail_to.trim().is_empty() {
            return Err(invalid("mail_to must not be empty".to_string()));
        }
        if mail_from.trim().is_empty() {
            return Err(invalid("mail_from must not be empty".to_string()));
        }

        let endpoint = parse_endpoint(&endpoint_raw)
            .map_err(|e| invalid(format!("aws_ses_endpoint '{}': {}", endpoint_raw, e)))?;

        let region = match self.aws_region {
            Some(region) => resolve_env_vars(&region)?,
            None => region_from_endpoint(&endpoint).unwrap_or_else(|| DEFAULT_REGION.to_string()),
        };

        let subject_prefix = self
            .subject_prefix
            .map(|prefix| resolve_env_vars(&prefix))
            .transpose()?
            .filter(|prefix| !prefix.is_empty());

        let timezone = self
            .timestamp_timezone
            .map(|tz| {
                tz.parse::<Tz>()
                    .map_err(|_| invalid(format!("timestamp_timezone '{}' is not a valid timezone", tz)))
            })
            .transpose()?;

        Ok(MailerConfig {
            mail_to,
            mail_from,
            aws_access_key,
            aws_secret_key,
            endpoint,
            region,
            subject_prefix,
            timezone,
        })
    }
}

/// Accepts a bare host name (`email.us-east-1.amazonaws.com`) or a full URL.
fn parse_endpoint(raw: &str) -> Result<Url, String> {
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };

    let url = Url::parse(&candidate).map_err(|e| e.to_string())?;
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme '{}'", other)),
    }
}

/// `email.<region>.amazonaws.com` and `email-smtp.<region>.amazonaws.com`.
fn region_from_endpoint(endpoint: &Url) -> Option<String> {
    let host = endpoint.host_str()?;
    let labels: Vec<&str> = host.split('.').collect();
    match labels.as_slice() {
        [service, region, "amazonaws", "com"] if service.starts_with("email") => {
            Some((*region).to_string())
        }
        _ => None,
    }
}

/// Validated mailer settings for one invocation.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub mail_to: String,
    pub mail_from: String,
    pub aws_access_key: String,
    pub aws_secret_key: SecretString,
    pub endpoint: Url,
    pub region: String,
    /// `None` when absent, null or empty in the settings file.
    pub subject_prefix: Option<String>,
    /// `None` renders timestamps in local system time.
    pub timezone: Option<Tz>,
}
