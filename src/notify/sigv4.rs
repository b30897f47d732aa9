//! AWS Signature Version 4 request signing.
//!
//! Only what the SES Query API needs: a single path, an already-canonical
//! query string and a small set of signed headers.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::error::ProviderError;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Credentials and scope for one signature.
#[derive(Clone, Copy)]
pub struct SigningParams<'a> {
    pub access_key: &'a str,
    pub secret_key: &'a str,
    pub region: &'a str,
    pub service: &'a str,
    pub time: DateTime<Utc>,
}

/// Parts of the HTTP request covered by the signature.
///
/// `headers` need not be sorted; names are lowercased and values trimmed
/// during canonicalisation. `host` and `x-amz-date` must be included.
pub struct CanonicalRequest<'a> {
    pub method: &'a str,
    pub path: &'a str,
    pub query: &'a str,
    pub headers: &'a [(&'a str, &'a str)],
    pub payload: &'a [u8],
}

/// `x-amz-date` value for a timestamp, e.g. `20150830T123600Z`.
pub fn amz_date(time: DateTime<Utc>) -> String {
    time.format("%Y%m%dT%H%M%SZ").to_string()
}

fn short_date(time: DateTime<Utc>) -> String {
    time.format("%Y%m%d").to_string()
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac(key: &[u8], data: &[u8]) -> Result<Vec<u8>, ProviderError> {
    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|e| ProviderError::Signing(e.to_string()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Derive the scoped signing key.
pub fn signing_key(
    secret_key: &str,
    date: &str,
    region: &str,
    service: &str,
) -> Result<Vec<u8>, ProviderError> {
    let k_date = hmac(format!("AWS4{}", secret_key).as_bytes(), date.as_bytes())?;
    let k_region = hmac(&k_date, region.as_bytes())?;
    let k_service = hmac(&k_region, service.as_bytes())?;
    hmac(&k_service, b"aws4_request")
}

impl CanonicalRequest<'_> {
    /// Sorted `name;name;...` list of signed header names.
    fn signed_headers(&self) -> String {
        let mut names: Vec<String> = self
            .headers
            .iter()
            .map(|(name, _)| name.to_ascii_lowercase())
            .collect();
        names.sort();
        names.join(";")
    }

    fn canonical_headers(&self) -> String {
        let mut headers: Vec<(String, &str)> = self
            .headers
            .iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value.trim()))
            .collect();
        headers.sort_by(|a, b| a.0.cmp(&b.0));
        headers
            .iter()
            .map(|(name, value)| format!("{}:{}\n", name, value))
            .collect()
    }

    /// The canonical request string defined by SigV4.
    pub fn to_canonical_string(&self) -> String {
        format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            self.method,
            self.path,
            self.query,
            self.canonical_headers(),
            self.signed_headers(),
            sha256_hex(self.payload)
        )
    }

    /// Compute the `Authorization` header value.
    pub fn authorization(&self, params: &SigningParams<'_>) -> Result<String, ProviderError> {
        let date = short_date(params.time);
        let scope = format!(
            "{}/{}/{}/aws4_request",
            date, params.region, params.service
        );

        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            amz_date(params.time),
            scope,
            sha256_hex(self.to_canonical_string().as_bytes())
        );

        let key = signing_key(params.secret_key, &date, params.region, params.service)?;
        let signature = hex::encode(hmac(&key, string_to_sign.as_bytes())?);

        Ok(format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM,
            params.access_key,
            scope,
            self.signed_headers(),
            signature
        ))
    }
}
