//! ipinfo.io client
//!
//! One outbound GET per lookup, no retry. The global timeout is the only
//! hardening on top of the bare request.

use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::error::LookupError;
use super::types::RawIpInfo;

/// Default ipinfo.io endpoint
pub const IPINFO_API_BASE: &str = "https://ipinfo.io";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Source of raw IP information
///
/// `target` is `None` for a lookup of the caller's own address, otherwise an
/// already-validated IPv4 address.
pub trait IpInfoSource: Send + Sync {
    fn fetch(&self, target: Option<&str>) -> Result<RawIpInfo, LookupError>;
}

/// HTTP client for the ipinfo.io JSON API
pub struct IpinfoClient {
    agent: ureq::Agent,
    api_base: String,
    api_token: Option<String>,
}

impl IpinfoClient {
    /// Create a client against the public ipinfo.io endpoint
    pub fn new() -> Self {
        Self::with_options(IPINFO_API_BASE, None, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_options(api_base: &str, api_token: Option<String>, timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            agent,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_token: api_token.filter(|t| !t.is_empty()),
        }
    }

    /// Build the request URL for a lookup target
    pub fn url_for(&self, target: Option<&str>) -> String {
        match target {
            Some(ip) => format!("{}/{}/json", self.api_base, ip),
            None => format!("{}/json", self.api_base),
        }
    }
}

impl Default for IpinfoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl IpInfoSource for IpinfoClient {
    fn fetch(&self, target: Option<&str>) -> Result<RawIpInfo, LookupError> {
        let url = self.url_for(target);
        debug!("requesting {}", url);

        let mut request = self.agent.get(&url);
        if let Some(token) = &self.api_token {
            request = request.query("token", token);
        }

        let mut response = request.call().map_err(|e| match e {
            ureq::Error::StatusCode(code) => {
                LookupError::Network(format!("lookup service returned status {}", code))
            }
            other => LookupError::Network(other.to_string()),
        })?;

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| LookupError::Network(format!("failed to read response body: {}", e)))?;

        decode_body(&body)
    }
}

/// Decode a response body into a raw record
///
/// The body must be a JSON object; anything else is a decode error.
pub fn decode_body(body: &str) -> Result<RawIpInfo, LookupError> {
    let value: Value = serde_json::from_str(body).map_err(|e| LookupError::Decode(e.to_string()))?;
    if !value.is_object() {
        return Err(LookupError::Decode(
            "expected a JSON object from the lookup service".to_string(),
        ));
    }
    serde_json::from_value(value).map_err(|e| LookupError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for() {
        let client = IpinfoClient::with_options("https://ipinfo.io/", None, Duration::from_secs(1));
        assert_eq!(client.url_for(None), "https://ipinfo.io/json");
        assert_eq!(client.url_for(Some("8.8.8.8")), "https://ipinfo.io/8.8.8.8/json");
    }

    #[test]
    fn test_empty_token_is_ignored() {
        let client = IpinfoClient::with_options(
            IPINFO_API_BASE,
            Some(String::new()),
            Duration::from_secs(1),
        );
        assert!(client.api_token.is_none());
    }

    #[test]
    fn test_decode_body() {
        let raw = decode_body(
            r#"{"ip":"8.8.8.8","hostname":"dns.google","city":"Mountain View","region":"California","country":"US","loc":"37.4056,-122.0775","org":"AS15169 Google LLC","postal":"94043","timezone":"America/Los_Angeles","anycast":true}"#,
        )
        .unwrap();
        assert_eq!(raw.hostname.as_deref(), Some("dns.google"));
        assert_eq!(raw.anycast, Some(true));
        assert!(raw.extra.is_empty());
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(decode_body("<html>"), Err(LookupError::Decode(_))));
        assert!(matches!(decode_body("[1,2]"), Err(LookupError::Decode(_))));
        assert!(matches!(decode_body(r#"{"ip": 5}"#), Err(LookupError::Decode(_))));
    }

    #[test]
    fn test_decode_accepts_any_subrecord_shape() {
        let raw = decode_body(
            r#"{"ip":"1.1.1.1","privacy":{"vpn":false,"risk_score":12.5},"asn":"AS13335"}"#,
        )
        .unwrap();
        assert_eq!(raw.privacy.unwrap()["risk_score"], 12.5);
        assert_eq!(raw.asn, Some(Value::String("AS13335".to_string())));
    }

    #[test]
    #[ignore = "requires network access"]
    fn test_fetch_public_ip() {
        let client = IpinfoClient::new();
        let raw = client.fetch(None).unwrap();
        dbg!(raw);
    }
}
