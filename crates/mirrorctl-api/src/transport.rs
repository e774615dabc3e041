// Shared transport configuration for building the reqwest::Client.
//
// Timeout, TLS leniency and the optional API key header live here so
// the client module only deals with URLs and envelopes.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// Shared transport configuration for building HTTP clients.
///
/// The default has no request timeout: a call waits for as long as the
/// mirror takes to answer.
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    pub timeout: Option<Duration>,
    /// Accept self-signed certificates (mirrors behind a local TLS proxy).
    pub danger_accept_invalid_certs: bool,
    /// MMM-Remote-Control `apiKey`, sent as `Authorization: apiKey <key>`.
    pub api_key: Option<SecretString>,
}

impl TransportConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_api_key(mut self, key: SecretString) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("mirrorctl/", env!("CARGO_PKG_VERSION")))
            .default_headers(self.default_headers()?);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if self.danger_accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        builder
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {e}")))
    }

    fn default_headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        if let Some(ref key) = self.api_key {
            let mut value = HeaderValue::from_str(&format!("apiKey {}", key.expose_secret()))
                .map_err(|_| Error::Configuration("API key contains invalid characters".into()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_becomes_sensitive_authorization_header() {
        let config = TransportConfig::default().with_api_key(SecretString::from("s3cret"));
        let headers = config.default_headers().expect("headers");
        let value = headers.get(AUTHORIZATION).expect("authorization header");
        assert_eq!(value.to_str().expect("ascii"), "apiKey s3cret");
        assert!(value.is_sensitive());
    }

    #[test]
    fn no_api_key_means_no_headers() {
        let headers = TransportConfig::default().default_headers().expect("headers");
        assert!(headers.is_empty());
    }

    #[test]
    fn newline_in_api_key_is_rejected() {
        let config = TransportConfig::default().with_api_key(SecretString::from("bad\nkey"));
        assert!(matches!(config.build_client(), Err(Error::Configuration(_))));
    }
}
