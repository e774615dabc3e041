// Remote-control HTTP client
//
// Wraps `reqwest::Client` with URL construction and envelope parsing.
// The endpoint groups (system, modules, notify) are implemented as
// inherent methods in separate files so this module stays focused on
// transport mechanics.

use reqwest::header::ACCEPT;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::ApiResponse;
use crate::transport::TransportConfig;

/// Raw HTTP client for a mirror running MMM-Remote-Control.
///
/// One attempt per call: nothing here retries, backs off or caches.
#[derive(Debug, Clone)]
pub struct MirrorClient {
    http: reqwest::Client,
    base_url: Url,
}

impl MirrorClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the mirror root (e.g. `http://192.168.1.80:8080`). A
    /// path prefix such as `http://host/mirror/` is kept and `/api/...`
    /// is appended below it.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url)
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Result<Self, Error> {
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(format!(
                "{base_url} cannot be used as a base URL"
            )));
        }
        Ok(Self { http, base_url })
    }

    /// The mirror base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/{segments...}`.
    ///
    /// Each segment is percent-encoded on its own, so a module name or
    /// payload containing `/`, `?`, `#` or spaces stays one segment.
    ///
    /// `.` and `..` are rejected. URL normalization collapses them (and
    /// their `%2E` spellings), which would silently address a different
    /// endpoint.
    pub(crate) fn api_url(&self, segments: &[&str]) -> Result<Url, Error> {
        if let Some(dot) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(Error::InvalidUrl(format!(
                "'{dot}' cannot be sent as a path segment"
            )));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and parse the envelope.
    ///
    /// GETs carry `Accept: application/json` and no `Content-Type`.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<ApiResponse<T>, Error> {
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| Error::network(&e))?;

        Self::parse_envelope(resp).await
    }

    /// Send a POST request with JSON body and parse the envelope.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<ApiResponse<T>, Error> {
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| Error::network(&e))?;

        Self::parse_envelope(resp).await
    }

    /// Map non-2xx to `Error::Http`, otherwise decode the envelope.
    ///
    /// `success: false` is returned as-is; callers decide whether that
    /// is an error via `ApiResponse::into_result`.
    async fn parse_envelope<T: DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<ApiResponse<T>, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::network(&e))?;

        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                message: format!(
                    "API request failed: {}",
                    status.canonical_reason().unwrap_or("Unknown Status")
                ),
                body: serde_json::from_str(&body).ok(),
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> MirrorClient {
        MirrorClient::with_client(reqwest::Client::new(), Url::parse(base).expect("url"))
            .expect("client")
    }

    #[test]
    fn api_url_appends_below_base() {
        let c = client("http://192.168.1.80:8080");
        let url = c.api_url(&["module", "clock", "hide"]).expect("url");
        assert_eq!(url.as_str(), "http://192.168.1.80:8080/api/module/clock/hide");
    }

    #[test]
    fn api_url_keeps_path_prefix() {
        let c = client("http://host/mirror/");
        let url = c.api_url(&["test"]).expect("url");
        assert_eq!(url.as_str(), "http://host/mirror/api/test");
    }

    #[test]
    fn api_url_percent_encodes_each_segment() {
        let c = client("http://host:8080");
        let url = c
            .api_url(&["notification", "SHOW_ALERT", "a/b c?#"])
            .expect("url");
        assert_eq!(
            url.path(),
            "/api/notification/SHOW_ALERT/a%2Fb%20c%3F%23"
        );
    }

    #[test]
    fn api_url_rejects_dot_segments() {
        let c = client("http://host:8080");
        for dot in [".", ".."] {
            let result = c.api_url(&["command", dot]);
            assert!(matches!(result, Err(Error::InvalidUrl(_))), "{dot}");
        }
        let url = c.api_url(&["command", "...", ".hidden"]).expect("url");
        assert_eq!(url.path(), "/api/command/.../.hidden");
    }

    #[test]
    fn rejects_non_base_url() {
        let result = MirrorClient::with_client(
            reqwest::Client::new(),
            Url::parse("mailto:mirror@example.com").expect("url"),
        );
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
