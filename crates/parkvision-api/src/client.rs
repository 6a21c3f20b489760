// HTTP client for the ParkVision backend
//
// Wraps `reqwest::Client` with base-URL joining, bearer-token injection and
// FastAPI-style error decoding. Endpoint groups (auth, lots, spots, users)
// are implemented as inherent methods in their own modules to keep this one
// focused on transport mechanics.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// FastAPI reports failures as `{"detail": "..."}`; validation failures
/// carry a list of objects instead of a string.
#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Async client for the parking backend's JSON REST API.
///
/// Every request carries `Authorization: Bearer <token>` when the client was
/// built with a token. Login and registration work without one.
pub struct ParkClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ParkClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `base_url`, optionally authenticated.
    ///
    /// The token is injected as a sensitive default header so it never
    /// shows up in debug output of the request builder.
    pub fn new(
        base_url: &str,
        token: Option<&SecretString>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| Error::Authentication {
                    message: format!("invalid token header value: {e}"),
                })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = transport.build_client_with_headers(headers)?;
        Self::with_client(base_url, http)
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    ///
    /// Lets embedders share one connection pool across several clients.
    pub fn with_client(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// The backend root every endpoint path is joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Ensure the base path ends in `/` so relative joins keep any prefix
    /// (e.g. `https://host/api` + `lots/` = `https://host/api/lots/`).
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative endpoint path (e.g. `"lots/3/status"`) onto the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        Self::handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let body = resp.text().await?;
        trace!(status = status.as_u16(), len = body.len(), "response body received");

        // 204 and empty 200s decode as JSON `null` so `()`/`Option<T>` work.
        let body = if body.trim().is_empty() {
            "null".to_owned()
        } else {
            body
        };

        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::Unauthorized;
        }

        let raw = resp.text().await.unwrap_or_default();
        let detail = extract_detail(&raw).unwrap_or_else(|| {
            if raw.is_empty() {
                status.to_string()
            } else {
                raw.chars().take(200).collect()
            }
        });

        if status == reqwest::StatusCode::NOT_FOUND {
            Error::NotFound { detail }
        } else {
            Error::Api {
                status: status.as_u16(),
                detail,
            }
        }
    }
}

/// Pull a human-readable message out of a FastAPI error body.
fn extract_detail(raw: &str) -> Option<String> {
    let parsed: ErrorResponse = serde_json::from_str(raw).ok()?;
    match parsed.detail? {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Array(items) => {
            let msgs: Vec<String> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
                .map(str::to_owned)
                .collect();
            if msgs.is_empty() {
                None
            } else {
                Some(msgs.join("; "))
            }
        }
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn base_url_keeps_path_prefix() {
        let client = ParkClient::with_client("https://host/api", reqwest::Client::new()).unwrap();
        assert_eq!(client.base_url().as_str(), "https://host/api/");
        assert_eq!(
            client.url("lots/7/status").unwrap().as_str(),
            "https://host/api/lots/7/status"
        );
    }

    #[test]
    fn leading_slash_does_not_escape_prefix() {
        let client = ParkClient::with_client("http://localhost:8000/", reqwest::Client::new())
            .unwrap();
        assert_eq!(
            client.url("/lots/").unwrap().as_str(),
            "http://localhost:8000/lots/"
        );
    }

    #[test]
    fn detail_string_is_extracted() {
        let raw = r#"{"detail":"Parking lot not found"}"#;
        assert_eq!(extract_detail(raw).as_deref(), Some("Parking lot not found"));
    }

    #[test]
    fn validation_detail_list_is_joined() {
        let raw = r#"{"detail":[{"loc":["body","name"],"msg":"field required"},{"msg":"value is not a valid integer"}]}"#;
        assert_eq!(
            extract_detail(raw).as_deref(),
            Some("field required; value is not a valid integer")
        );
    }

    #[test]
    fn non_json_body_has_no_detail() {
        assert!(extract_detail("Internal Server Error").is_none());
    }
}
