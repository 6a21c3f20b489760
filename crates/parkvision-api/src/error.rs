use thiserror::Error;

/// Top-level error type for the `parkvision-api` crate.
///
/// Covers authentication, transport, HTTP status and decoding failures.
/// `parkvision-core` maps these into user-facing domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected or the server answered without issuing a token.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The bearer token was missing, expired or revoked (HTTP 401).
    #[error("Unauthorized -- log in again")]
    Unauthorized,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Backend ─────────────────────────────────────────────────────
    /// The requested resource does not exist (HTTP 404).
    #[error("Not found: {detail}")]
    NotFound { detail: String },

    /// Any other non-success response. `detail` is the backend's
    /// `{"detail": ...}` message when one was sent.
    #[error("API error (HTTP {status}): {detail}")]
    Api { status: u16, detail: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if re-authenticating might resolve this error.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::Authentication { .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// The HTTP status code behind this error, if there was a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::NotFound { .. } => Some(404),
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
