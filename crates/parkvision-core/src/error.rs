// ── Core error types ──
//
// User-facing errors from parkvision-core. Consumers never match on HTTP
// status codes or JSON decode failures directly: the `From<parkvision_api::Error>`
// impl translates transport-layer errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Backend request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn not_found(entity_type: &str, identifier: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_owned(),
            identifier: identifier.to_string(),
        }
    }

    /// Re-label a generic 404 with the entity that was being looked up.
    pub(crate) fn for_entity(self, entity_type: &str, identifier: impl ToString) -> Self {
        match self {
            Self::NotFound { .. } => Self::not_found(entity_type, identifier),
            other => other,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<parkvision_api::Error> for CoreError {
    fn from(err: parkvision_api::Error) -> Self {
        use parkvision_api::Error as ApiError;

        match err {
            ApiError::Authentication { message } => CoreError::AuthenticationFailed { message },
            ApiError::Unauthorized => CoreError::AuthenticationFailed {
                message: "Token missing or expired -- run `parkvision login`".into(),
            },
            ApiError::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            ApiError::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            ApiError::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            ApiError::NotFound { detail } => CoreError::NotFound {
                entity_type: "Resource".into(),
                identifier: detail,
            },
            ApiError::Api { status, detail } => CoreError::Api {
                message: detail,
                status: Some(status),
            },
            ApiError::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_becomes_authentication_failure() {
        let err = CoreError::from(parkvision_api::Error::Unauthorized);
        assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
    }

    #[test]
    fn backend_detail_is_kept() {
        let err = CoreError::from(parkvision_api::Error::Api {
            status: 400,
            detail: "Username already exists".into(),
        });
        assert_eq!(err.to_string(), "API error: Username already exists");
    }

    #[test]
    fn not_found_is_relabelled_per_entity() {
        let err = CoreError::from(parkvision_api::Error::NotFound {
            detail: "Parking lot not found".into(),
        })
        .for_entity("Lot", 42);
        assert_eq!(err.to_string(), "Lot not found: 42");
    }
}
