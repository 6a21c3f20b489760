// ── Runtime connection configuration ──
//
// These types describe how to reach a ParkVision backend. They carry the
// bearer token and connection tuning but never touch disk: the CLI builds a
// `ServerConfig` from its profile and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use parkvision_api::{TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs on a lab backend).
    DangerAcceptInvalid,
}

/// Configuration for talking to a single backend.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Backend root, e.g. `http://localhost:8000`.
    pub url: Url,
    /// Bearer token from a previous login. `None` only allows login.
    pub token: Option<SecretString>,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ServerConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            token: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
