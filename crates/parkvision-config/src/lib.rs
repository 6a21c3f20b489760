//! Shared configuration for ParkVision tools.
//!
//! TOML profiles, bearer-token resolution (env var, keyring, plaintext),
//! and translation to `parkvision_core::ServerConfig`. The CLI adds
//! flag-aware wrappers on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use parkvision_core::{ServerConfig, TlsVerification};

/// Backend used when a profile does not name one.
pub const DEFAULT_SERVER: &str = "http://localhost:8000";

/// Keyring service name shared by every profile.
pub const KEYRING_SERVICE: &str = "parkvision";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no token for profile '{profile}' -- run `parkvision login`")]
    NoCredentials { profile: String },

    #[error("unknown profile '{name}'")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("credential store error: {0}")]
    Keyring(#[from] keyring::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Profile to use: the requested one, else `default_profile`, else `"default"`.
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .or(self.default_profile.as_deref())
            .unwrap_or("default")
            .to_owned()
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_server() -> String {
    DEFAULT_SERVER.into()
}

/// A named backend profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Backend base URL (e.g., "http://localhost:8000").
    #[serde(default = "default_server")]
    pub server: String,

    /// Username last used to log in.
    pub username: Option<String>,

    /// Bearer token (plaintext -- prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the token.
    pub token_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            server: default_server(),
            username: None,
            token: None,
            token_env: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "parkvision", "parkvision").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("parkvision");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. A missing file yields the defaults.
///
/// `PARKVISION_`-prefixed variables override file values; `__` separates
/// nesting levels (`PARKVISION_DEFAULTS__TIMEOUT=60`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("PARKVISION_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it cannot be read.
pub fn load_config_or_default() -> Config {
    load_config_or_default_from(&config_path())
}

fn load_config_or_default_from(path: &Path) -> Config {
    load_config_from(path).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
        Config::default()
    })
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    debug!(path = %path.display(), "config saved");
    Ok(())
}

// ── Token store ─────────────────────────────────────────────────────

/// Persistent home for a profile's bearer token.
pub trait TokenStore: Send + Sync {
    fn load(&self, profile: &str) -> Result<Option<SecretString>, ConfigError>;
    fn save(&self, profile: &str, token: &SecretString) -> Result<(), ConfigError>;
    fn clear(&self, profile: &str) -> Result<(), ConfigError>;
}

/// OS keyring (service `parkvision`, account `{profile}/token`).
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyringTokenStore;

impl KeyringTokenStore {
    fn entry(profile: &str) -> Result<keyring::Entry, ConfigError> {
        Ok(keyring::Entry::new(
            KEYRING_SERVICE,
            &format!("{profile}/token"),
        )?)
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self, profile: &str) -> Result<Option<SecretString>, ConfigError> {
        match Self::entry(profile)?.get_password() {
            Ok(token) => Ok(Some(SecretString::from(token))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, profile: &str, token: &SecretString) -> Result<(), ConfigError> {
        Self::entry(profile)?.set_password(token.expose_secret())?;
        Ok(())
    }

    fn clear(&self, profile: &str) -> Result<(), ConfigError> {
        match Self::entry(profile)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local token store.
///
/// For embedders running where no OS keyring is available (containers,
/// CI jobs) and for tests. Tokens live only as long as the value.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<HashMap<String, String>>,
}

impl TokenStore for MemoryTokenStore {
    fn load(&self, profile: &str) -> Result<Option<SecretString>, ConfigError> {
        let tokens = self.tokens.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(tokens.get(profile).cloned().map(SecretString::from))
    }

    fn save(&self, profile: &str, token: &SecretString) -> Result<(), ConfigError> {
        let mut tokens = self.tokens.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        tokens.insert(profile.to_owned(), token.expose_secret().to_owned());
        Ok(())
    }

    fn clear(&self, profile: &str) -> Result<(), ConfigError> {
        let mut tokens = self.tokens.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        tokens.remove(profile);
        Ok(())
    }
}

// ── Token resolution (without CLI flags) ────────────────────────────

/// Resolve a profile's token: `token_env` variable, then the store, then
/// the plaintext `token` field.
pub fn resolve_token(
    profile: &Profile,
    profile_name: &str,
    store: &dyn TokenStore,
) -> Result<SecretString, ConfigError> {
    resolve_token_with(profile, profile_name, store, &|name| std::env::var(name).ok())
}

fn resolve_token_with(
    profile: &Profile,
    profile_name: &str,
    store: &dyn TokenStore,
    env: &dyn Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's token_env → env var lookup
    if let Some(ref env_name) = profile.token_env {
        if let Some(val) = env(env_name).filter(|v| !v.is_empty()) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Token store (a broken keyring falls through to plaintext)
    match store.load(profile_name) {
        Ok(Some(token)) => return Ok(token),
        Ok(None) => {}
        Err(e) => debug!(profile = profile_name, error = %e, "token store unavailable"),
    }

    // 3. Plaintext in config
    if let Some(ref token) = profile.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Build a `ServerConfig` from a profile and the global defaults.
///
/// Profile values win over `[defaults]`. A profile without a token still
/// yields a config (enough to log in). Callers layer flag overrides on top.
pub fn profile_to_server_config(
    profile: &Profile,
    defaults: &Defaults,
    profile_name: &str,
    store: &dyn TokenStore,
) -> Result<ServerConfig, ConfigError> {
    let url: url::Url = profile.server.parse().map_err(|_| ConfigError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {}", profile.server),
    })?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(ServerConfig {
        url,
        token: resolve_token(profile, profile_name, store).ok(),
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_owned())
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.timeout, 30);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.defaults.output = "json".into();
        cfg.profiles.insert(
            "prod".into(),
            Profile {
                server: "https://parking.example.com/api".into(),
                username: Some("admin".into()),
                timeout: Some(5),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.defaults.output, "json");
        assert_eq!(loaded.profiles["prod"], cfg.profiles["prod"]);
    }

    #[test]
    fn profile_server_defaults_to_localhost() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[profiles.default]\nusername = \"ops\"\n").unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.profile("default").unwrap().server, DEFAULT_SERVER);
        assert!(matches!(
            cfg.profile("staging"),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn active_profile_prefers_request() {
        let cfg = Config {
            default_profile: Some("prod".into()),
            ..Config::default()
        };
        assert_eq!(cfg.active_profile_name(Some("lab")), "lab");
        assert_eq!(cfg.active_profile_name(None), "prod");
    }

    #[test]
    fn token_chain_order() {
        let store = MemoryTokenStore::default();
        let profile = Profile {
            token: Some("plain".into()),
            token_env: Some("PV_TOKEN".into()),
            ..Profile::default()
        };
        let env_set = |name: &str| (name == "PV_TOKEN").then(|| "from-env".to_owned());
        let env_unset = |_: &str| -> Option<String> { None };

        let tok = resolve_token_with(&profile, "default", &store, &env_set).unwrap();
        assert_eq!(tok.expose_secret(), "from-env");

        let tok = resolve_token_with(&profile, "default", &store, &env_unset).unwrap();
        assert_eq!(tok.expose_secret(), "plain");

        store.save("default", &secret("stored")).unwrap();
        let tok = resolve_token_with(&profile, "default", &store, &env_unset).unwrap();
        assert_eq!(tok.expose_secret(), "stored");

        store.clear("default").unwrap();
        let bare = Profile::default();
        assert!(matches!(
            resolve_token_with(&bare, "default", &store, &env_unset),
            Err(ConfigError::NoCredentials { .. })
        ));
    }

    #[test]
    fn memory_store_backs_keyringless_embedders() {
        let store = MemoryTokenStore::default();
        store.save("lab", &secret("lab-token")).unwrap();
        let profile = Profile {
            server: "http://10.0.0.5:8000".into(),
            ..Profile::default()
        };

        let lab = profile_to_server_config(&profile, &Defaults::default(), "lab", &store).unwrap();
        assert_eq!(lab.token.unwrap().expose_secret(), "lab-token");

        let other =
            profile_to_server_config(&profile, &Defaults::default(), "prod", &store).unwrap();
        assert!(other.token.is_none());

        store.clear("lab").unwrap();
        assert!(store.load("lab").unwrap().is_none());
    }

    #[test]
    fn server_config_tls_and_timeout() {
        let store = MemoryTokenStore::default();
        store.save("lab", &secret("t")).unwrap();

        let profile = Profile {
            server: "http://10.0.0.5:8000".into(),
            insecure: Some(true),
            timeout: Some(7),
            ..Profile::default()
        };
        let cfg = profile_to_server_config(&profile, &Defaults::default(), "lab", &store).unwrap();
        assert_eq!(cfg.url.as_str(), "http://10.0.0.5:8000/");
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(cfg.timeout, Duration::from_secs(7));
        assert_eq!(cfg.token.unwrap().expose_secret(), "t");

        let strict =
            profile_to_server_config(&Profile::default(), &Defaults::default(), "none", &store)
                .unwrap();
        assert_eq!(strict.tls, TlsVerification::SystemDefaults);
        assert!(strict.token.is_none());
    }

    #[test]
    fn invalid_server_url_is_rejected() {
        let profile = Profile {
            server: "not a url".into(),
            ..Profile::default()
        };
        let err = profile_to_server_config(
            &profile,
            &Defaults::default(),
            "default",
            &MemoryTokenStore::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn defaults_fill_what_the_profile_leaves_unset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[defaults]\ntimeout = 60\ninsecure = true\n\n[profiles.default]\nserver = \"http://10.0.0.5:8000\"\n",
        )
        .unwrap();
        let cfg = load_config_from(&path).unwrap();
        let store = MemoryTokenStore::default();

        let server =
            profile_to_server_config(cfg.profile("default").unwrap(), &cfg.defaults, "default", &store)
                .unwrap();
        assert_eq!(server.timeout, Duration::from_secs(60));
        assert_eq!(server.tls, TlsVerification::DangerAcceptInvalid);

        let strict = Profile {
            insecure: Some(false),
            timeout: Some(5),
            ..cfg.profile("default").unwrap().clone()
        };
        let server = profile_to_server_config(&strict, &cfg.defaults, "default", &store).unwrap();
        assert_eq!(server.timeout, Duration::from_secs(5));
        assert_eq!(server.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[profiles.default\nserver = ").unwrap();

        assert!(load_config_from(&path).is_err());
        assert_eq!(load_config_or_default_from(&path), Config::default());
    }
}
