//! CLI configuration -- thin wrapper around `parkvision_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--server, --token, etc.).

use std::time::Duration;

use secrecy::SecretString;

use parkvision_config::TokenStore;
use parkvision_core::{ServerConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use parkvision_config::{
    Config, KeyringTokenStore, Profile, config_path, load_config_or_default,
    save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// "a, b, c" or "(none)" for error help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    names.sort();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

/// Build a `ServerConfig` from the config file, active profile and flags.
///
/// Profile and `[defaults]` resolution is shared with library embedders via
/// [`parkvision_config::profile_to_server_config`]; flags are layered on top.
/// Without a matching profile, `--server` alone is enough; without either
/// there is nothing to connect to.
pub fn resolve_server_config(
    global: &GlobalOpts,
    config: &Config,
    store: &dyn TokenStore,
) -> Result<ServerConfig, CliError> {
    let profile_name = active_profile_name(global, config);

    let mut profile = match (config.profiles.get(&profile_name), global.server.is_some()) {
        (Some(p), _) => p.clone(),
        (None, true) => Profile::default(),
        (None, false) => {
            if global.profile.is_some() {
                return Err(CliError::ProfileNotFound {
                    name: profile_name,
                    available: available_profiles(config),
                });
            }
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };
    if let Some(ref server) = global.server {
        profile.server.clone_from(server);
    }

    let mut server =
        parkvision_config::profile_to_server_config(&profile, &config.defaults, &profile_name, store)?;

    if let Some(ref token) = global.token {
        server.token = Some(SecretString::from(token.clone()));
    }
    if global.insecure {
        server.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        server.timeout = Duration::from_secs(secs);
    }

    Ok(server)
}

/// Like [`resolve_server_config`], but a token is mandatory.
pub fn resolve_authenticated(
    global: &GlobalOpts,
    config: &Config,
    store: &dyn TokenStore,
) -> Result<ServerConfig, CliError> {
    let server = resolve_server_config(global, config, store)?;
    if server.token.is_none() {
        return Err(CliError::NoCredentials {
            profile: active_profile_name(global, config),
        });
    }
    Ok(server)
}
