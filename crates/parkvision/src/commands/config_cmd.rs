//! Config subcommand handlers.

use dialoguer::Input;

use parkvision_config::{DEFAULT_SERVER, TokenStore};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

const SETTABLE_KEYS: &str = "server, username, token_env, ca_cert, insecure, timeout";

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of `cfg` safe to print: plaintext tokens are masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some("****".into());
        }
    }
    cfg
}

fn invalid(field: &str, reason: impl Into<String>) -> CliError {
    CliError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

/// Apply one `config set` assignment to a profile.
fn set_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "server" => {
            url::Url::parse(&value).map_err(|e| invalid("server", format!("invalid URL: {e}")))?;
            profile.server = value;
        }
        "username" => profile.username = Some(value),
        "token_env" | "token-env" => profile.token_env = Some(value),
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        "insecure" => {
            profile.insecure = Some(
                value
                    .parse()
                    .map_err(|_| invalid("insecure", "must be 'true' or 'false'"))?,
            );
        }
        "timeout" => {
            profile.timeout = Some(
                value
                    .parse()
                    .map_err(|_| invalid("timeout", "must be a number (seconds)"))?,
            );
        }
        "token" => {
            return Err(invalid(
                "token",
                "tokens are not written by `config set`; run `parkvision login` \
                 or point `token_env` at an environment variable",
            ));
        }
        other => {
            return Err(invalid(
                other,
                format!("unknown config key '{other}'. Valid keys: {SETTABLE_KEYS}"),
            ));
        }
    }
    Ok(())
}

fn show_detail(cfg: &Config, store: &dyn TokenStore) -> String {
    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();

    let mut lines = vec![
        format!("Config file:     {}", config::config_path().display()),
        format!(
            "Default profile: {}",
            cfg.default_profile.as_deref().unwrap_or("default")
        ),
        format!("Output:          {}", cfg.defaults.output),
        format!("Timeout:         {}s", cfg.defaults.timeout),
    ];
    for name in names {
        let Some(p) = cfg.profiles.get(name) else {
            continue;
        };
        let token = match (store.load(name), &p.token_env, &p.token) {
            (_, Some(var), _) => format!("from ${var}"),
            (Ok(Some(_)), _, _) => "keyring".to_owned(),
            (_, _, Some(_)) => "**** (plaintext)".to_owned(),
            _ => "none".to_owned(),
        };
        lines.push(String::new());
        lines.push(format!("[{name}]"));
        lines.push(format!("  server:   {}", p.server));
        lines.push(format!(
            "  username: {}",
            p.username.as_deref().unwrap_or("-")
        ));
        lines.push(format!("  token:    {token}"));
        if let Some(ref ca) = p.ca_cert {
            lines.push(format!("  ca_cert:  {}", ca.display()));
        }
        if let Some(insecure) = p.insecure {
            lines.push(format!("  insecure: {insecure}"));
        }
        if let Some(timeout) = p.timeout {
            lines.push(format!("  timeout:  {timeout}s"));
        }
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(
    args: ConfigArgs,
    global: &GlobalOpts,
    store: &dyn TokenStore,
) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("ParkVision configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let server: String = Input::new()
                .with_prompt("Backend URL")
                .default(DEFAULT_SERVER.into())
                .interact_text()
                .map_err(prompt_err)?;
            url::Url::parse(&server).map_err(|e| invalid("server", format!("invalid URL: {e}")))?;

            let username: String = Input::new()
                .with_prompt("Username (blank to skip)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(
                profile_name.clone(),
                Profile {
                    server: server.trim_end_matches('/').to_owned(),
                    username: (!username.trim().is_empty()).then(|| username.trim().to_owned()),
                    ..Profile::default()
                },
            );
            cfg.default_profile = Some(profile_name.clone());
            config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Next: parkvision login");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(
                &global.output,
                &cfg,
                |c| show_detail(c, store),
                |c| c.active_profile_name(global.profile.as_deref()),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);

            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            set_key(profile, &key, value)?;

            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Set {key} on profile '{profile_name}'");
            }
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: parkvision config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Default profile set to '{name}'");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use parkvision_config::MemoryTokenStore;

    use super::*;

    #[test]
    fn show_masks_plaintext_tokens() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "home".into(),
            Profile {
                token: Some("eyJhbGciOi".into()),
                ..Profile::default()
            },
        );
        let masked = redacted(&cfg);
        assert_eq!(masked.profiles["home"].token.as_deref(), Some("****"));
        assert_eq!(cfg.profiles["home"].token.as_deref(), Some("eyJhbGciOi"));

        let text = show_detail(&masked, &MemoryTokenStore::default());
        assert!(!text.contains("eyJhbGciOi"));
        assert!(text.contains("[home]"));
    }

    #[test]
    fn set_parses_typed_values() {
        let mut p = Profile::default();
        set_key(&mut p, "insecure", "true".into()).unwrap();
        set_key(&mut p, "timeout", "10".into()).unwrap();
        set_key(&mut p, "server", "http://10.0.0.5:8000".into()).unwrap();
        assert_eq!(p.insecure, Some(true));
        assert_eq!(p.timeout, Some(10));
        assert_eq!(p.server, "http://10.0.0.5:8000");
    }

    #[test]
    fn set_rejects_bad_values_and_keys() {
        let mut p = Profile::default();
        assert!(set_key(&mut p, "insecure", "maybe".into()).is_err());
        assert!(set_key(&mut p, "timeout", "soon".into()).is_err());
        assert!(set_key(&mut p, "server", "not a url".into()).is_err());
        assert!(set_key(&mut p, "token", "abc".into()).is_err());
        let err = set_key(&mut p, "site", "x".into()).unwrap_err();
        assert!(err.to_string().contains("unknown config key"));
    }
}
