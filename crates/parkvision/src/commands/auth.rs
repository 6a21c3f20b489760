//! Login / logout handlers.

use dialoguer::Input;
use secrecy::SecretString;

use parkvision_config::TokenStore;
use parkvision_core::Dashboard;

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config::{self, Profile};
use crate::error::CliError;

use super::util::prompt_err;

pub async fn login(
    args: LoginArgs,
    global: &GlobalOpts,
    store: &dyn TokenStore,
) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);

    // Token-less server config: flags, else the profile
    let mut server = config::resolve_server_config(global, &cfg, store)?;
    server.token = None;

    let username = match args
        .username
        .or_else(|| cfg.profiles.get(&profile_name).and_then(|p| p.username.clone()))
    {
        Some(u) => u,
        None => Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(prompt_err)?,
    };

    let password = match std::env::var("PARKVISION_PASSWORD") {
        Ok(pw) if !pw.is_empty() => pw,
        _ => rpassword::prompt_password("Password: ").map_err(prompt_err)?,
    };

    let dashboard = Dashboard::new(server)?;
    let token = dashboard
        .login(&username, &SecretString::from(password))
        .await?;

    store.save(&profile_name, &token)?;

    // Remember who logged in, and where, for next time
    let server_url = dashboard.config().url.to_string();
    let profile = cfg
        .profiles
        .entry(profile_name.clone())
        .or_insert_with(|| Profile {
            server: server_url.trim_end_matches('/').to_owned(),
            ..Profile::default()
        });
    profile.username = Some(username.clone());
    config::save_config(&cfg)?;

    if !global.quiet {
        eprintln!("✓ Logged in as {username} (profile '{profile_name}')");
    }
    Ok(())
}

pub fn logout(global: &GlobalOpts, store: &dyn TokenStore) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);

    store.clear(&profile_name)?;

    if !global.quiet {
        eprintln!("✓ Token removed for profile '{profile_name}'");
        if cfg
            .profiles
            .get(&profile_name)
            .is_some_and(|p| p.token.is_some())
        {
            eprintln!("  Note: a plaintext token is still set in the config file");
        }
    }
    Ok(())
}
