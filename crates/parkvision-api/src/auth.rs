// Authentication endpoints
//
// The backend issues a bearer token at `POST /auth/login`. The client never
// stores it: callers persist it (keyring) and build a new authenticated
// `ParkClient` with it.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{debug, info};

use crate::client::ParkClient;
use crate::error::Error;
use crate::types::{LoginResponse, UserRecord};

/// The result of a successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: SecretString,
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub is_admin: Option<bool>,
}

impl ParkClient {
    /// Exchange username and password for a bearer token.
    ///
    /// `POST /auth/login` with `{"username": ..., "password": ...}`
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<Session, Error> {
        debug!(username, "logging in");
        let resp: LoginResponse = self
            .post(
                "auth/login",
                &json!({
                    "username": username,
                    "password": password.expose_secret(),
                }),
            )
            .await
            .map_err(|e| match e {
                Error::Unauthorized => Error::Authentication {
                    message: "invalid username or password".into(),
                },
                other => other,
            })?;

        let token = resp
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Authentication {
                message: "server did not issue an access token".into(),
            })?;

        info!(username, "login successful");
        Ok(Session {
            token: SecretString::from(token),
            user_id: resp.id,
            username: resp.username,
            is_admin: resp.is_admin,
        })
    }

    /// Register a new user account.
    ///
    /// `POST /auth/register` with `{"username", "email", "password"}`
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<UserRecord, Error> {
        debug!(username, email, "registering user");
        self.post(
            "auth/register",
            &json!({
                "username": username,
                "email": email,
                "password": password.expose_secret(),
            }),
        )
        .await
    }
}
