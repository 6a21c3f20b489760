// User administration endpoints (`/auth/users`).

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::ParkClient;
use crate::error::Error;
use crate::types::{UserRecord, UserUpdate};

impl ParkClient {
    /// `GET /auth/users`
    pub async fn list_users(&self) -> Result<Vec<UserRecord>, Error> {
        self.get("auth/users").await
    }

    /// `GET /auth/users/{id}`
    pub async fn get_user(&self, user_id: i64) -> Result<UserRecord, Error> {
        self.get(&format!("auth/users/{user_id}")).await
    }

    /// Update username, email and/or password.
    ///
    /// `PUT /auth/users/{id}` -- only the fields that are set are sent.
    pub async fn update_user(
        &self,
        user_id: i64,
        update: &UserUpdate,
        password: Option<&SecretString>,
    ) -> Result<UserRecord, Error> {
        debug!(user_id, password_change = password.is_some(), "updating user");
        let mut body = match serde_json::to_value(update) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        };
        if let Some(pw) = password {
            body.insert(
                "password".into(),
                serde_json::Value::String(pw.expose_secret().to_owned()),
            );
        }
        self.put(
            &format!("auth/users/{user_id}"),
            &serde_json::Value::Object(body),
        )
        .await
    }

    /// `DELETE /auth/users/{id}`
    pub async fn delete_user(&self, user_id: i64) -> Result<(), Error> {
        debug!(user_id, "deleting user");
        self.delete(&format!("auth/users/{user_id}")).await
    }
}
