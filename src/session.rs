use std::sync::Arc;

use tracing::{info, warn};

use crate::error::AppError;
use crate::storage::LocalStore;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const USERNAME_KEY: &str = "ezygo_username";
pub const PASSWORD_KEY: &str = "ezygo_password";

/// Stored login used to silently re-authenticate.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Holder of the bearer token and the credentials used to refresh it.
///
/// Token, username and password are always written and cleared together
/// through a single [`LocalStore`] batch.
#[derive(Debug, Clone)]
pub struct SessionStore {
    store: Arc<LocalStore>,
}

impl SessionStore {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self { store }
    }

    pub fn save(&self, token: &str, username: &str, password: &str) -> Result<(), AppError> {
        self.store.set_all(&[
            (ACCESS_TOKEN_KEY, token),
            (USERNAME_KEY, username),
            (PASSWORD_KEY, password),
        ])?;
        info!("session saved for {}", username);
        Ok(())
    }

    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn credentials(&self) -> Option<Credentials> {
        let username = self.store.get(USERNAME_KEY).filter(|u| !u.is_empty())?;
        let password = self.store.get(PASSWORD_KEY).filter(|p| !p.is_empty())?;
        Some(Credentials { username, password })
    }

    pub fn clear(&self) -> Result<(), AppError> {
        self.store
            .remove_all(&[ACCESS_TOKEN_KEY, USERNAME_KEY, PASSWORD_KEY])
    }

    /// Clears the session, logging instead of failing.
    pub fn logout(&self) {
        match self.clear() {
            Ok(()) => info!("session cleared"),
            Err(e) => warn!("failed to clear stored session: {}", e),
        }
    }
}
