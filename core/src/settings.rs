//! Credentials and endpoint configuration.
//!
//! A `Settings` value is built once and shared read-only by every call made
//! through a client. The secret key is optional at construction time so a
//! client can be wired up before credentials are known; calls made without
//! it fail locally with `ApiError::Configuration`.

use std::env;
use std::fmt;

use crate::error::ApiError;

/// Environment variable holding the title (tenant) identifier.
pub const TITLE_ID_VAR: &str = "GAMESERVER_TITLE_ID";
/// Environment variable holding the shared secret.
pub const SECRET_KEY_VAR: &str = "GAMESERVER_SECRET_KEY";
/// Environment variable overriding the derived endpoint.
pub const BASE_URL_VAR: &str = "GAMESERVER_BASE_URL";

const ENDPOINT_DOMAIN: &str = "example-backend.com";

#[derive(Clone)]
pub struct Settings {
    title_id: String,
    secret_key: Option<String>,
    base_url: Option<String>,
}

impl Settings {
    pub fn new(title_id: impl Into<String>, secret_key: Option<String>) -> Self {
        Self {
            title_id: title_id.into(),
            secret_key: secret_key.filter(|key| !key.is_empty()),
            base_url: None,
        }
    }

    /// Point the client at a fixed base URL instead of the one derived from
    /// the title id. Used for local stubs and private deployments.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into().trim_end_matches('/').to_string());
        self
    }

    /// Load settings from `GAMESERVER_TITLE_ID`, `GAMESERVER_SECRET_KEY` and
    /// `GAMESERVER_BASE_URL`.
    ///
    /// # Errors
    /// Returns `ApiError::Configuration` if the title id is unset or empty.
    pub fn from_env() -> Result<Self, ApiError> {
        let title_id = env::var(TITLE_ID_VAR)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ApiError::Configuration(format!("{TITLE_ID_VAR} is not set")))?;

        let mut settings = Self::new(title_id, env::var(SECRET_KEY_VAR).ok());
        if let Ok(base_url) = env::var(BASE_URL_VAR) {
            if !base_url.trim().is_empty() {
                settings = settings.with_base_url(base_url.trim());
            }
        }
        Ok(settings)
    }

    pub fn title_id(&self) -> &str {
        &self.title_id
    }

    /// The shared secret, or `None` when it was never configured.
    pub fn secret_key(&self) -> Option<&str> {
        self.secret_key.as_deref()
    }

    /// Base URL every operation path is appended to.
    pub fn endpoint(&self) -> String {
        match &self.base_url {
            Some(url) => url.clone(),
            None => format!("https://{}.{ENDPOINT_DOMAIN}", self.title_id),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("title_id", &self.title_id)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}
