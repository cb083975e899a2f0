//! Google Tasks API and OAuth client configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::storage::expand_path;

fn default_token_path() -> String {
    "~/.config/godo/token.json".to_string()
}

fn default_redirect_url() -> String {
    "http://localhost:8080/callback".to_string()
}

fn default_api_base_url() -> String {
    "https://tasks.googleapis.com/tasks/v1".to_string()
}

fn default_auth_url() -> String {
    "https://accounts.google.com/o/oauth2/auth".to_string()
}

fn default_token_url() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// Default per-request timeout in seconds.
const fn default_request_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleConfig {
    /// OAuth client id from the Google Cloud console.
    #[serde(default)]
    pub client_id: String,

    /// OAuth client secret.
    #[serde(default)]
    pub client_secret: String,

    /// File holding the access/refresh token pair.
    #[serde(default = "default_token_path")]
    pub token_path: String,

    #[serde(default = "default_redirect_url")]
    pub redirect_url: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// Network timeout applied to every API and token request.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            token_path: default_token_path(),
            redirect_url: default_redirect_url(),
            api_base_url: default_api_base_url(),
            auth_url: default_auth_url(),
            token_url: default_token_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl GoogleConfig {
    /// Check if the OAuth client credentials are present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }

    #[must_use]
    pub fn token_path_buf(&self) -> PathBuf {
        expand_path(&self.token_path)
    }
}
