//! OAuth 2.0 authorization-code flow and access-token refresh.
//!
//! The browser step is manual: [`OAuthClient::authorization_url`] produces
//! the consent URL and the user pastes back the `code` parameter, which
//! [`OAuthClient::exchange_code`] trades for a token.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use godo_config::GoogleConfig;
use godo_store::{OAuthToken, TokenStore};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::error::RemoteError;

/// Refresh this many seconds before the recorded expiry.
pub const EXPIRY_BUFFER_SECS: i64 = 60;

/// Read/write access to the user's tasks.
pub const TASKS_SCOPE: &str = "https://www.googleapis.com/auth/tasks";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    /// Google omits the refresh token on refresh responses; keep the old one.
    fn into_token(self, now: DateTime<Utc>, previous_refresh: Option<String>) -> OAuthToken {
        OAuthToken {
            access_token: self.access_token,
            token_type: self.token_type.unwrap_or_else(|| "Bearer".to_string()),
            refresh_token: self.refresh_token.or(previous_refresh),
            expiry: self.expires_in.map(|secs| now + TimeDelta::seconds(secs)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

pub struct OAuthClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_url: String,
    auth_url: String,
    token_url: String,
}

impl OAuthClient {
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new(config: &GoogleConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent("godo/0.1")
                .timeout(Duration::from_secs(config.request_timeout_secs))
                .build()
                .expect("reqwest client should build"),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_url: config.redirect_url.clone(),
            auth_url: config.auth_url.clone(),
            token_url: config.token_url.clone(),
        }
    }

    /// Consent URL requesting offline access so a refresh token is issued.
    #[must_use]
    pub fn authorization_url(&self, state: &str) -> String {
        format!(
            "{}?{}",
            self.auth_url,
            form_body(&[
                ("access_type", "offline"),
                ("client_id", &self.client_id),
                ("redirect_uri", &self.redirect_url),
                ("response_type", "code"),
                ("scope", TASKS_SCOPE),
                ("state", state),
            ])
        )
    }

    /// Trade an authorization code for a token.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::NotAuthenticated` if the code is rejected and
    /// `RemoteError::Unavailable` on transport failure.
    pub async fn exchange_code(&self, code: &str) -> Result<OAuthToken, RemoteError> {
        let response = self
            .token_request(&[
                ("grant_type", "authorization_code"),
                ("code", code.trim()),
                ("client_id", &self.client_id),
                ("client_secret", &self.client_secret),
                ("redirect_uri", &self.redirect_url),
            ])
            .await?;
        Ok(response.into_token(Utc::now(), None))
    }

    /// Obtain a fresh access token with the refresh-token grant.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::NotAuthenticated` if the refresh token has been
    /// revoked and `RemoteError::Unavailable` on transport failure.
    pub async fn refresh(&self, refresh_token: &str) -> Result<OAuthToken, RemoteError> {
        let response = self
            .token_request(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", &self.client_id),
                ("client_secret", &self.client_secret),
            ])
            .await?;
        Ok(response.into_token(Utc::now(), Some(refresh_token.to_string())))
    }

    async fn token_request(&self, params: &[(&str, &str)]) -> Result<TokenResponse, RemoteError> {
        let resp = self
            .http
            .post(&self.token_url)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(form_body(params))
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return resp.json().await.map_err(RemoteError::from);
        }

        let body = resp.text().await.unwrap_or_default();
        if status.is_client_error() {
            return Err(RemoteError::NotAuthenticated(describe_token_error(&body)));
        }
        Err(RemoteError::Unavailable(format!(
            "token endpoint returned {}: {body}",
            status.as_u16()
        )))
    }
}

/// A refresh rejected mid-request is an authorization failure of that
/// request, reported like any other unreachable remote.
fn refresh_failure(error: RemoteError) -> RemoteError {
    match error {
        RemoteError::NotAuthenticated(reason) => {
            RemoteError::Unavailable(format!("token refresh rejected: {reason}"))
        }
        other => other,
    }
}

fn describe_token_error(body: &str) -> String {
    match serde_json::from_str::<TokenErrorResponse>(body) {
        Ok(TokenErrorResponse {
            error,
            error_description: Some(description),
        }) => format!("{error}: {description}"),
        Ok(TokenErrorResponse { error, .. }) => error,
        Err(_) => body.to_string(),
    }
}

/// `application/x-www-form-urlencoded` encoding of `params`.
fn form_body(params: &[(&str, &str)]) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Hands out a valid access token, refreshing and persisting it when it is
/// about to expire.
pub struct TokenSource {
    oauth: OAuthClient,
    store: TokenStore,
    current: Mutex<OAuthToken>,
}

impl TokenSource {
    #[must_use]
    pub fn new(oauth: OAuthClient, store: TokenStore, token: OAuthToken) -> Self {
        Self {
            oauth,
            store,
            current: Mutex::new(token),
        }
    }

    /// Load the persisted token for `config`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::NotAuthenticated` if no token is stored or the
    /// token file is unreadable.
    pub fn from_config(config: &GoogleConfig) -> Result<Self, RemoteError> {
        let store = TokenStore::new(config.token_path_buf());
        let token = store
            .load()
            .map_err(|e| RemoteError::NotAuthenticated(e.to_string()))?
            .ok_or_else(|| {
                RemoteError::NotAuthenticated(format!(
                    "no token at {}; run `godo auth login`",
                    store.path().display()
                ))
            })?;
        Ok(Self::new(OAuthClient::new(config), store, token))
    }

    /// `Authorization` header value for the next request.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Unavailable` if the token expired and cannot be
    /// refreshed, whether the refresh token is missing, revoked or the token
    /// endpoint is unreachable.
    pub async fn authorization(&self) -> Result<String, RemoteError> {
        let mut current = self.current.lock().await;
        if !current.expires_within(EXPIRY_BUFFER_SECS, Utc::now()) {
            return Ok(current.authorization());
        }

        let Some(refresh_token) = current.refresh_token.clone() else {
            return Err(RemoteError::Unavailable(
                "access token expired and no refresh token is stored; run `godo auth login`"
                    .into(),
            ));
        };
        tracing::debug!(expiry = ?current.expiry, "refreshing access token");
        let refreshed = self
            .oauth
            .refresh(&refresh_token)
            .await
            .map_err(refresh_failure)?;
        if let Err(error) = self.store.save(&refreshed) {
            tracing::warn!(%error, "failed to persist refreshed token");
        }
        *current = refreshed;
        Ok(current.authorization())
    }
}
