//! Bearer token sources.
//!
//! The provisioner only sees [`TokenCredential`]; how a token is obtained is
//! the credential's business. Two implementations are provided: a pre-issued
//! token and the Entra ID client-credentials grant.

use crate::response::truncate_chars;
use crate::ERROR_TEXT_MAX_LENGTH;
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

/// Entra ID authority used when none is configured
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Cached tokens are replaced this long before they expire
const EXPIRY_MARGIN_SECS: i64 = 300;

const TOKEN_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Token issuance failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to acquire access token: {0}")]
pub struct AuthError(String);

impl AuthError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// A bearer token with an optional expiry
#[derive(Clone)]
pub struct AccessToken {
    secret: String,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    pub fn new(secret: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            secret: secret.into(),
            expires_at,
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// True once `now + margin` has reached the expiry. Tokens without an
    /// expiry never expire.
    pub fn expires_within(&self, now: DateTime<Utc>, margin: ChronoDuration) -> bool {
        self.expires_at.is_some_and(|at| now + margin >= at)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Anything that can issue a bearer token for a scope
#[async_trait]
pub trait TokenCredential: Send + Sync {
    async fn acquire_token(&self, scope: &str) -> Result<AccessToken, AuthError>;
}

/// A token issued elsewhere, e.g. by a pipeline step
#[derive(Debug, Clone)]
pub struct StaticTokenCredential {
    token: AccessToken,
}

impl StaticTokenCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: AccessToken::new(token, None),
        }
    }

    pub fn with_expiry(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: AccessToken::new(token, Some(expires_at)),
        }
    }
}

#[async_trait]
impl TokenCredential for StaticTokenCredential {
    async fn acquire_token(&self, _scope: &str) -> Result<AccessToken, AuthError> {
        if self.token.secret().trim().is_empty() {
            return Err(AuthError::new("no access token configured"));
        }
        if self.token.expires_within(Utc::now(), ChronoDuration::zero()) {
            return Err(AuthError::new("the supplied access token has expired"));
        }
        Ok(self.token.clone())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct TokenErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Entra ID client-credentials grant for a service principal.
///
/// The last token is reused for the same scope until five minutes before it
/// expires.
pub struct ClientSecretCredential {
    tenant_id: String,
    client_id: String,
    client_secret: String,
    authority_host: String,
    http: reqwest::Client,
    cached: Mutex<Option<(String, AccessToken)>>,
}

impl ClientSecretCredential {
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            authority_host: DEFAULT_AUTHORITY_HOST.to_string(),
            http: reqwest::Client::new(),
            cached: Mutex::new(None),
        }
    }

    pub fn with_authority_host(mut self, authority_host: impl Into<String>) -> Self {
        self.authority_host = authority_host.into();
        self
    }

    pub fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_host.trim_end_matches('/'),
            self.tenant_id
        )
    }

    async fn request_token(&self, scope: &str) -> Result<AccessToken, AuthError> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", scope),
        ];

        let response = self
            .http
            .post(self.token_url())
            .form(&form)
            .timeout(TOKEN_REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| AuthError::new(format!("token request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::new(format!("failed to read token response: {e}")))?;

        if !status.is_success() {
            let parsed: TokenErrorResponse = serde_json::from_str(&body).unwrap_or_default();
            let detail = match (parsed.error, parsed.error_description) {
                (_, Some(description)) => description,
                (Some(code), None) => code,
                (None, None) => body,
            };
            return Err(AuthError::new(format!(
                "token endpoint returned {}: {}",
                status.as_u16(),
                truncate_chars(&detail, ERROR_TEXT_MAX_LENGTH)
            )));
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| AuthError::new(format!("invalid token response: {e}")))?;
        if token.access_token.is_empty() {
            return Err(AuthError::new("token response contained an empty access_token"));
        }

        let expires_at = match token.expires_in {
            Some(secs) => Some(
                ChronoDuration::try_seconds(secs)
                    .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
                    .ok_or_else(|| AuthError::new("token response expires_in out of range"))?,
            ),
            None => None,
        };
        Ok(AccessToken::new(token.access_token, expires_at))
    }
}

#[async_trait]
impl TokenCredential for ClientSecretCredential {
    async fn acquire_token(&self, scope: &str) -> Result<AccessToken, AuthError> {
        if [&self.tenant_id, &self.client_id, &self.client_secret]
            .iter()
            .any(|value| value.trim().is_empty())
        {
            return Err(AuthError::new(
                "tenant ID, client ID and client secret are all required",
            ));
        }

        let mut cached = self.cached.lock().await;
        if let Some((cached_scope, token)) = cached.as_ref() {
            let margin = ChronoDuration::seconds(EXPIRY_MARGIN_SECS);
            if cached_scope == scope && !token.expires_within(Utc::now(), margin) {
                return Ok(token.clone());
            }
        }

        debug!(tenant_id = %self.tenant_id, client_id = %self.client_id, "Requesting Fabric access token");
        let token = self.request_token(scope).await?;
        *cached = Some((scope.to_string(), token.clone()));
        Ok(token)
    }
}

impl fmt::Debug for ClientSecretCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSecretCredential")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("authority_host", &self.authority_host)
            .finish()
    }
}
