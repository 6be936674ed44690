// Token exchange
//
// The cloud issues bearer tokens through an OAuth-style password grant.
// Tokens are cached until a minute before their advertised expiry.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tokio::time::Instant;
use tracing::debug;

use super::client::{CloudClient, preview};
use super::models::TokenResponse;
use crate::error::Error;

/// Tokens are treated as expired this long before the server says so.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// A bearer token with its local expiry deadline.
pub(crate) struct AccessToken {
    value: SecretString,
    expires_at: Instant,
}

impl AccessToken {
    fn from_response(resp: TokenResponse) -> Self {
        let lifetime = Duration::from_secs(resp.expires_in).saturating_sub(EXPIRY_MARGIN);
        Self {
            value: SecretString::from(resp.access_token),
            expires_at: Instant::now() + lifetime,
        }
    }

    fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

impl CloudClient {
    /// Ensure a valid bearer token is cached, exchanging credentials if needed.
    ///
    /// REST helpers call this implicitly; it is public so callers can verify
    /// credentials up front.
    pub async fn authenticate(&self) -> Result<(), Error> {
        self.bearer_token().await.map(drop)
    }

    /// Return the cached token, or perform a token exchange.
    pub(crate) async fn bearer_token(&self) -> Result<SecretString, Error> {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref().filter(|t| t.is_valid()) {
            return Ok(token.value.clone());
        }

        let fresh = self.request_token().await?;
        let value = fresh.value.clone();
        *guard = Some(fresh);
        Ok(value)
    }

    /// Drop the cached token so the next request re-authenticates.
    pub(crate) async fn invalidate_token(&self) {
        debug!("discarding cached bearer token");
        *self.token.lock().await = None;
    }

    /// `POST auth/token` with `grant_type=password`.
    async fn request_token(&self) -> Result<AccessToken, Error> {
        let url = self.base_url().join("auth/token")?;
        let credentials = self.credentials();
        debug!(client_id = %credentials.client_id, "requesting bearer token at {}", url);

        let resp = self
            .http()
            .post(url)
            .form(&[
                ("grant_type", "password"),
                ("username", credentials.client_id.as_str()),
                ("password", credentials.secret.expose_secret()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("token request failed (HTTP {status}): {}", preview(&body)),
            });
        }

        let body = resp.text().await?;
        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| Error::Authentication {
                message: format!("malformed token response: {e}"),
            })?;

        debug!(expires_in = parsed.expires_in, "bearer token issued");
        Ok(AccessToken::from_response(parsed))
    }
}
