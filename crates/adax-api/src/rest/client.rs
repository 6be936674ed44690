// Adax REST API HTTP client
//
// Wraps `reqwest::Client` with bearer-token injection, status mapping and
// typed response decoding. Endpoint groups (rooms, energy) are implemented
// as inherent methods in separate files to keep this module focused on
// transport mechanics.

use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, trace};
use url::Url;

use super::auth::AccessToken;
use crate::auth::Credentials;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Retry hint used when a 429 carries no usable `Retry-After` header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Raw HTTP client for the Adax cloud.
///
/// Owns the credentials and the cached bearer token. Callers never see the
/// token: every REST helper authenticates on demand and attaches it.
pub struct CloudClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
    /// Cached bearer token. The async lock is held across the token
    /// exchange so concurrent callers share one request.
    pub(super) token: Mutex<Option<AccessToken>>,
}

impl std::fmt::Debug for CloudClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudClient")
            .field("base_url", &self.base_url.as_str())
            .field("client_id", &self.credentials.client_id)
            .finish_non_exhaustive()
    }
}

impl CloudClient {
    /// Create a client from credentials and a `TransportConfig`.
    pub fn new(credentials: Credentials, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(
            http,
            transport.base_url.clone(),
            credentials,
        ))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// `base_url` is the API root (`.../client-api/`), not the REST prefix.
    pub fn with_client(http: reqwest::Client, base_url: Url, credentials: Credentials) -> Self {
        Self {
            http,
            base_url,
            credentials,
            token: Mutex::new(None),
        }
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The API root URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn client_id(&self) -> &str {
        &self.credentials.client_id
    }

    pub(super) fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a REST URL: `{base}rest/v1/{path}`.
    pub(crate) fn rest_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join("rest/v1/")?.join(path)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send an authenticated GET and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        let token = self.bearer_token().await?;
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .bearer_auth(token.expose_secret())
            .send()
            .await?;

        self.parse_json(resp).await
    }

    /// Send an authenticated POST with a JSON body. The response body is
    /// not interpreted beyond its status.
    pub(crate) async fn post_json(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<(), Error> {
        let token = self.bearer_token().await?;
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .bearer_auth(token.expose_secret())
            .json(body)
            .send()
            .await?;

        self.check_status(resp).await.map(drop)
    }

    /// Map non-success statuses to errors, passing successful responses through.
    ///
    /// A 401 on a REST call means the cached token was revoked early, so it
    /// is discarded and the next request performs a fresh exchange.
    async fn check_status(&self, resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            self.invalidate_token().await;
            return Err(Error::Authentication {
                message: "bearer token rejected (HTTP 401)".into(),
            });
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = resp
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return Err(Error::RateLimited { retry_after_secs });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message: preview(&body),
            });
        }

        trace!(%status, "response ok");
        Ok(resp)
    }

    async fn parse_json<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, Error> {
        let resp = self.check_status(resp).await?;
        let body = resp.text().await?;

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }
}

/// First 200 characters of a response body, for error messages.
pub(super) fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}
