// Shared transport configuration for building reqwest::Client instances.

use std::time::Duration;

use url::Url;

/// Root of the public Adax client API. Token and REST paths hang off it.
pub const DEFAULT_BASE_URL: &str = "https://api-1.adax.no/client-api/";

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// API root; must end with a slash so relative joins keep the prefix.
    pub base_url: Url,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a config for a custom API root (tests, proxies).
    ///
    /// A missing trailing slash is added so `auth/token` and `rest/v1/...`
    /// resolve beneath the given path rather than replacing its last segment.
    pub fn with_base_url(mut self, base: &str) -> Result<Self, crate::error::Error> {
        let normalized = if base.ends_with('/') {
            base.to_owned()
        } else {
            format!("{base}/")
        };
        self.base_url = Url::parse(&normalized)?;
        Ok(self)
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("adax-bridge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| crate::error::Error::ClientBuild(e.to_string()))
    }
}
