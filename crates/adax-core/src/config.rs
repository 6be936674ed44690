// ── Runtime bridge configuration ──
//
// These types describe which remote to talk to and how often to poll it.
// They carry credential data but never touch disk: the CLI (via
// adax-config) constructs a `BridgeConfig` and hands it in.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::model::RoomId;

/// Which RemoteClient implementation backs the bridge.
#[derive(Debug, Clone)]
pub enum RemoteSettings {
    /// Talk to the Adax cloud.
    Cloud(CloudSettings),
    /// Deterministic in-memory rooms, with optional display-name overrides.
    Dummy { room_names: HashMap<RoomId, String> },
}

impl RemoteSettings {
    pub fn is_dummy(&self) -> bool {
        matches!(self, Self::Dummy { .. })
    }
}

/// Credentials and transport tuning for the live cloud client.
#[derive(Debug, Clone)]
pub struct CloudSettings {
    pub client_id: String,
    pub secret: SecretString,
    pub api_url: Url,
    pub timeout: Duration,
}

impl CloudSettings {
    pub fn new(client_id: impl Into<String>, secret: SecretString) -> Self {
        Self {
            client_id: client_id.into(),
            secret,
            api_url: default_api_url(),
            timeout: Duration::from_secs(30),
        }
    }
}

fn default_api_url() -> Url {
    adax_api::TransportConfig::default().base_url
}

// ── PollInterval ─────────────────────────────────────────────────────

/// Maximum age of a cached snapshot. Never shorter than one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PollInterval(Duration);

impl PollInterval {
    pub const MIN: Duration = Duration::from_secs(1);
    pub const DEFAULT: Duration = Duration::from_secs(60);

    /// Build an interval, raising anything below [`Self::MIN`] to it.
    pub fn new(interval: Duration) -> Self {
        Self(interval.max(Self::MIN))
    }

    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    pub const fn get(self) -> Duration {
        self.0
    }
}

impl Default for PollInterval {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl fmt::Display for PollInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0.as_secs())
    }
}

// ── RemovalPolicy ────────────────────────────────────────────────────

/// What reconciliation does with accessories whose room vanished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalPolicy {
    /// Unregister and drop the binding.
    #[default]
    Remove,
    /// Keep the accessory registered; it simply stops updating.
    Retain,
}

impl RemovalPolicy {
    pub fn from_flag(remove_stale: bool) -> Self {
        if remove_stale { Self::Remove } else { Self::Retain }
    }
}

/// Everything the bridge needs at construction.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub remote: RemoteSettings,
    pub poll_interval: PollInterval,
    pub removal: RemovalPolicy,
}

impl BridgeConfig {
    pub fn dummy() -> Self {
        Self {
            remote: RemoteSettings::Dummy {
                room_names: HashMap::new(),
            },
            poll_interval: PollInterval::default(),
            removal: RemovalPolicy::default(),
        }
    }
}
