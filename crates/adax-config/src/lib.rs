//! Configuration for the Adax bridge.
//!
//! TOML file + `ADAX_*` environment overlay, credential resolution
//! (env var, keyring, plaintext), and translation to
//! `adax_core::BridgeConfig`. The core never reads files; this crate does.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use adax_core::{BridgeConfig, CloudSettings, PollInterval, RemovalPolicy, RemoteSettings, RoomId};

/// Keyring service under which secrets are stored, keyed by client id.
pub const KEYRING_SERVICE: &str = "adax-bridge";

/// Prefix of the environment overlay (`ADAX_CLIENT_ID`, ...).
pub const ENV_PREFIX: &str = "ADAX_";

/// Credentials used in dummy mode, where nothing leaves the process.
pub const DUMMY_CREDENTIAL: &str = "dummy";

const ENV_KEYS: [&str; 8] = [
    "dummy_mode",
    "client_id",
    "secret",
    "secret_env",
    "max_poll_interval",
    "remove_stale_accessories",
    "api_url",
    "timeout",
];

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config struct ──────────────────────────────────────────────

/// Bridge configuration as written in `config.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Use the in-memory rooms instead of the cloud.
    #[serde(default)]
    pub dummy_mode: bool,

    /// Account id from the Adax app. Integers are accepted.
    #[serde(default, deserialize_with = "string_or_number")]
    pub client_id: Option<String>,

    /// API secret (plaintext, prefer keyring or env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,

    /// Environment variable holding the API secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_env: Option<String>,

    /// Maximum snapshot age in seconds. Values below 1 are raised to 1.
    #[serde(default = "default_poll_interval")]
    pub max_poll_interval: u64,

    /// Unregister accessories whose room disappeared upstream.
    #[serde(default = "default_true")]
    pub remove_stale_accessories: bool,

    /// Override of the cloud API root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Display-name overrides for the dummy rooms, keyed by room id.
    // Must remain the last field: TOML tables follow plain keys.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub room_names: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dummy_mode: false,
            client_id: None,
            secret: None,
            secret_env: None,
            max_poll_interval: default_poll_interval(),
            remove_stale_accessories: true,
            api_url: None,
            timeout: default_timeout(),
            room_names: BTreeMap::new(),
        }
    }
}

fn default_poll_interval() -> u64 {
    PollInterval::DEFAULT.as_secs()
}
fn default_true() -> bool {
    true
}
fn default_timeout() -> u64 {
    30
}

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    Ok(Option::<Raw>::deserialize(d)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Signed(n) => n.to_string(),
        Raw::Unsigned(n) => n.to_string(),
    }))
}

impl Config {
    /// Copy safe to print: the plaintext secret is masked.
    pub fn redacted(&self) -> Self {
        Self {
            secret: self.secret.as_ref().map(|_| "********".into()),
            ..self.clone()
        }
    }

    /// Parse `room_names` keys into room ids.
    pub fn room_name_overrides(&self) -> Result<HashMap<RoomId, String>, ConfigError> {
        self.room_names
            .iter()
            .map(|(key, name)| {
                let id = key.parse::<RoomId>().map_err(|_| ConfigError::Validation {
                    field: format!("room_names.{key}"),
                    reason: "room ids are integers".into(),
                })?;
                Ok((id, name.clone()))
            })
            .collect()
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "adax").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("adax");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load config from `path` (or the default path) plus the environment.
/// A missing file is not an error.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    debug!(path = %path.display(), "loading config");

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed(ENV_PREFIX).only(&ENV_KEYS));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Store the API secret in the system keyring under the client id.
pub fn store_secret(client_id: &str, secret: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, client_id)?;
    entry.set_password(secret)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Where the resolved secret came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretSource {
    Dummy,
    Env(String),
    Keyring,
    Plaintext,
    /// Nothing configured; an empty secret is used.
    Missing,
}

impl std::fmt::Display for SecretSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dummy => f.write_str("dummy"),
            Self::Env(name) => write!(f, "env ${name}"),
            Self::Keyring => f.write_str("keyring"),
            Self::Plaintext => f.write_str("config file"),
            Self::Missing => f.write_str("not set"),
        }
    }
}

/// Resolved account credentials.
#[derive(Debug, Clone)]
pub struct ResolvedCredentials {
    pub client_id: String,
    pub secret: SecretString,
    pub source: SecretSource,
}

/// Resolve credentials using the system keyring.
pub fn resolve_credentials(config: &Config) -> ResolvedCredentials {
    resolve_credentials_with(config, keyring_lookup)
}

fn keyring_lookup(client_id: &str) -> Option<String> {
    keyring::Entry::new(KEYRING_SERVICE, client_id)
        .and_then(|entry| entry.get_password())
        .ok()
}

/// Resolve credentials with a custom keyring lookup.
///
/// Dummy mode always yields `dummy`/`dummy`. Otherwise the secret comes
/// from `secret_env`, then the keyring, then the plaintext field. Missing
/// values fall back to empty strings with a warning.
pub fn resolve_credentials_with(
    config: &Config,
    keyring: impl FnOnce(&str) -> Option<String>,
) -> ResolvedCredentials {
    if config.dummy_mode {
        return ResolvedCredentials {
            client_id: DUMMY_CREDENTIAL.into(),
            secret: SecretString::from(DUMMY_CREDENTIAL),
            source: SecretSource::Dummy,
        };
    }

    let client_id = config.client_id.clone().unwrap_or_else(|| {
        warn!("client_id is not configured, using an empty value");
        String::new()
    });

    if let Some(ref env_name) = config.secret_env {
        if let Ok(val) = std::env::var(env_name) {
            return ResolvedCredentials {
                client_id,
                secret: SecretString::from(val),
                source: SecretSource::Env(env_name.clone()),
            };
        }
        debug!(var = %env_name, "secret_env is set but the variable is not");
    }

    if !client_id.is_empty() {
        if let Some(secret) = keyring(&client_id) {
            return ResolvedCredentials {
                client_id,
                secret: SecretString::from(secret),
                source: SecretSource::Keyring,
            };
        }
    }

    if let Some(ref secret) = config.secret {
        return ResolvedCredentials {
            client_id,
            secret: SecretString::from(secret.clone()),
            source: SecretSource::Plaintext,
        };
    }

    warn!("no API secret configured, using an empty value");
    ResolvedCredentials {
        client_id,
        secret: SecretString::from(String::new()),
        source: SecretSource::Missing,
    }
}

// ── Translation to core config ──────────────────────────────────────

/// Build a `BridgeConfig` from file config, resolving credentials through
/// the system keyring.
pub fn to_bridge_config(config: &Config) -> Result<BridgeConfig, ConfigError> {
    to_bridge_config_with(config, resolve_credentials(config))
}

/// Build a `BridgeConfig` with already-resolved credentials.
pub fn to_bridge_config_with(
    config: &Config,
    credentials: ResolvedCredentials,
) -> Result<BridgeConfig, ConfigError> {
    let remote = if config.dummy_mode {
        RemoteSettings::Dummy {
            room_names: config.room_name_overrides()?,
        }
    } else {
        if !config.room_names.is_empty() {
            debug!("room_names only apply in dummy mode");
        }
        let mut cloud = CloudSettings::new(credentials.client_id, credentials.secret);
        if let Some(ref raw) = config.api_url {
            cloud.api_url = raw.parse().map_err(|e: url::ParseError| ConfigError::Validation {
                field: "api_url".into(),
                reason: e.to_string(),
            })?;
        }
        cloud.timeout = Duration::from_secs(config.timeout.max(1));
        RemoteSettings::Cloud(cloud)
    };

    if config.max_poll_interval < 1 {
        warn!(
            configured = config.max_poll_interval,
            "max_poll_interval below 1s, using 1s"
        );
    }

    Ok(BridgeConfig {
        remote,
        poll_interval: PollInterval::from_secs(config.max_poll_interval),
        removal: RemovalPolicy::from_flag(config.remove_stale_accessories),
    })
}
