//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.commune/config.json`) and environment.
//! Covers the API credential, the inbound receiver, and the trigger instance settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::trigger::OutputMode;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Commune API credential.
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Inbound webhook receiver settings.
    #[serde(default)]
    pub receiver: ReceiverConfig,

    /// Trigger instance settings (which inbox to listen on, output shape).
    #[serde(default)]
    pub trigger: TriggerConfig,
}

/// Commune API credential config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsConfig {
    /// API key from the Commune dashboard (Settings → API Keys). Overridden by COMMUNE_API_KEY env when set.
    pub api_key: Option<String>,
}

/// Receiver bind, port, and callback settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiverConfig {
    /// Port for the inbound webhook receiver (default 15252).
    #[serde(default = "default_receiver_port")]
    pub port: u16,

    /// Bind address (default "127.0.0.1").
    #[serde(default = "default_receiver_bind")]
    pub bind: String,

    /// Externally-addressable URL Commune POSTs inbound events to. When unset, a URL is
    /// derived from bind and port (only reachable if Commune can route to it).
    pub public_url: Option<String>,

    /// Optional shared secret for inbound verification (X-Commune-Signature). Overridden by COMMUNE_WEBHOOK_SECRET env.
    pub secret: Option<String>,
}

fn default_receiver_port() -> u16 {
    15252
}

fn default_receiver_bind() -> String {
    "127.0.0.1".to_string()
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            port: default_receiver_port(),
            bind: default_receiver_bind(),
            public_url: None,
            secret: None,
        }
    }
}

/// Trigger instance settings: the inbox whose webhook this receiver owns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerConfig {
    /// Domain ID that owns the inbox (e.g. "d_abc123").
    pub domain_id: Option<String>,

    /// Inbox to listen for emails on (e.g. "inbox_xyz").
    pub inbox_id: Option<String>,

    /// Events to subscribe the webhook to (default ["inbound"]).
    #[serde(default = "default_trigger_events")]
    pub events: Vec<String>,

    /// How much of each inbound event to pass through: "message" (flattened fields) or "full" (raw payload).
    #[serde(default)]
    pub output: OutputMode,
}

fn default_trigger_events() -> Vec<String> {
    vec!["inbound".to_string()]
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            domain_id: None,
            inbox_id: None,
            events: default_trigger_events(),
            output: OutputMode::default(),
        }
    }
}

/// Resolve the API key: env COMMUNE_API_KEY overrides config.
pub fn resolve_api_key(config: &Config) -> Option<String> {
    non_empty_env("COMMUNE_API_KEY").or_else(|| {
        config
            .credentials
            .api_key
            .as_ref()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

/// Resolve the inbound shared secret: env COMMUNE_WEBHOOK_SECRET overrides config.
pub fn resolve_webhook_secret(config: &Config) -> Option<String> {
    non_empty_env("COMMUNE_WEBHOOK_SECRET").or_else(|| {
        config
            .receiver
            .secret
            .as_ref()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|s| {
        let t = s.trim();
        if t.is_empty() {
            None
        } else {
            Some(t.to_string())
        }
    })
}

/// True if the bind address is loopback (127.0.0.1, ::1, etc.).
pub fn is_loopback_bind(bind: &str) -> bool {
    let b = bind.trim();
    b == "127.0.0.1" || b == "::1" || b == "localhost"
}

/// The callback URL registered with Commune: receiver.publicUrl when set, else derived from bind and port.
pub fn resolve_callback_url(config: &Config) -> String {
    config
        .receiver
        .public_url
        .as_ref()
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .map(|base| format!("{}{}", base, crate::receiver::INBOUND_PATH))
        .unwrap_or_else(|| {
            format!(
                "http://{}:{}{}",
                config.receiver.bind,
                config.receiver.port,
                crate::receiver::INBOUND_PATH
            )
        })
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("COMMUNE_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".commune").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the default path (or COMMUNE_CONFIG_PATH). Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}

/// Create the config directory and a default config file if they do not exist.
pub fn init_config_dir(config_path: &Path) -> Result<PathBuf> {
    let config_dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(config_dir)
        .with_context(|| format!("creating config directory {}", config_dir.display()))?;

    if !config_path.exists() {
        std::fs::write(config_path, b"{}")
            .with_context(|| format!("writing default config to {}", config_path.display()))?;
        log::info!("created default config at {}", config_path.display());
    }

    Ok(config_dir.to_path_buf())
}
