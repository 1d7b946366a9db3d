use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::catalog::{CheckoutCatalog, TierLevel};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    /// Keys accepted on operator routes (`/admin`, checkout completion)
    #[serde(default)]
    pub api_keys: Vec<ApiKeyConfig>,
    #[serde(default)]
    pub catalog: CheckoutCatalog,
    #[serde(default)]
    pub activity: ActivityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub log_format: String,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Allowed browser origins; empty allows any origin
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            max_body_bytes: default_max_body_bytes(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiKeyConfig {
    pub key: String,
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ActivityConfig {
    /// Records kept per kind (calculations, purchases); applied at startup
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

fn default_enabled() -> bool {
    true
}

fn default_max_entries() -> usize {
    500
}

/// Load configuration from an optional TOML file layered with
/// `PRICING_`-prefixed environment variables, then validate it.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("PRICING")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    match cfg.server.log_format.as_str() {
        "pretty" | "json" => {}
        other => anyhow::bail!("Invalid log format '{}': expected 'pretty' or 'json'", other),
    }

    if cfg.server.max_body_bytes == 0 {
        anyhow::bail!("server.max_body_bytes must be greater than zero");
    }

    let mut seen_keys = HashSet::new();
    for key in &cfg.api_keys {
        if key.name.is_empty() {
            anyhow::bail!("API key name cannot be empty");
        }
        if key.key.is_empty() {
            anyhow::bail!("API key '{}' has an empty key", key.name);
        }
        if !seen_keys.insert(key.key.as_str()) {
            anyhow::bail!("API key '{}' duplicates another key", key.name);
        }
    }

    if cfg.catalog.currency.trim().is_empty() {
        anyhow::bail!("Catalog currency cannot be empty");
    }

    let mut seen_tiers = HashSet::new();
    for plan in &cfg.catalog.plans {
        if !seen_tiers.insert(plan.tier) {
            anyhow::bail!("Catalog lists tier '{}' more than once", plan.tier);
        }
        if plan.monthly_amount_cents == 0 || plan.annual_amount_cents == 0 {
            anyhow::bail!("Catalog tier '{}' must have non-zero amounts", plan.tier);
        }
    }
    for tier in TierLevel::ALL {
        if !seen_tiers.contains(&tier) {
            anyhow::bail!("Catalog is missing tier '{}'", tier);
        }
    }

    if cfg.activity.max_entries == 0 {
        anyhow::bail!("activity.max_entries must be greater than zero");
    }

    Ok(())
}
