use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::pricing::PricingTable;

/// Environment variable holding the business phone number (E.164, no plus)
pub const PHONE_ENV_VAR: &str = "BUSINESS_PHONE_E164";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub contact: ContactConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    /// Active price list: the built-in one unless `pricing.file` replaces it
    #[serde(skip)]
    pub pricing_table: PricingTable,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// `text` or `json`
    #[serde(default = "default_log_format")]
    pub log_format: String,
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ContactConfig {
    /// Digits only, country code included (e.g. "19165551234")
    #[serde(default)]
    pub phone: Option<String>,
}

impl ContactConfig {
    /// The configured number, treating an empty value as absent
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref().filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Redis,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_max_requests")]
    pub max_requests: u64,
    #[serde(default = "default_window_seconds")]
    pub window_seconds: u64,
    /// How often expired entries are purged from the memory store
    #[serde(default = "default_sweep_interval_seconds")]
    pub sweep_interval_seconds: u64,
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default)]
    pub redis_url: Option<String>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_seconds: default_window_seconds(),
            sweep_interval_seconds: default_sweep_interval_seconds(),
            backend: StoreBackend::default(),
            redis_url: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
    #[serde(default = "default_metrics_endpoint")]
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
            endpoint: default_metrics_endpoint(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PricingConfig {
    /// JSON file replacing the built-in price list
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_body_limit_bytes() -> usize {
    16 * 1024
}

fn default_max_requests() -> u64 {
    20
}

fn default_window_seconds() -> u64 {
    60
}

fn default_sweep_interval_seconds() -> u64 {
    300
}

fn default_metrics_enabled() -> bool {
    true
}

fn default_metrics_endpoint() -> String {
    "/metrics".to_string()
}

/// Load configuration from `config.toml` in the working directory
pub fn load_config() -> anyhow::Result<Config> {
    load_config_from(Path::new("config.toml"))
}

/// Load configuration from a file (optional), `STELLARVIEW__*` variables
/// and the phone number variable, then validate it
pub fn load_config_from(path: &Path) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix("STELLARVIEW").separator("__"))
        .build()?;

    let mut cfg: Config = config.try_deserialize()?;
    if let Some(file) = &cfg.pricing.file {
        cfg.pricing_table = load_pricing_file(file)?;
    }
    apply_phone_override(&mut cfg, std::env::var(PHONE_ENV_VAR).ok());
    validate_config(&cfg)?;

    Ok(cfg)
}

/// Read a price list in the same JSON shape `/api/pricing` serves
pub fn load_pricing_file(path: &Path) -> anyhow::Result<PricingTable> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read pricing file {}", path.display()))?;
    let table: PricingTable = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse pricing file {}", path.display()))?;
    Ok(table)
}

/// The phone variable wins over the file; an empty variable clears the number
fn apply_phone_override(cfg: &mut Config, value: Option<String>) {
    if let Some(value) = value {
        let trimmed = value.trim();
        cfg.contact.phone = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }
}

pub fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if let Some(phone) = cfg.contact.phone() {
        if phone.len() > 15 || !phone.bytes().all(|b| b.is_ascii_digit()) {
            anyhow::bail!("Phone number must be 1-15 digits without '+' (E.164)");
        }
    }

    if cfg.rate_limit.max_requests < 1 {
        anyhow::bail!("rate_limit.max_requests must be >= 1");
    }
    if cfg.rate_limit.window_seconds < 1 {
        anyhow::bail!("rate_limit.window_seconds must be >= 1");
    }
    if cfg.rate_limit.sweep_interval_seconds < 1 {
        anyhow::bail!("rate_limit.sweep_interval_seconds must be >= 1");
    }
    if cfg.rate_limit.backend == StoreBackend::Redis && cfg.rate_limit.redis_url.is_none() {
        anyhow::bail!("rate_limit.redis_url is required for the redis backend");
    }

    if !matches!(cfg.server.log_format.as_str(), "text" | "json") {
        anyhow::bail!("Invalid log format: {}", cfg.server.log_format);
    }

    validate_pricing(&cfg.pricing_table)?;

    Ok(())
}

fn validate_pricing(table: &PricingTable) -> anyhow::Result<()> {
    if table.currency.is_empty() {
        anyhow::bail!("Pricing currency cannot be empty");
    }

    let mut ids = HashSet::new();
    for add_on in &table.add_ons {
        if add_on.id.is_empty() {
            anyhow::bail!("Add-on id cannot be empty");
        }
        if !ids.insert(add_on.id.as_str()) {
            anyhow::bail!("Add-on id '{}' is duplicated", add_on.id);
        }
    }

    Ok(())
}
