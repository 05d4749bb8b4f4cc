//! Configuration management with TOML, environment variables, and CLI overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site the pages are fetched from
    #[serde(default = "default_site_url")]
    pub site_url: String,

    /// Public base of this service's API, used to build links in responses
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Listen address for `serve`
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Partner identifier appended to marketplace links
    #[serde(default = "default_affiliate_id")]
    pub affiliate_id: String,

    /// Substring a purchase link must contain to be kept
    #[serde(default = "default_marketplace_token")]
    pub marketplace_token: String,

    /// Hosts whose links wrap the real destination in a `url` parameter
    #[serde(default = "default_redirect_hosts")]
    pub redirect_hosts: Vec<String>,

    /// Substring identifying first-party image URLs on category tiles
    #[serde(default = "default_asset_host_token")]
    pub asset_host_token: String,
}

fn default_site_url() -> String {
    "https://id.my-best.com".to_string()
}

fn default_api_base() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_affiliate_id() -> String {
    "11379810076".to_string()
}

fn default_marketplace_token() -> String {
    "shopee".to_string()
}

fn default_redirect_hosts() -> Vec<String> {
    vec!["atid.me".to_string()]
}

fn default_asset_host_token() -> String {
    "my-best.com".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_url: default_site_url(),
            api_base: default_api_base(),
            proxy: None,
            format: OutputFormat::Json,
            bind: default_bind(),
            affiliate_id: default_affiliate_id(),
            marketplace_token: default_marketplace_token(),
            redirect_hosts: default_redirect_hosts(),
            asset_host_token: default_asset_host_token(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("mybest-scraper").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(site_url) = std::env::var("MYBEST_SITE_URL") {
            self.site_url = site_url;
        }

        if let Ok(api_base) = std::env::var("MYBEST_API_BASE") {
            self.api_base = api_base;
        }

        if let Ok(proxy) = std::env::var("MYBEST_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(affiliate_id) = std::env::var("MYBEST_AFFILIATE_ID") {
            self.affiliate_id = affiliate_id;
        }

        if let Ok(token) = std::env::var("MYBEST_MARKETPLACE_TOKEN") {
            self.marketplace_token = token;
        }

        // Comma-separated list
        if let Ok(hosts) = std::env::var("MYBEST_REDIRECT_HOSTS") {
            self.redirect_hosts = hosts
                .split(',')
                .map(str::trim)
                .filter(|h| !h.is_empty())
                .map(String::from)
                .collect();
        }

        if let Ok(token) = std::env::var("MYBEST_ASSET_HOST_TOKEN") {
            self.asset_host_token = token;
        }

        if let Ok(bind) = std::env::var("MYBEST_BIND") {
            self.bind = bind;
        }

        if let Ok(format) = std::env::var("MYBEST_FORMAT") {
            if let Ok(f) = format.parse() {
                self.format = f;
            }
        }

        self
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            _ => Err(format!("Unknown format: {}. Use: json, table", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Table => write!(f, "table"),
        }
    }
}
