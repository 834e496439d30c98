use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration file structure for the dashboard.
///
/// Every field has a default matching the upstream OpenStack infrastructure,
/// so running without a configuration file watches `check-tripleo`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub feeds: FeedsConfig,

    #[serde(default)]
    pub capacity: CapacityConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FeedsConfig {
    /// Zuul status.json URL
    #[serde(default = "default_status_url")]
    pub status_url: String,

    /// nodepool.yaml URL
    #[serde(default = "default_capacity_url")]
    pub capacity_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CapacityConfig {
    /// Nodepool providers whose max-servers count towards capacity
    #[serde(default = "default_pools")]
    pub pools: Vec<String>,

    /// Minutes between capacity refreshes
    #[serde(default = "default_refresh_minutes")]
    pub refresh_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Queue shown when the request names none
    #[serde(default = "default_queue")]
    pub default_queue: String,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            status_url: default_status_url(),
            capacity_url: default_capacity_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            pools: default_pools(),
            refresh_minutes: default_refresh_minutes(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            default_queue: default_queue(),
        }
    }
}

fn default_status_url() -> String {
    "http://zuul.openstack.org/status.json".to_string()
}

fn default_capacity_url() -> String {
    "http://git.openstack.org/cgit/openstack-infra/project-config/plain/nodepool/nodepool.yaml"
        .to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_pools() -> Vec<String> {
    vec![
        "tripleo-test-cloud-rh1".to_string(),
        "tripleo-test-cloud-rh2".to_string(),
    ]
}

fn default_refresh_minutes() -> i64 {
    30
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_queue() -> String {
    "check-tripleo".to_string()
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./zuul-status.toml
    /// 3. ./zuul-status.json
    /// 4. ./zuul-status.yaml
    /// 5. ./zuul-status.yml
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let candidates = [
            "zuul-status.toml",
            "zuul-status.json",
            "zuul-status.yaml",
            "zuul-status.yml",
        ];

        for candidate in &candidates {
            let path = Path::new(candidate);
            if path.exists() {
                return Self::load_from_path(path);
            }
        }

        Ok(Self::default())
    }

    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => toml::from_str(&contents)
                .or_else(|_| serde_json::from_str(&contents))
                .or_else(|_| serde_yaml::from_str(&contents))
                .with_context(|| format!("Failed to parse config file: {}", path.display())),
        }
    }
}
