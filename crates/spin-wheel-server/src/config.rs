//! Configuration for the spin wheel server.

use anyhow::{Context, Result};
use prize_draw::{OutcomeTable, WeightPolicy};
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Registrant store configuration
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Prize wheel configuration
    #[serde(default)]
    pub prizes: PrizesConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    /// Directory holding the persisted registrant list
    #[serde(default = "default_registry_path")]
    pub path: PathBuf,

    /// Enable persistence (if false, registrants are kept in memory only)
    #[serde(default = "default_true")]
    pub persist: bool,

    /// Name of the persisted entry
    #[serde(default = "default_registry_key")]
    pub key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrizesConfig {
    /// Built-in outcome table (`promotional` or `even_split`)
    #[serde(default = "default_prize_table")]
    pub table: String,

    /// How weights are interpreted
    #[serde(default)]
    pub policy: WeightPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Registrations and spins per minute across all clients
    #[serde(default = "default_global_rpm")]
    pub global_per_minute: u32,

    /// Registration attempts per hour for one mobile number
    #[serde(default = "default_per_number_per_hour")]
    pub per_number_per_hour: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default implementations
impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            path: default_registry_path(),
            persist: true,
            key: default_registry_key(),
        }
    }
}

impl Default for PrizesConfig {
    fn default() -> Self {
        Self {
            table: default_prize_table(),
            policy: WeightPolicy::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            global_per_minute: default_global_rpm(),
            per_number_per_hour: default_per_number_per_hour(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_registry_path() -> PathBuf {
    PathBuf::from("/data")
}

fn default_true() -> bool {
    true
}

fn default_registry_key() -> String {
    registrant_store::DEFAULT_KEY.into()
}

fn default_prize_table() -> String {
    "promotional".into()
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8080
}

fn default_global_rpm() -> u32 {
    60
}

fn default_per_number_per_hour() -> u32 {
    3
}

fn default_log_level() -> String {
    "info".into()
}

impl PrizesConfig {
    /// Resolve the configured preset under the configured weight policy.
    pub fn outcome_table(&self) -> Result<OutcomeTable> {
        let table = OutcomeTable::preset(&self.table)
            .with_context(|| format!("Invalid prize table '{}'", self.table))?;
        Ok(table.with_policy(self.policy))
    }
}

impl ServerConfig {
    /// Address to bind. An unparseable `listen_addr` is an error, not a fallback.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .listen_addr
            .parse()
            .with_context(|| format!("Invalid listen address '{}'", self.listen_addr))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
