use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::execution_config::{
    DEFAULT_MAX_TRANSPORT_RETRIES, DEFAULT_MAX_WAIT_MS, DEFAULT_POLL_INTERVAL, DEFAULT_SEND_INTERVAL,
};

#[derive(Clone, Debug, Deserialize)]
pub struct SlotlandConfigFile {
    pub runtime: RuntimeConfigSection,
    #[serde(default)]
    pub execution: ExecutionConfigSection,
    #[serde(default)]
    pub bundle: BundleConfigSection,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfigSection {
    pub keypair_path: String,
    pub rpc_url: String,
    #[serde(default = "default_commitment")]
    pub commitment: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ExecutionConfigSection {
    #[serde(default = "default_strategy")]
    pub strategy: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_send_interval_ms")]
    pub send_interval_ms: u64,
    #[serde(default = "default_max_transport_retries")]
    pub max_transport_retries: u32,
    #[serde(default = "default_max_wait_ms")]
    pub max_wait_ms: u64,
    #[serde(default)]
    pub priority_fee_microlamports: u64,
    #[serde(default = "default_compute_unit_limit")]
    pub compute_unit_limit: u32,
}

impl Default for ExecutionConfigSection {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            poll_interval_ms: default_poll_interval_ms(),
            send_interval_ms: default_send_interval_ms(),
            max_transport_retries: default_max_transport_retries(),
            max_wait_ms: default_max_wait_ms(),
            priority_fee_microlamports: 0,
            compute_unit_limit: default_compute_unit_limit(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct BundleConfigSection {
    #[serde(default)]
    pub relay_urls: Vec<String>,
    #[serde(default)]
    pub tip_sol: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {path}")]
    ReadConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid slotland.toml format")]
    ParseToml {
        #[source]
        source: toml::de::Error,
    },
}

pub fn load_slotland_config_file(path: &str) -> Result<SlotlandConfigFile, ConfigError> {
    let config_text =
        std::fs::read_to_string(path).map_err(|source| ConfigError::ReadConfigFile {
            path: PathBuf::from(path),
            source,
        })?;
    parse_slotland_config_toml(&config_text)
}

pub fn parse_slotland_config_toml(config_text: &str) -> Result<SlotlandConfigFile, ConfigError> {
    toml::from_str::<SlotlandConfigFile>(config_text)
        .map_err(|source| ConfigError::ParseToml { source })
}

fn default_commitment() -> String {
    "confirmed".to_owned()
}

fn default_strategy() -> String {
    "direct".to_owned()
}

const fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis()
}

const fn default_send_interval_ms() -> u64 {
    DEFAULT_SEND_INTERVAL.as_millis()
}

const fn default_max_transport_retries() -> u32 {
    DEFAULT_MAX_TRANSPORT_RETRIES
}

const fn default_max_wait_ms() -> u64 {
    DEFAULT_MAX_WAIT_MS
}

const fn default_compute_unit_limit() -> u32 {
    200_000
}
