use std::net::{AddrParseError, SocketAddr};
use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;
use utils_trace::{ParseTraceFormatError, TraceFormat};

use crate::utils::environment::StoreTargets;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_CONTENT_DIR: &str = "content";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_DB_POOL_SIZE: u32 = 4;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub content_dir: PathBuf,
    pub log_level: String,
    pub log_format: TraceFormat,
    pub db_pool_size: u32,
    pub store_targets: StoreTargets,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("InvalidBindAddr: {value}: {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: AddrParseError,
    },
    #[error("InvalidPoolSize: {value}: {source}")]
    InvalidPoolSize {
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("InvalidPoolSize: must be at least 1")]
    ZeroPoolSize,
    #[error("InvalidLogFormat: {source}")]
    InvalidLogFormat {
        #[from]
        source: ParseTraceFormatError,
    },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let bind_addr = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: bind_addr.clone(),
                source,
            })?;

        let db_pool_size = match var("DB_POOL_SIZE") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidPoolSize {
                    value: value.clone(),
                    source,
                })?,
            None => DEFAULT_DB_POOL_SIZE,
        };
        if db_pool_size == 0 {
            return Err(ConfigError::ZeroPoolSize);
        }

        let log_format = match var("LOG_FORMAT") {
            Some(value) => value.parse()?,
            None => TraceFormat::default(),
        };

        Ok(Self {
            bind_addr,
            content_dir: var("CONTENT_DIR")
                .unwrap_or_else(|| DEFAULT_CONTENT_DIR.to_string())
                .into(),
            log_level: var("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            log_format,
            db_pool_size,
            store_targets: StoreTargets::from_lookup(&lookup),
        })
    }
}
