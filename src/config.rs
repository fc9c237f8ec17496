//! Environment configuration
//!
//! Every setting comes from an environment variable with a default, except the
//! model API key.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::llm::ModelEndpoint;
use crate::store::{RecordStore, SqliteBackend, StoreError};
use crate::tools::advice::{
    AdvisorSettings, DEFAULT_ADVICE_MAX_TOKENS, DEFAULT_DETECTION_MAX_TOKENS, DEFAULT_MODEL,
};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const BASE_URL_ENV: &str = "EATWISE_MODEL_BASE_URL";
pub const MODEL_ENV: &str = "EATWISE_MODEL";
pub const DETECTION_MAX_TOKENS_ENV: &str = "EATWISE_DETECTION_MAX_TOKENS";
pub const ADVICE_MAX_TOKENS_ENV: &str = "EATWISE_ADVICE_MAX_TOKENS";
pub const TIMEOUT_ENV: &str = "EATWISE_MODEL_TIMEOUT_SECS";
pub const DATABASE_PATH_ENV: &str = "EATWISE_DATABASE_PATH";
pub const BIND_ADDR_ENV: &str = "EATWISE_BIND_ADDR";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OpenAI API key not found. Please set OPENAI_API_KEY in your environment.")]
    MissingApiKey,

    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String },

    #[error("Failed to open record store: {0}")]
    Store(#[from] StoreError),
}

/// Model endpoint and request settings
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub endpoint: ModelEndpoint,
    pub settings: AdvisorSettings,
}

/// Record store settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// SQLite file; `None` keeps records in memory
    pub database_path: Option<PathBuf>,
    pub bind_addr: SocketAddr,
}

/// Environment lookup, abstracted so tests need not mutate the process env
pub trait EnvSource {
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.trim().is_empty())
    }
}

fn parse_or<T: FromStr>(env: &dyn EnvSource, name: &'static str, default: T) -> Result<T, ConfigError> {
    match env.var(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(default),
    }
}

impl ModelConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&ProcessEnv)
    }

    pub fn from_source(env: &dyn EnvSource) -> Result<Self, ConfigError> {
        let api_key = env.var(API_KEY_ENV).ok_or(ConfigError::MissingApiKey)?;
        let timeout_secs: u64 = parse_or(env, TIMEOUT_ENV, DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            endpoint: ModelEndpoint {
                base_url: env.var(BASE_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                api_key,
                timeout: Duration::from_secs(timeout_secs),
            },
            settings: AdvisorSettings {
                model: env.var(MODEL_ENV).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                detection_max_tokens: parse_or(env, DETECTION_MAX_TOKENS_ENV, DEFAULT_DETECTION_MAX_TOKENS)?,
                advice_max_tokens: parse_or(env, ADVICE_MAX_TOKENS_ENV, DEFAULT_ADVICE_MAX_TOKENS)?,
            },
        })
    }
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&ProcessEnv)
    }

    pub fn from_source(env: &dyn EnvSource) -> Result<Self, ConfigError> {
        let default_addr: SocketAddr = DEFAULT_BIND_ADDR.parse().map_err(|_| ConfigError::InvalidValue {
            name: BIND_ADDR_ENV,
            value: DEFAULT_BIND_ADDR.to_string(),
        })?;

        Ok(Self {
            database_path: env.var(DATABASE_PATH_ENV).map(PathBuf::from),
            bind_addr: parse_or(env, BIND_ADDR_ENV, default_addr)?,
        })
    }

    /// Build the configured store: SQLite when a path is set, memory otherwise
    pub fn open_store(&self) -> Result<RecordStore, ConfigError> {
        match &self.database_path {
            Some(path) => Ok(RecordStore::new(Arc::new(SqliteBackend::open(path)?))),
            None => Ok(RecordStore::in_memory()),
        }
    }
}
