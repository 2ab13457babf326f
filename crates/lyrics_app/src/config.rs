//! Optional RON overrides for the engine, read once at startup.
//!
//! Every field is optional; omitted fields keep their defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lyrics_engine::{
    AdapterError, DebounceSettings, EngineConfig, FetchSettings, SiteAdapter,
    AZLYRICS_SEARCH_ENDPOINT, DEFAULT_QUERY_PARAM,
};
use serde::{Deserialize, Serialize};

use crate::logging::LogDestination;

pub const DEFAULT_CONFIG_FILENAME: &str = "lyrics.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub search_endpoint: String,
    pub query_param: String,
    pub debounce_ms: u64,
    pub min_query_chars: usize,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: Option<u64>,
    pub max_bytes: u64,
    pub log_destination: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        let debounce = DebounceSettings::default();
        Self {
            search_endpoint: AZLYRICS_SEARCH_ENDPOINT.to_string(),
            query_param: DEFAULT_QUERY_PARAM.to_string(),
            debounce_ms: debounce.quiet_period.as_millis() as u64,
            min_query_chars: debounce.min_chars,
            connect_timeout_secs: fetch.connect_timeout.as_secs(),
            request_timeout_secs: fetch.request_timeout.map(|t| t.as_secs()),
            max_bytes: fetch.max_bytes,
            log_destination: LogDestination::File,
        }
    }
}

impl AppConfig {
    pub fn engine_config(&self) -> Result<EngineConfig, AdapterError> {
        Ok(EngineConfig {
            adapter: SiteAdapter::azlyrics_at(&self.search_endpoint)?
                .with_query_param(self.query_param.clone()),
            fetch: FetchSettings {
                connect_timeout: Duration::from_secs(self.connect_timeout_secs),
                request_timeout: self.request_timeout_secs.map(Duration::from_secs),
                max_bytes: self.max_bytes,
                ..FetchSettings::default()
            },
            debounce: DebounceSettings {
                quiet_period: Duration::from_millis(self.debounce_ms),
                min_chars: self.min_query_chars,
            },
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

/// A missing file means defaults.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(AppConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
