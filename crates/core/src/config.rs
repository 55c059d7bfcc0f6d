//! Runtime configuration
//!
//! Loaded from `movie_intent.toml` (or an explicit path), then overridden by
//! environment variables. Every field has a default, so an absent file is
//! not an error.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::slots::DEFAULT_MAX_LEN;

/// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "movie_intent.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub http: HttpSettings,
    #[serde(default)]
    pub extract: ExtractSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    /// Defaults to the platform cache directory when unset
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractSettings {
    #[serde(default = "default_max_input_len")]
    pub max_input_len: usize,
}

fn default_cache_enabled() -> bool { true }
fn default_ttl_secs() -> u64 { 3600 }
fn default_timeout_secs() -> u64 { 10 }
fn default_user_agent() -> String { format!("movie-intent/{}", env!("CARGO_PKG_VERSION")) }
fn default_max_input_len() -> usize { DEFAULT_MAX_LEN }

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            dir: None,
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ExtractSettings {
    fn default() -> Self {
        Self { max_input_len: default_max_input_len() }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// With `path`, the file must exist and parse. Without it,
    /// `movie_intent.toml` in the working directory is used if present; a
    /// malformed default file is reported and ignored.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = std::env::current_dir()
                    .map(|p| p.join(CONFIG_FILE))
                    .unwrap_or_else(|_| PathBuf::from(CONFIG_FILE));

                if default_path.exists() {
                    Self::from_file(&default_path).unwrap_or_else(|e| {
                        warn!(error = %e, "Failed to load {}, using defaults", CONFIG_FILE);
                        Self::default()
                    })
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `MOVIE_INTENT_*` overrides. Unparseable numbers are ignored.
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = var("MOVIE_INTENT_CACHE_DIR") {
            self.cache.dir = Some(PathBuf::from(dir));
        }
        if let Some(ttl) = var("MOVIE_INTENT_CACHE_TTL").and_then(|v| v.parse().ok()) {
            self.cache.ttl_secs = ttl;
        }
        if let Some(timeout) = var("MOVIE_INTENT_HTTP_TIMEOUT").and_then(|v| v.parse().ok()) {
            self.http.timeout_secs = timeout;
        }
    }
}
