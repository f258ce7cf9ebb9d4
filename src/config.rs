// SPDX-License-Identifier: PMPL-1.0-or-later

//! Client configuration.
//!
//! Settings come from `config.toml` in the platform config directory, then
//! `PORTFOLIO_*` environment variables, then command-line flags. The result
//! is resolved into a [`ClientConfig`] with a parsed base address.
//!
//! ```toml
//! profile = "production"
//! base_url = "https://api.example.org"
//! timeout_secs = 15
//! ```

use crate::http::ProxyRule;
use crate::storage::FileStore;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

const CONFIG_FILE: &str = "config.toml";
const APP_DIR: &str = "portfolio-client";

/// Backend origin used by the development profile.
pub const DEV_BASE_URL: &str = "http://localhost:8080";
/// Prefix the development proxy forwards to the backend.
pub const DEV_PROXY_PREFIX: &str = "/api";

pub const ENV_BASE_URL: &str = "PORTFOLIO_BASE_URL";
pub const ENV_PROFILE: &str = "PORTFOLIO_PROFILE";
pub const ENV_STORAGE: &str = "PORTFOLIO_STORAGE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("unknown profile {0:?} (expected development or production)")]
    UnknownProfile(String),
    #[error("invalid base URL {value:?}: {reason}")]
    InvalidUrl { value: String, reason: String },
    #[error("the production profile needs base_url to be set")]
    MissingBaseUrl,
    #[error("production base URL must use https, got {0}")]
    InsecureProductionUrl(String),
    #[error("no data directory on this platform; set storage_path or PORTFOLIO_STORAGE")]
    NoDataDir,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    #[serde(alias = "dev")]
    Development,
    #[serde(alias = "prod")]
    Production,
}

impl Profile {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "development" | "dev" => Some(Profile::Development),
            "production" | "prod" => Some(Profile::Production),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Profile::Development => "development",
            Profile::Production => "production",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub prefix: String,
    pub target: String,
}

/// Settings as written in `config.toml`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub profile: Option<Profile>,
    pub base_url: Option<String>,
    pub storage_path: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub proxy: Option<ProxyConfig>,
}

/// Fully resolved settings the client runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub profile: Profile,
    pub base_url: Url,
    pub proxy: Option<ProxyRule>,
    pub storage_path: PathBuf,
    pub timeout: Option<Duration>,
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_DIR);
        path.push(CONFIG_FILE);
        path
    })
}

/// Loads the default config file, or defaults when there is none.
pub fn load() -> Result<Config, ConfigError> {
    load_with_source(None).map(|(config, _)| config)
}

/// Loads `explicit` if given, else the default file when it exists. Also
/// returns the path that was read, `None` when running on defaults.
pub fn load_with_source(
    explicit: Option<&Path>,
) -> Result<(Config, Option<PathBuf>), ConfigError> {
    let source = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|path| path.is_file()),
    };
    let config = match &source {
        Some(path) => load_from_path(path)?,
        None => Config::default(),
    };
    Ok((config, source))
}

pub fn load_from_path(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl Config {
    /// Applies `PORTFOLIO_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from any variable source. Blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = lookup(ENV_PROFILE) {
            let profile =
                Profile::from_str(&value).ok_or_else(|| ConfigError::UnknownProfile(value))?;
            self.profile = Some(profile);
        }
        if let Some(value) = lookup(ENV_BASE_URL) {
            self.base_url = Some(value);
        }
        if let Some(value) = lookup(ENV_STORAGE) {
            self.storage_path = Some(PathBuf::from(value));
        }
        Ok(())
    }

    pub fn resolve(&self) -> Result<ClientConfig, ConfigError> {
        let profile = self.profile.unwrap_or_default();

        let base_url = match (&self.base_url, profile) {
            (Some(value), _) => parse_url(value)?,
            (None, Profile::Development) => parse_url(DEV_BASE_URL)?,
            (None, Profile::Production) => return Err(ConfigError::MissingBaseUrl),
        };
        if profile == Profile::Production && base_url.scheme() != "https" {
            return Err(ConfigError::InsecureProductionUrl(base_url.to_string()));
        }

        let proxy = match profile {
            Profile::Development => {
                let rule = match &self.proxy {
                    Some(proxy) => ProxyRule::new(proxy.prefix.clone(), parse_url(&proxy.target)?),
                    None => ProxyRule::new(DEV_PROXY_PREFIX, parse_url(DEV_BASE_URL)?),
                };
                Some(rule)
            }
            Profile::Production => {
                if self.proxy.is_some() {
                    warn!("proxy settings are ignored in the production profile");
                }
                None
            }
        };

        let storage_path = match &self.storage_path {
            Some(path) => path.clone(),
            None => FileStore::default_path().ok_or(ConfigError::NoDataDir)?,
        };

        Ok(ClientConfig {
            profile,
            base_url,
            proxy,
            storage_path,
            timeout: self.timeout_secs.map(Duration::from_secs),
        })
    }
}

fn parse_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|err| ConfigError::InvalidUrl {
        value: value.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            value: value.to_string(),
            reason: format!("unsupported scheme {}", url.scheme()),
        });
    }
    Ok(url)
}
