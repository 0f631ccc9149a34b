//! Process configuration from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::seta::SetaConfig;

/// Errors reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Where upstream data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedConfig {
    Live {
        vehicles_url: String,
        arrival_url: String,
        routes_url: String,
        timeout_secs: u64,
    },
    /// Canned payloads from a directory.
    Mock { dir: PathBuf },
}

impl FeedConfig {
    /// Client config for the live API; `None` in mock mode.
    pub fn seta(&self) -> Option<SetaConfig> {
        match self {
            FeedConfig::Live {
                vehicles_url,
                arrival_url,
                routes_url,
                timeout_secs,
            } => Some(
                SetaConfig::new(vehicles_url, arrival_url, routes_url).with_timeout(*timeout_secs),
            ),
            FeedConfig::Mock { .. } => None,
        }
    }
}

/// Which route groups the server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteToggles {
    /// `/api/...`
    pub seta_api: bool,
    /// `/static/...`
    pub static_files: bool,
}

impl Default for RouteToggles {
    fn default() -> Self {
        Self {
            seta_api: true,
            static_files: true,
        }
    }
}

/// Everything the server needs to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub feed: FeedConfig,
    pub routes: RouteToggles,
    /// Directory holding the catalog snapshots.
    pub output_dir: PathBuf,
    pub rules_path: PathBuf,
    pub stop_names_path: PathBuf,
    /// Period of the vehicle-driven stop and route code refresh.
    pub catalog_interval: Duration,
    /// Period of the route number refresh.
    pub route_numbers_interval: Duration,
    pub arrival_cache_ttl: Duration,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env { lookup };

        let feed = match env.get("SETA_MOCK_DIR") {
            Some(dir) => FeedConfig::Mock { dir: dir.into() },
            None => FeedConfig::Live {
                vehicles_url: env.require("SETA_VEHICLES_URL")?,
                arrival_url: env.require("SETA_ARRIVAL_URL")?,
                routes_url: env.require("SETA_ROUTES_URL")?,
                timeout_secs: env.parse_or("SETA_TIMEOUT_SECS", 30)?,
            },
        };

        Ok(Self {
            port: env.parse_or("PORT", 5001)?,
            feed,
            routes: RouteToggles {
                seta_api: env.flag_or("ENABLE_SETA_API_ROUTES", true)?,
                static_files: env.flag_or("ENABLE_STATIC_FILE_ROUTES", true)?,
            },
            output_dir: env.get("OUTPUT_DIR").unwrap_or_else(|| "output".into()).into(),
            rules_path: env
                .get("RULES_PATH")
                .unwrap_or_else(|| "data/transformation-rules.json".into())
                .into(),
            stop_names_path: env
                .get("STOP_NAMES_PATH")
                .unwrap_or_else(|| "data/custom-route-names.json".into())
                .into(),
            catalog_interval: env.seconds_or("CATALOG_INTERVAL_SECS", 20)?,
            route_numbers_interval: env.seconds_or("ROUTE_NUMBERS_INTERVAL_SECS", 8 * 60 * 60)?,
            arrival_cache_ttl: env.seconds_or("ARRIVAL_CACHE_TTL_SECS", 15)?,
        })
    }

    pub fn cache(&self) -> CacheConfig {
        CacheConfig {
            ttl: self.arrival_cache_ttl,
            ..CacheConfig::default()
        }
    }
}

struct Env<L> {
    lookup: L,
}

impl<L: Fn(&str) -> Option<String>> Env<L> {
    /// Unset and blank variables both count as absent.
    fn get(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn require(&self, name: &'static str) -> Result<String, ConfigError> {
        self.get(name).ok_or(ConfigError::Missing(name))
    }

    fn parse_or<T: std::str::FromStr>(&self, name: &'static str, default: T) -> Result<T, ConfigError> {
        match self.get(name) {
            None => Ok(default),
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name,
                value,
                reason: "not a valid number",
            }),
        }
    }

    fn seconds_or(&self, name: &'static str, default: u64) -> Result<Duration, ConfigError> {
        let secs = self.parse_or(name, default)?;
        if secs == 0 {
            return Err(ConfigError::Invalid {
                name,
                value: "0".into(),
                reason: "must be at least one second",
            });
        }
        Ok(Duration::from_secs(secs))
    }

    fn flag_or(&self, name: &'static str, default: bool) -> Result<bool, ConfigError> {
        let Some(value) = self.get(name) else {
            return Ok(default);
        };
        match value.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(ConfigError::Invalid {
                name,
                value,
                reason: "expected true/false, 1/0 or yes/no",
            }),
        }
    }
}
