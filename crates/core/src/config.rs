//! Runtime configuration
//!
//! Built once at startup from the environment and handed to each client
//! constructor.

use std::time::Duration;

use crate::error::Error;
use crate::Result;

pub const SONGKICK_API_KEY: &str = "SONGKICK_API_KEY";
pub const SOUNDCLOUD_API_KEY: &str = "SOUNDCLOUD_API_KEY";
pub const SONGKICK_API_URL: &str = "SONGKICK_API_URL";
pub const SOUNDCLOUD_API_URL: &str = "SOUNDCLOUD_API_URL";
pub const MAX_CONCURRENCY: &str = "GIG_RADAR_MAX_CONCURRENCY";
pub const HTTP_TIMEOUT_SECS: &str = "GIG_RADAR_HTTP_TIMEOUT_SECS";

const DEFAULT_SONGKICK_URL: &str = "http://api.songkick.com/api/3.0";
const DEFAULT_SOUNDCLOUD_URL: &str = "http://api.soundcloud.com";
const DEFAULT_MAX_CONCURRENCY: usize = 16;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Endpoint and credential for one upstream service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Base URL without trailing slash
    pub base_url: String,
    pub api_key: String,
}

impl ServiceConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

/// HTTP client settings shared by both API clients
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            user_agent: format!("gig-radar/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Events directory (Songkick)
    pub songkick: ServiceConfig,
    /// Follow graph (SoundCloud)
    pub soundcloud: ServiceConfig,
    /// Cap on concurrent directory lookups; `None` means unbounded
    pub max_concurrency: Option<usize>,
    pub http: HttpConfig,
}

impl Config {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Credentials are checked Songkick first, then SoundCloud. Only
    /// presence is validated here; a wrong key surfaces on first use.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let songkick_key = required(&lookup, SONGKICK_API_KEY, "Songkick")?;
        let soundcloud_key = required(&lookup, SOUNDCLOUD_API_KEY, "Soundcloud")?;

        let songkick_url =
            lookup(SONGKICK_API_URL).unwrap_or_else(|| DEFAULT_SONGKICK_URL.to_string());
        let soundcloud_url =
            lookup(SOUNDCLOUD_API_URL).unwrap_or_else(|| DEFAULT_SOUNDCLOUD_URL.to_string());

        let max_concurrency = match lookup(MAX_CONCURRENCY) {
            Some(raw) => parse_concurrency(&raw)?,
            None => Some(DEFAULT_MAX_CONCURRENCY),
        };

        let mut http = HttpConfig::default();
        if let Some(raw) = lookup(HTTP_TIMEOUT_SECS) {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                Error::InvalidConfig(format!("{} must be a number of seconds, got '{}'", HTTP_TIMEOUT_SECS, raw))
            })?;
            if secs == 0 {
                return Err(Error::InvalidConfig(format!(
                    "{} must be at least 1 second",
                    HTTP_TIMEOUT_SECS
                )));
            }
            http.timeout = Duration::from_secs(secs);
        }

        Ok(Self {
            songkick: ServiceConfig::new(songkick_url, songkick_key),
            soundcloud: ServiceConfig::new(soundcloud_url, soundcloud_key),
            max_concurrency,
            http,
        })
    }
}

fn required<F>(lookup: &F, var: &'static str, service: &'static str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::MissingCredential { service, var }),
    }
}

/// Parse a concurrency cap; `0` and `unbounded` disable the cap
pub fn parse_concurrency(raw: &str) -> Result<Option<usize>> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "0" | "unbounded" | "none" => Ok(None),
        value => value.parse::<usize>().map(Some).map_err(|_| {
            Error::InvalidConfig(format!("{} must be a positive integer, got '{}'", MAX_CONCURRENCY, raw))
        }),
    }
}
