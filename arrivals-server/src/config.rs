//! Application configuration.
//!
//! Everything is read once at startup from environment variables (a `.env`
//! file is loaded first by `main`). Nothing is reloaded while running.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;

use crate::cta::FeedConfig;
use crate::refresh::RefreshConfig;

/// Errors loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is unset or empty
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable could not be parsed
    #[error("invalid {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    /// Feed timeout would let one fetch overrun the next tick
    #[error("feed timeout ({timeout_secs}s) must be shorter than the refresh interval ({interval_secs}s)")]
    TimeoutTooLong {
        timeout_secs: u64,
        interval_secs: u64,
    },
}

/// Full application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Upstream feed settings.
    pub feed: FeedConfig,

    /// Refresh loop settings.
    pub refresh: RefreshConfig,

    /// Address the HTTP server binds to.
    pub listen_addr: SocketAddr,

    /// Serve this JSON file instead of calling the live feed.
    pub mock_feed_file: Option<String>,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration using `lookup` to read each variable.
    ///
    /// | Variable                | Default               |
    /// |-------------------------|-----------------------|
    /// | `TRAIN_API_KEY`         | required unless mock  |
    /// | `STATION_ID`            | `40540` (Wilson)      |
    /// | `REFRESH_INTERVAL_SECS` | `10`                  |
    /// | `MAX_PER_DIRECTION`     | `2`                   |
    /// | `TIMEZONE`              | `America/Chicago`     |
    /// | `FEED_BASE_URL`         | CTA production        |
    /// | `FEED_TIMEOUT_SECS`     | `5`                   |
    /// | `ROUTE_FILTER`          | none                  |
    /// | `STOP_FILTER`           | none                  |
    /// | `MAX_RESULTS`           | none                  |
    /// | `LISTEN_ADDR`           | `127.0.0.1:3000`      |
    /// | `MOCK_FEED_FILE`        | none                  |
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mock_feed_file = get("MOCK_FEED_FILE");

        let api_key = match get("TRAIN_API_KEY") {
            Some(key) => key,
            None if mock_feed_file.is_some() => String::new(),
            None => return Err(ConfigError::Missing("TRAIN_API_KEY")),
        };

        let mut feed = FeedConfig::new(api_key);
        if let Some(station) = get("STATION_ID") {
            feed = feed.with_station(station);
        }
        if let Some(url) = get("FEED_BASE_URL") {
            feed = feed.with_base_url(url);
        }
        if let Some(secs) = parse_var::<u64>(&get, "FEED_TIMEOUT_SECS")? {
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    key: "FEED_TIMEOUT_SECS",
                    value: secs.to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }
            feed = feed.with_timeout(secs);
        }
        if let Some(route) = get("ROUTE_FILTER") {
            feed = feed.with_route(route);
        }
        if let Some(stop) = get("STOP_FILTER") {
            feed = feed.with_stop(stop);
        }
        if let Some(max) = parse_var::<u32>(&get, "MAX_RESULTS")? {
            feed = feed.with_max_results(max);
        }

        let mut refresh = RefreshConfig::default();
        if let Some(secs) = parse_var::<u64>(&get, "REFRESH_INTERVAL_SECS")? {
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    key: "REFRESH_INTERVAL_SECS",
                    value: secs.to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }
            refresh.interval = Duration::from_secs(secs);
        }
        if let Some(max) = parse_var::<usize>(&get, "MAX_PER_DIRECTION")? {
            refresh.max_per_direction = max;
        }
        if let Some(tz) = get("TIMEZONE") {
            refresh.timezone = Tz::from_str(tz.trim()).map_err(|e| ConfigError::Invalid {
                key: "TIMEZONE",
                value: tz.clone(),
                reason: e.to_string(),
            })?;
        }

        let listen_addr = parse_var::<SocketAddr>(&get, "LISTEN_ADDR")?
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));

        let config = Self {
            feed,
            refresh,
            listen_addr,
            mock_feed_file,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.timeout() >= self.refresh.interval {
            return Err(ConfigError::TimeoutTooLong {
                timeout_secs: self.feed.timeout_secs,
                interval_secs: self.refresh.interval.as_secs(),
            });
        }
        Ok(())
    }

    /// Age after which published data is reported as stale.
    pub fn stale_after(&self) -> Duration {
        self.refresh.interval * 3
    }
}

fn parse_var<T>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get(key)
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::Invalid {
                    key,
                    value: value.clone(),
                    reason: e.to_string(),
                })
        })
        .transpose()
}
