//! Server configuration.

use std::time::Duration;

use backgammon_session::SessionConfig;

use crate::BackgammonError;

/// Default address for [`ServerConfig::default`].
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5050";

/// How often a connection is pinged.
pub const DEFAULT_PING_INTERVAL: Duration = Duration::from_secs(25);

/// How long a connection may go without any frame, pongs included,
/// before it is treated as gone.
pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(60);

/// Everything needed to start a server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the WebSocket listener binds to.
    pub bind_addr: String,

    /// Close a connection that sends nothing for this long. `None` keeps
    /// silent connections open indefinitely.
    pub idle_timeout: Option<Duration>,

    /// Interval between liveness pings.
    pub ping_interval: Duration,

    /// Drop a connection that answers nothing, not even a ping, for this
    /// long.
    pub ping_timeout: Duration,

    pub session: SessionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            idle_timeout: None,
            ping_interval: DEFAULT_PING_INTERVAL,
            ping_timeout: DEFAULT_PING_TIMEOUT,
            session: SessionConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Reads `HOST` (default `0.0.0.0`), `PORT` (default `5050`),
    /// `IDLE_TIMEOUT_SECS` (optional), `PING_INTERVAL_SECS` (default 25)
    /// and `PING_TIMEOUT_SECS` (default 60) from the process environment.
    pub fn from_env() -> Result<Self, BackgammonError> {
        Self::from_lookup(|key: &str| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BackgammonError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| BackgammonError::Config(format!("PORT must be a port number, got {raw:?}")))?,
            None => 5050,
        };
        let idle_timeout = seconds(&lookup, "IDLE_TIMEOUT_SECS")?;
        let ping_interval =
            seconds(&lookup, "PING_INTERVAL_SECS")?.unwrap_or(DEFAULT_PING_INTERVAL);
        let ping_timeout =
            seconds(&lookup, "PING_TIMEOUT_SECS")?.unwrap_or(DEFAULT_PING_TIMEOUT);
        if ping_interval.is_zero() {
            return Err(BackgammonError::Config("PING_INTERVAL_SECS must be positive".into()));
        }

        Ok(Self {
            bind_addr: format!("{host}:{port}"),
            idle_timeout,
            ping_interval,
            ping_timeout,
            session: SessionConfig::default(),
        })
    }
}

fn seconds(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<Duration>, BackgammonError> {
    lookup(key)
        .map(|raw| {
            raw.parse::<u64>().map(Duration::from_secs).map_err(|_| {
                BackgammonError::Config(format!("{key} must be a number of seconds, got {raw:?}"))
            })
        })
        .transpose()
}
