use std::{
    env,
    net::SocketAddr,
    time::Duration,
};

use tracing::Level;

use crate::{
    error::ConfigError,
    history::DEFAULT_CAPACITY,
    price_fetcher::BINANCE_TICKER_URL,
    price_info::Symbol,
};



/// Service configuration, loaded from environment (and `.env`, see `main`).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub price_url: String,
    pub poll_period: Duration,
    pub request_timeout: Duration,
    pub history_len: usize,
    pub default_symbol: Symbol,
    pub bind_addr: SocketAddr,
    pub log_level: Level,
}



/// Longest accepted poll period or request timeout, one day.
pub const MAX_PERIOD_SECS: u64 = 24 * 60 * 60;

/// Most points the chart history may be configured to keep.
pub const MAX_HISTORY_LEN: u64 = 10_000;



// Look variable up or fall back to default value.
macro_rules! load_or_default {
    ($lookup:expr, $name:expr, $default:expr) => {{
        match $lookup($name) {
            Some(val) => val,
            None => $default.to_string(),
        }
    }}
}



impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }


    /// Build configuration from arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
        where F: Fn(&str) -> Option<String>
    {
        let price_url = load_or_default!(lookup, "PRICE_URL", BINANCE_TICKER_URL);

        let poll_period = load_or_default!(lookup, "POLL_PERIOD_SECS", "10");
        let poll_period = Duration::from_secs(
            positive("POLL_PERIOD_SECS", &poll_period, MAX_PERIOD_SECS)?
        );

        let request_timeout = load_or_default!(lookup, "REQUEST_TIMEOUT_SECS", "5");
        let request_timeout = Duration::from_secs(
            positive("REQUEST_TIMEOUT_SECS", &request_timeout, MAX_PERIOD_SECS)?
        );

        let history_len = load_or_default!(lookup, "HISTORY_LEN", DEFAULT_CAPACITY);
        let history_len = positive("HISTORY_LEN", &history_len, MAX_HISTORY_LEN)? as usize;

        let default_symbol = load_or_default!(lookup, "DEFAULT_SYMBOL", Symbol::default());
        let Ok(default_symbol) = default_symbol.trim().parse::<Symbol>() else {
            return Err(ConfigError::UnknownSymbol {
                name: "DEFAULT_SYMBOL",
                value: default_symbol,
            })
        };

        let bind_addr = load_or_default!(lookup, "BIND_ADDR", "127.0.0.1:8050");
        let Ok(bind_addr) = bind_addr.trim().parse::<SocketAddr>() else {
            return Err(ConfigError::BadAddress { name: "BIND_ADDR", value: bind_addr })
        };

        let log_level = load_or_default!(lookup, "LOG_LEVEL", "info");
        let Ok(log_level) = log_level.trim().parse::<Level>() else {
            return Err(ConfigError::BadLogLevel { name: "LOG_LEVEL", value: log_level })
        };

        Ok(Self {
            price_url,
            poll_period,
            request_timeout,
            history_len,
            default_symbol,
            bind_addr,
            log_level,
        })
    }
}



// Parse whole number in `1..=max`.
fn positive(name: &'static str, value: &str, max: u64) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(val) if val > max => Err(ConfigError::OutOfRange { name, value: value.to_string(), max }),
        Ok(val) if val > 0 => Ok(val),
        _ => Err(ConfigError::NotPositive { name, value: value.to_string() }),
    }
}
