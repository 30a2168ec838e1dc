//! Error types used across the service.
//!
//! Quote errors are caught by the polling loop and turned into an error chart,
//! everything else is a start-up failure that stops the process.



use std::io;

use thiserror::Error;



/// Failure of a single price fetch.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// Endpoint answered, but the body does not contain a usable price. This
    /// covers unknown symbols, API error payloads and malformed bodies.
    #[error("could not fetch quote for {symbol}")]
    QuoteUnavailable { symbol: String },

    /// Request never produced a body: DNS, refused connection, timeout.
    #[error("could not reach quote endpoint for {symbol}: {source}")]
    Transport {
        symbol: String,
        #[source]
        source: reqwest::Error,
    },
}



impl QuoteError {
    pub fn unavailable(symbol: &str) -> Self {
        QuoteError::QuoteUnavailable { symbol: symbol.to_string() }
    }


    /// Symbol of the request that failed.
    pub fn symbol(&self) -> &str {
        match self {
            QuoteError::QuoteUnavailable { symbol } => symbol,
            QuoteError::Transport { symbol, .. } => symbol,
        }
    }
}



/// Invalid value found while loading configuration from environment.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a positive whole number, got {value:?}")]
    NotPositive { name: &'static str, value: String },

    #[error("{name} must not be larger than {max}, got {value:?}")]
    OutOfRange { name: &'static str, value: String, max: u64 },

    #[error("{name} is not a valid socket address: {value:?}")]
    BadAddress { name: &'static str, value: String },

    #[error("{name} names an unsupported symbol: {value:?}")]
    UnknownSymbol { name: &'static str, value: String },

    #[error("{name} is not a log level: {value:?}")]
    BadLogLevel { name: &'static str, value: String },
}



/// Errors that stop the service during start-up or serving.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("could not build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}



/// Service-wide `Result` alias with `ServiceError` as the default error.
pub type Result<T, E = ServiceError> = std::result::Result<T, E>;
