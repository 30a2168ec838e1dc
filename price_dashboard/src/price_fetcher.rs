use std::time::Duration;

use async_trait::async_trait;

use chrono::Local;

use reqwest::Client;

use serde::Deserialize;

use crate::{
    error::QuoteError,
    price_info::Quote,
};



/// Public Binance endpoint returning the last trade price for one symbol.
pub const BINANCE_TICKER_URL: &str = "https://api.binance.com/api/v3/ticker/price";



/// Anything that can produce the latest price for a trading pair.
///
/// Polling loop is written against this trait, so tests can drive it with
/// scripted prices instead of the network.
#[async_trait]
pub trait PriceSource {
    async fn fetch_price(&self, symbol: &str) -> Result<f64, QuoteError>;


    /// Fetch price and stamp it with local wall-clock time.
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, QuoteError> {
        let price = self.fetch_price(symbol).await?;

        Ok(Quote::new(symbol, price, Local::now()))
    }
}



/// HTTP price fetcher for Binance-style ticker endpoints.
pub struct PriceFetcher {
    client: Client,
    url: String,
}



impl PriceFetcher {
    /// Build fetcher for `url`, every request is cut off after `timeout`.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }


    pub fn url(&self) -> &str {
        &self.url
    }


    // Symbol goes into the query string as is, upstream decides whether it is
    // valid.
    fn request(&self, symbol: &str) -> reqwest::RequestBuilder {
        self.client
            .get(&self.url)
            .query(&[("symbol", symbol)])
    }
}



#[async_trait]
impl PriceSource for PriceFetcher {
    async fn fetch_price(&self, symbol: &str) -> Result<f64, QuoteError> {
        let transport = |source| QuoteError::Transport {
            symbol: symbol.to_string(),
            source,
        };

        // Status is not checked on purpose: error payloads come back with 4xx
        // and are handled the same way as any body without a price.
        let response = self.request(symbol).send().await.map_err(transport)?;
        let body = response.text().await.map_err(transport)?;

        let price = price_from_body(symbol, &body);
        if let Err(ref e) = price {
            tracing::debug!("{}, body: {}", e, body);
        }

        price
    }
}



/// Price as the endpoint sends it. Binance uses decimal strings, plain JSON
/// numbers are accepted as well.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
enum DecodedPrice {
    Text(String),
    Number(f64),
}



#[derive(Deserialize, Debug, Clone)]
struct DecodedTicker {
    price: Option<DecodedPrice>,
}



/// Extract price from ticker response body.
///
/// Anything that does not lead to a finite number, including bodies that are
/// not JSON at all, is reported as `QuoteUnavailable` for `symbol`.
pub fn price_from_body(symbol: &str, body: &str) -> Result<f64, QuoteError> {
    let Ok(decoded) = serde_json::from_str::<DecodedTicker>(body) else {
        return Err(QuoteError::unavailable(symbol))
    };

    let price = match decoded.price {
        Some(DecodedPrice::Text(text)) => text.trim().parse::<f64>().ok(),
        Some(DecodedPrice::Number(num)) => Some(num),
        None => None,
    };

    match price {
        Some(price) if price.is_finite() => Ok(price),
        _ => Err(QuoteError::unavailable(symbol)),
    }
}
