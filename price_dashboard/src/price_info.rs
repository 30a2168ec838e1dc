use chrono::{
    DateTime,
    Local,
};

use serde::{
    Deserialize,
    Serialize,
};

use strum::{
    Display,
    EnumIter,
    EnumString,
    IntoEnumIterator,
};



/// Trading pairs the operator can choose from on the dashboard.
///
/// Only this closed set is offered for selection. The fetcher itself accepts
/// any string and leaves validation to the upstream endpoint.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    Hash,
    Eq,
    PartialEq,
)]
#[strum(ascii_case_insensitive)]
pub enum Symbol {
    #[default]
    BTCUSDT,
    ETHUSDT,
    LTCUSDT,
}



impl Symbol {
    /// Human readable label shown in the symbol selector.
    pub fn label(&self) -> &'static str {
        match self {
            Symbol::BTCUSDT => "Bitcoin (BTC/USDT)",
            Symbol::ETHUSDT => "Ethereum (ETH/USDT)",
            Symbol::LTCUSDT => "Litecoin (LTC/USDT)",
        }
    }


    pub fn all() -> Vec<Symbol> {
        Symbol::iter().collect()
    }
}



/// One observed price.
///
/// `symbol` - trading pair as it was sent to the endpoint.
/// `price` - last trade price, quote asset per one base asset.
/// `fetched_at` - local wall-clock time when the price was received.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    pub fetched_at: DateTime<Local>,
}



impl Quote {
    pub fn new(symbol: &str, price: f64, fetched_at: DateTime<Local>) -> Self {
        Self {
            symbol: symbol.to_string(),
            price,
            fetched_at,
        }
    }


    /// Timestamp formatted with second resolution, as shown on the chart.
    pub fn time_label(&self) -> String {
        self.fetched_at.format("%H:%M:%S").to_string()
    }
}
