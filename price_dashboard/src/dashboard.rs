//! State transitions of the polling dashboard.
//!
//! `Dashboard` owns the selected symbol and its price history. Every event is
//! handled in two steps: `target` decides which symbol to fetch, `record`
//! folds the fetch outcome into history and produces the snapshot for the
//! page. Neither step does I/O, the fetch in between is up to the caller.



use crate::{
    chart::{
        ChartDescription,
        Snapshot,
    },
    error::QuoteError,
    history::History,
    price_fetcher::PriceSource,
    price_info::{
        Quote,
        Symbol,
    },
};



/// What woke the polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Tick,
    SymbolChanged(Symbol),
}



#[derive(Debug, Clone)]
pub struct Dashboard {
    selected: Symbol,
    history: History,
}



impl Dashboard {
    pub fn new(selected: Symbol, history: History) -> Self {
        Self {
            selected,
            history,
        }
    }


    pub fn selected(&self) -> Symbol {
        self.selected
    }


    pub fn history(&self) -> &History {
        &self.history
    }


    /// Apply event and return symbol that must be fetched for it.
    ///
    /// Switching to another symbol drops collected history, otherwise the
    /// chart would join prices of two different pairs into one line.
    pub fn target(&mut self, event: Event) -> Symbol {
        if let Event::SymbolChanged(symbol) = event {
            if symbol != self.selected {
                tracing::info!("selected symbol changed {} -> {}", self.selected, symbol);
                self.selected = symbol;
                self.history.clear();
            }
        }

        self.selected
    }


    /// Fold fetch outcome into history and build snapshot for the page.
    ///
    /// Failed fetch leaves history untouched and shows an empty chart titled
    /// with the error.
    pub fn record(&mut self, outcome: Result<Quote, QuoteError>) -> Snapshot {
        match outcome {
            Ok(quote) => {
                let time_label = quote.time_label();
                self.history.push(time_label.clone(), quote.price);

                tracing::info!("current price for {}: {} at {}",
                    quote.symbol, quote.price, time_label
                );

                Snapshot {
                    symbol: self.selected,
                    chart: ChartDescription::from_history(self.selected, &self.history),
                    status: format!("current price: {} at {}", quote.price, time_label),
                }
            }

            Err(e) => {
                tracing::warn!("price fetch for {} failed: {}", e.symbol(), e);

                let message = e.to_string();
                Snapshot {
                    symbol: self.selected,
                    status: format!("error: {}", message),
                    chart: ChartDescription::empty(message),
                }
            }
        }
    }


    /// Handle one event end to end: pick symbol, fetch, record.
    pub async fn step<S>(&mut self, event: Event, source: &S) -> Snapshot
        where S: PriceSource + Sync + ?Sized
    {
        let symbol = self.target(event);
        let outcome = source.fetch_quote(&symbol.to_string()).await;

        self.record(outcome)
    }
}



impl Default for Dashboard {
    fn default() -> Self {
        Self::new(Symbol::default(), History::default())
    }
}
