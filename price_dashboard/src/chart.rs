use serde::Serialize;

use crate::{
    history::History,
    price_info::Symbol,
};



/// Everything the page needs to draw one line chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartDescription {
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub title: String,
}



impl ChartDescription {
    pub fn from_history(symbol: Symbol, history: &History) -> Self {
        Self {
            x: history.time_labels(),
            y: history.prices(),
            title: format!("Real-time price: {}", symbol),
        }
    }


    /// Chart without points, `title` carries the message for the operator.
    pub fn empty(title: impl Into<String>) -> Self {
        Self {
            x: Vec::new(),
            y: Vec::new(),
            title: title.into(),
        }
    }
}



/// State handed to the presentation layer after every tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub symbol: Symbol,
    pub chart: ChartDescription,
    pub status: String,
}



impl Snapshot {
    /// Placeholder published before the first tick completes.
    pub fn waiting(symbol: Symbol) -> Self {
        Self {
            symbol,
            chart: ChartDescription::empty("Waiting for first quote"),
            status: String::new(),
        }
    }
}



#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_chart_from_history_keeps_pairs_aligned() {
        let mut history = History::default();
        history.push("10:00:00".to_string(), 1.0);
        history.push("10:00:10".to_string(), 2.0);

        let chart = ChartDescription::from_history(Symbol::LTCUSDT, &history);

        assert_eq!(chart.x, vec!["10:00:00", "10:00:10"]);
        assert_eq!(chart.y, vec![1.0, 2.0]);
        assert_eq!(chart.title, "Real-time price: LTCUSDT");
    }

    #[test]
    fn test_snapshot_serializes_for_the_page() {
        let value = serde_json::to_value(Snapshot::waiting(Symbol::BTCUSDT)).unwrap();

        assert_eq!(value["symbol"], "BTCUSDT");
        assert_eq!(value["chart"]["title"], "Waiting for first quote");
        assert_eq!(value["chart"]["x"].as_array().unwrap().len(), 0);
        assert_eq!(value["status"], "");
    }
}
