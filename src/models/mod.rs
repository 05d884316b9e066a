pub mod chart;

pub use self::chart::*;

use iso_currency::Currency;
use serde::{Deserialize, Serialize};

/// Canonical quote for one symbol, built fresh for every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    pub symbol: String,
    #[serde(rename = "name")]
    pub display_name: String,
    pub price: f64,
    pub previous_close: f64,
    pub change: f64,
    pub change_percent: f64,
    pub currency: Currency,
    #[serde(rename = "chartData")]
    pub series: Vec<ChartPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Exchange-local wall-clock time, e.g. `09:35 AM`.
    pub time: String,
    pub timestamp: i64,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchQuotes {
    pub stock_data: Vec<QuoteRecord>,
    pub currency: Currency,
}

impl BatchQuotes {
    pub fn len(&self) -> usize {
        self.stock_data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stock_data.is_empty()
    }

    pub fn get(&self, symbol: &str) -> Option<&QuoteRecord> {
        self.stock_data.iter().find(|quote| quote.symbol == symbol)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub symbols: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
