pub mod yahoo;

pub use self::yahoo::YahooChartProvider;

use crate::{Result, models::ChartResult};
use async_trait::async_trait;
use std::fmt::Debug;

/// Source of quote and intraday history for a single symbol.
#[async_trait]
pub trait QuoteProvider: Send + Sync + Debug {
    async fn fetch_chart(&self, symbol: &str) -> Result<ChartResult>;
}
