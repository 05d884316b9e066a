//! Response shape of the upstream chart endpoint. Every field is optional because the provider
//! omits whatever it does not know about a symbol. Only fields the normalizer reads are declared,
//! so unexpected types elsewhere in the payload cannot fail the parse.

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartEnvelope {
    pub chart: ChartBody,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartBody {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartError {
    pub code: Option<String>,
    pub description: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartResult {
    pub meta: Option<ChartMeta>,
    pub timestamp: Option<Vec<i64>>,
    pub indicators: Option<Indicators>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartMeta {
    pub currency: Option<String>,
    pub symbol: Option<String>,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub exchange_name: Option<String>,
    pub market_state: Option<String>,
    pub regular_market_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub chart_previous_close: Option<f64>,
    #[serde(rename = "gmtoffset")]
    pub gmt_offset: Option<i32>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Indicators {
    pub quote: Option<Vec<IndicatorQuote>>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorQuote {
    pub close: Option<Vec<Option<f64>>>,
}

impl ChartEnvelope {
    /// First result of the envelope, which is the only one a single-symbol request produces.
    pub fn into_first_result(self) -> Option<ChartResult> {
        self.chart.result.and_then(|results| results.into_iter().next())
    }
}

impl ChartResult {
    pub fn first_quote(&self) -> Option<&IndicatorQuote> {
        self.indicators
            .as_ref()
            .and_then(|indicators| indicators.quote.as_ref())
            .and_then(|quotes| quotes.first())
    }
}
