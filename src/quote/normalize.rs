use super::series::{build_series, exchange_offset};
use crate::{
    Error, Result,
    config::DEFAULT_WINDOW,
    currency::{
        CurrencyResolver, SuffixCurrencyResolver, SuffixRule, default_suffix_rules, strip_suffix,
    },
    models::{ChartMeta, ChartResult, QuoteRecord},
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Absolute and percentage change against the reference price.
///
/// A zero reference price yields a percentage of `0` rather than an infinity.
pub fn price_change(price: f64, previous_close: f64) -> (f64, f64) {
    let change = price - previous_close;
    if previous_close == 0.0 {
        return (change, 0.0);
    }
    let percent = change / previous_close * 100.0;
    (change, if percent.is_finite() { percent } else { 0.0 })
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn reference_price(meta: &ChartMeta, price: f64) -> f64 {
    [meta.previous_close, meta.chart_previous_close]
        .into_iter()
        .flatten()
        .find(|close| close.is_finite() && *close >= 0.0)
        .unwrap_or(price)
}

fn display_name(meta: &ChartMeta, symbol: &str, suffix_rules: &[SuffixRule]) -> String {
    non_empty(meta.short_name.as_ref())
        .or_else(|| non_empty(meta.long_name.as_ref()))
        .or_else(|| non_empty(meta.symbol.as_ref()))
        .unwrap_or_else(|| strip_suffix(symbol, suffix_rules))
        .to_string()
}

/// Maps upstream chart results onto quote records.
///
/// `suffix_rules` are stripped from a symbol to name it when upstream supplies no name.
#[derive(Debug, Clone)]
pub struct Normalizer {
    window: usize,
    resolver: Arc<dyn CurrencyResolver>,
    suffix_rules: Arc<[SuffixRule]>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(
            DEFAULT_WINDOW,
            Arc::new(SuffixCurrencyResolver::default()),
            default_suffix_rules(),
        )
    }
}

impl Normalizer {
    pub fn new(
        window: usize,
        resolver: Arc<dyn CurrencyResolver>,
        suffix_rules: Vec<SuffixRule>,
    ) -> Self {
        Self {
            window,
            resolver,
            suffix_rules: suffix_rules.into(),
        }
    }

    /// Fails with [`Error::MissingData`] when the result has no metadata, no positive market
    /// price, or only a placeholder quote block.
    pub fn normalize_chart(&self, symbol: &str, chart: &ChartResult) -> Result<QuoteRecord> {
        let missing = |what: &str| Error::MissingData(format!("{symbol}: {what}"));

        let meta = chart.meta.as_ref().ok_or_else(|| missing("no metadata"))?;
        let price = meta
            .regular_market_price
            .filter(|price| price.is_finite() && *price > 0.0)
            .ok_or_else(|| missing("no market price"))?;
        let closes = chart
            .first_quote()
            .and_then(|quote| quote.close.as_deref())
            .ok_or_else(|| missing("no quote indicators"))?;

        let previous_close = reference_price(meta, price);
        let (change, change_percent) = price_change(price, previous_close);
        let currency = self.resolver.resolve(symbol, meta.currency.as_deref());

        let timestamps = chart.timestamp.as_deref().unwrap_or_default();
        let offset = exchange_offset(meta.gmt_offset);
        let series = build_series(timestamps, closes, self.window, &offset);

        Ok(QuoteRecord {
            symbol: symbol.to_string(),
            display_name: display_name(meta, symbol, &self.suffix_rules),
            price,
            previous_close,
            change,
            change_percent,
            currency,
            series,
            market_state: non_empty(meta.market_state.as_ref()).map(str::to_string),
            exchange: non_empty(meta.exchange_name.as_ref()).map(str::to_string),
        })
    }

    /// Turns one fetch outcome into a record, or `None` when the symbol has no usable data.
    pub fn normalize(&self, symbol: &str, outcome: Result<ChartResult>) -> Option<QuoteRecord> {
        let chart = match outcome {
            Ok(chart) => chart,
            Err(e) => {
                warn!("Failed to fetch data for {}: {}", symbol, e);
                return None;
            }
        };

        match self.normalize_chart(symbol, &chart) {
            Ok(quote) => {
                debug!(
                    "Normalized {}: {} {} ({} points)",
                    symbol,
                    quote.price,
                    quote.currency.code(),
                    quote.series.len()
                );
                Some(quote)
            }
            Err(e) => {
                warn!("Invalid data structure for {}: {}", symbol, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IndicatorQuote, Indicators};
    use iso_currency::Currency;

    fn chart(price: Option<f64>, previous_close: Option<f64>) -> ChartResult {
        ChartResult {
            meta: Some(ChartMeta {
                regular_market_price: price,
                previous_close,
                ..Default::default()
            }),
            timestamp: Some(vec![1_700_000_000, 1_700_000_300]),
            indicators: Some(Indicators {
                quote: Some(vec![IndicatorQuote {
                    close: Some(vec![Some(1.0), Some(2.0)]),
                }]),
            }),
        }
    }

    fn normalizer() -> Normalizer {
        Normalizer::default()
    }

    #[test]
    fn test_price_change() {
        let (change, percent) = price_change(178.45, 176.11);
        assert!((change - 2.34).abs() < 1e-9);
        assert!((percent - 1.3287).abs() < 1e-3);

        let again = price_change(178.45, 176.11);
        assert_eq!(change.to_bits(), again.0.to_bits());
        assert_eq!(percent.to_bits(), again.1.to_bits());
    }

    #[test]
    fn test_price_change_zero_reference() {
        assert_eq!(price_change(12.5, 0.0), (12.5, 0.0));
        assert_eq!(price_change(0.0, 0.0), (0.0, 0.0));
        let (_, percent) = price_change(f64::MAX, f64::MIN_POSITIVE);
        assert_eq!(percent, 0.0);
    }

    #[test]
    fn test_missing_previous_close_means_no_change() {
        let quote = normalizer().normalize_chart("AAPL", &chart(Some(150.0), None)).unwrap();
        assert_eq!(quote.previous_close, 150.0);
        assert_eq!(quote.change, 0.0);
        assert_eq!(quote.change_percent, 0.0);
    }

    #[test]
    fn test_chart_previous_close_fallback() {
        let mut result = chart(Some(110.0), None);
        if let Some(meta) = result.meta.as_mut() {
            meta.chart_previous_close = Some(100.0);
        }
        let quote = normalizer().normalize_chart("AAPL", &result).unwrap();
        assert_eq!(quote.previous_close, 100.0);
        assert!((quote.change_percent - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_previous_close_is_finite() {
        let quote = normalizer().normalize_chart("AAPL", &chart(Some(5.0), Some(0.0))).unwrap();
        assert_eq!(quote.change, 5.0);
        assert_eq!(quote.change_percent, 0.0);
    }

    #[test]
    fn test_placeholder_payloads_are_absent() {
        let n = normalizer();
        assert!(n.normalize_chart("X", &ChartResult::default()).is_err());
        assert!(n.normalize_chart("X", &chart(None, Some(1.0))).is_err());
        assert!(n.normalize_chart("X", &chart(Some(0.0), Some(1.0))).is_err());
        assert!(n.normalize_chart("X", &chart(Some(f64::NAN), None)).is_err());

        let mut empty_quote = chart(Some(10.0), None);
        empty_quote.indicators = Some(Indicators {
            quote: Some(vec![IndicatorQuote::default()]),
        });
        assert!(n.normalize_chart("X", &empty_quote).is_err());

        let mut no_quotes = chart(Some(10.0), None);
        no_quotes.indicators = Some(Indicators { quote: Some(vec![]) });
        assert!(matches!(
            n.normalize_chart("X", &no_quotes),
            Err(Error::MissingData(_))
        ));
    }

    #[test]
    fn test_failed_outcome_is_absent() {
        let outcome = Err(Error::MissingData("BADSYM".into()));
        assert!(normalizer().normalize("BADSYM", outcome).is_none());
    }

    #[test]
    fn test_display_name_fallbacks() {
        let n = normalizer();
        let mut result = chart(Some(3500.0), None);
        let quote = n.normalize_chart("TCS.NS", &result).unwrap();
        assert_eq!(quote.display_name, "TCS");
        assert_eq!(quote.symbol, "TCS.NS");
        assert_eq!(quote.currency, Currency::INR);

        if let Some(meta) = result.meta.as_mut() {
            meta.symbol = Some("TCS.NS".into());
        }
        let quote = n.normalize_chart("TCS.NS", &result).unwrap();
        assert_eq!(quote.display_name, "TCS.NS");

        if let Some(meta) = result.meta.as_mut() {
            meta.long_name = Some("Tata Consultancy Services Limited".into());
        }
        let quote = n.normalize_chart("TCS.NS", &result).unwrap();
        assert_eq!(quote.display_name, "Tata Consultancy Services Limited");

        if let Some(meta) = result.meta.as_mut() {
            meta.short_name = Some("TATA CONSULTANCY SERV LT".into());
        }
        let quote = n.normalize_chart("TCS.NS", &result).unwrap();
        assert_eq!(quote.display_name, "TATA CONSULTANCY SERV LT");
    }

    #[test]
    fn test_display_name_strips_configured_suffixes() {
        let result = chart(Some(100.0), None);
        let london = Normalizer::new(
            20,
            Arc::new(SuffixCurrencyResolver::default()),
            vec![SuffixRule::new(".L", Currency::GBP)],
        );
        let quote = london.normalize_chart("VOD.L", &result).unwrap();
        assert_eq!(quote.display_name, "VOD");
        let quote = london.normalize_chart("TCS.NS", &result).unwrap();
        assert_eq!(quote.display_name, "TCS.NS");

        let bare = Normalizer::new(20, Arc::new(SuffixCurrencyResolver::default()), vec![]);
        let quote = bare.normalize_chart("TCS.NS", &result).unwrap();
        assert_eq!(quote.display_name, "TCS.NS");
        assert_eq!(quote.currency, Currency::INR);
    }

    #[test]
    fn test_passthrough_fields() {
        let mut result = chart(Some(10.0), None);
        if let Some(meta) = result.meta.as_mut() {
            meta.market_state = Some("REGULAR".into());
            meta.exchange_name = Some("NMS".into());
            meta.currency = Some("EUR".into());
        }
        let quote = normalizer().normalize_chart("SAP", &result).unwrap();
        assert_eq!(quote.market_state.as_deref(), Some("REGULAR"));
        assert_eq!(quote.exchange.as_deref(), Some("NMS"));
        assert_eq!(quote.currency, Currency::EUR);
        assert_eq!(quote.series.len(), 2);
    }
}
