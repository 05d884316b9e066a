use super::normalize::Normalizer;
use crate::{
    Error, Result,
    config::{Config, DEFAULT_WINDOW},
    currency::{
        CurrencyResolver, DEFAULT_BATCH_CURRENCY, SuffixCurrencyResolver, SuffixRule,
        default_suffix_rules,
    },
    models::{BatchQuotes, QuoteRecord},
    provider::{QuoteProvider, YahooChartProvider},
};
use iso_currency::Currency;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Fans a batch of symbols out to the provider and joins the normalized results.
#[derive(Debug, Clone)]
pub struct QuoteService {
    provider: Arc<dyn QuoteProvider>,
    normalizer: Arc<Normalizer>,
    batch_currency: Currency,
}

#[bon::bon]
impl QuoteService {
    #[builder]
    pub fn new(
        provider: Arc<dyn QuoteProvider>,
        resolver: Option<Arc<dyn CurrencyResolver>>,
        #[builder(default = DEFAULT_WINDOW)] window: usize,
        #[builder(default = DEFAULT_BATCH_CURRENCY)] batch_currency: Currency,
        #[builder(default = default_suffix_rules())] suffix_rules: Vec<SuffixRule>,
    ) -> Self {
        let resolver = resolver.unwrap_or_else(|| Arc::new(SuffixCurrencyResolver::default()));
        Self {
            provider,
            normalizer: Arc::new(Normalizer::new(window, resolver, suffix_rules)),
            batch_currency,
        }
    }
}

impl QuoteService {
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::builder()
            .provider(Arc::new(YahooChartProvider::new(config)?))
            .resolver(Arc::new(config.currency_resolver()))
            .window(config.window)
            .batch_currency(config.batch_currency)
            .suffix_rules(config.suffix_rules.clone())
            .build())
    }

    /// Fetches every symbol concurrently and returns the ones that produced usable data.
    ///
    /// Only an invalid symbol list fails the batch. Symbols whose upstream call fails, or whose
    /// payload is unusable, are left out of the result.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_batch(&self, symbols: &[String]) -> Result<BatchQuotes> {
        validate_symbols(symbols)?;
        tracing::info!("Fetching quotes for {} symbols", symbols.len());

        let slots = self.dispatch(symbols).await;
        let batch = assemble(slots, self.batch_currency);

        tracing::info!(
            "Batch completed - Requested: {}, Retrieved: {}, Absent: {}",
            symbols.len(),
            batch.len(),
            symbols.len() - batch.len()
        );
        Ok(batch)
    }

    async fn dispatch(&self, symbols: &[String]) -> Vec<Option<QuoteRecord>> {
        let mut tasks = JoinSet::new();

        for (slot, symbol) in symbols.iter().enumerate() {
            let provider = Arc::clone(&self.provider);
            let normalizer = Arc::clone(&self.normalizer);
            let symbol = symbol.clone();

            tasks.spawn(async move {
                let outcome = provider.fetch_chart(&symbol).await;
                (slot, normalizer.normalize(&symbol, outcome))
            });
        }

        let mut slots: Vec<Option<QuoteRecord>> = vec![None; symbols.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((slot, quote)) => slots[slot] = quote,
                Err(e) => tracing::error!("Quote task failed: {}", e),
            }
        }
        slots
    }
}

pub fn validate_symbols(symbols: &[String]) -> Result<()> {
    if symbols.is_empty() {
        return Err(Error::SymbolsNotSpecified);
    }
    match symbols.iter().position(|symbol| symbol.is_empty()) {
        Some(index) => Err(Error::InvalidSymbol(index)),
        None => Ok(()),
    }
}

/// Drops absent slots and picks the batch currency hint from the first remaining quote.
pub fn assemble(slots: Vec<Option<QuoteRecord>>, default_currency: Currency) -> BatchQuotes {
    let stock_data: Vec<QuoteRecord> = slots.into_iter().flatten().collect();
    let currency = stock_data
        .first()
        .map(|quote| quote.currency)
        .unwrap_or(default_currency);
    BatchQuotes {
        stock_data,
        currency,
    }
}
