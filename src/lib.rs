pub mod config;
pub mod currency;
pub mod error;
pub mod handler;
pub mod models;
pub mod provider;
pub mod quote;

mod utils;

pub(crate) static UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36";

pub type Result<T> = std::result::Result<T, Error>;

pub use error::Error;

// Re-exporting some commonly used types
pub use async_trait::async_trait;
pub use iso_currency::Currency;
pub use crate::config::Config;
pub use crate::currency::{CurrencyResolver, SuffixCurrencyResolver, SuffixRule};
pub use crate::handler::{QuoteHandler, QuoteResponse};
pub use crate::models::{BatchQuotes, ChartPoint, QuoteRecord, QuoteRequest};
pub use crate::provider::{QuoteProvider, YahooChartProvider};
pub use crate::quote::QuoteService;
