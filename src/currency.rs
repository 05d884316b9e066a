use iso_currency::Currency;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::debug;

/// Currency for symbols that match no suffix rule and carry no upstream currency.
pub const BASE_CURRENCY: Currency = Currency::USD;

/// Currency hint reported for a batch in which no symbol produced a record.
pub const DEFAULT_BATCH_CURRENCY: Currency = Currency::INR;

/// Maps an exchange suffix such as `.NS` onto the local currency of that exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuffixRule {
    pub suffix: String,
    pub currency: Currency,
}

impl SuffixRule {
    pub fn new<S: Into<String>>(suffix: S, currency: Currency) -> Self {
        Self {
            suffix: suffix.into(),
            currency,
        }
    }

    fn matches(&self, symbol: &str) -> bool {
        if self.suffix.is_empty() || symbol.len() <= self.suffix.len() {
            return false;
        }
        symbol
            .get(symbol.len() - self.suffix.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(&self.suffix))
    }
}

fn matching_rule<'r>(symbol: &str, rules: &'r [SuffixRule]) -> Option<&'r SuffixRule> {
    rules.iter().find(|rule| rule.matches(symbol))
}

/// The symbol without the first exchange suffix in `rules` that it carries.
pub fn strip_suffix<'a>(symbol: &'a str, rules: &[SuffixRule]) -> &'a str {
    match matching_rule(symbol, rules) {
        Some(rule) => &symbol[..symbol.len() - rule.suffix.len()],
        None => symbol,
    }
}

/// National Stock Exchange and Bombay Stock Exchange listings quote in rupees.
pub fn default_suffix_rules() -> Vec<SuffixRule> {
    vec![
        SuffixRule::new(".NS", Currency::INR),
        SuffixRule::new(".BO", Currency::INR),
    ]
}

pub trait CurrencyResolver: Send + Sync + Debug {
    /// Picks the currency a quote for `symbol` is denominated in.
    fn resolve(&self, symbol: &str, upstream: Option<&str>) -> Currency;
}

/// Trusts a recognised upstream currency code, otherwise infers one from the symbol suffix.
#[derive(Debug, Clone, PartialEq)]
pub struct SuffixCurrencyResolver {
    rules: Vec<SuffixRule>,
    base: Currency,
}

impl Default for SuffixCurrencyResolver {
    fn default() -> Self {
        Self::new(default_suffix_rules(), BASE_CURRENCY)
    }
}

impl SuffixCurrencyResolver {
    pub fn new(rules: Vec<SuffixRule>, base: Currency) -> Self {
        Self { rules, base }
    }

    pub fn infer(&self, symbol: &str) -> Currency {
        matching_rule(symbol, &self.rules)
            .map(|rule| rule.currency)
            .unwrap_or(self.base)
    }
}

impl CurrencyResolver for SuffixCurrencyResolver {
    fn resolve(&self, symbol: &str, upstream: Option<&str>) -> Currency {
        match upstream.map(str::trim).filter(|code| !code.is_empty()) {
            Some(code) => match Currency::from_code(code) {
                Some(currency) => currency,
                None => {
                    debug!("Unrecognised currency code {} for {}, inferring", code, symbol);
                    self.infer(symbol)
                }
            },
            None => self.infer(symbol),
        }
    }
}
