use crate::{
    Error, Result,
    currency::{
        BASE_CURRENCY, DEFAULT_BATCH_CURRENCY, SuffixCurrencyResolver, SuffixRule,
        default_suffix_rules,
    },
};
use bon::Builder;
use iso_currency::Currency;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_RANGE: &str = "1d";
pub const DEFAULT_INTERVAL: &str = "5m";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Number of most recent samples kept in a quote's chart series.
pub const DEFAULT_WINDOW: usize = 20;

const ENV_PREFIX: &str = "TICKERBOARD_";

#[derive(Debug, Clone, PartialEq, Builder)]
pub struct Config {
    #[builder(into, default = DEFAULT_BASE_URL.to_string())]
    pub base_url: String,
    #[builder(into, default = DEFAULT_RANGE.to_string())]
    pub range: String,
    #[builder(into, default = DEFAULT_INTERVAL.to_string())]
    pub interval: String,
    #[builder(into, default = crate::UA.to_string())]
    pub user_agent: String,
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,
    #[builder(default = DEFAULT_WINDOW)]
    pub window: usize,
    #[builder(default = BASE_CURRENCY)]
    pub base_currency: Currency,
    #[builder(default = DEFAULT_BATCH_CURRENCY)]
    pub batch_currency: Currency,
    #[builder(default = default_suffix_rules())]
    pub suffix_rules: Vec<SuffixRule>,
}

impl Default for Config {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Config {
    /// Reads `TICKERBOARD_*` variables, keeping the default for every variable that is unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(format!("{ENV_PREFIX}{name}").as_str())
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Config::default();
        if let Some(base_url) = get("BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(range) = get("RANGE") {
            config.range = range;
        }
        if let Some(interval) = get("INTERVAL") {
            config.interval = interval;
        }
        if let Some(user_agent) = get("USER_AGENT") {
            config.user_agent = user_agent;
        }
        if let Some(secs) = get("TIMEOUT_SECS") {
            let secs = secs
                .parse::<u64>()
                .map_err(|_| Error::Config(format!("TIMEOUT_SECS is not a number: {secs}")))?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(window) = get("WINDOW") {
            config.window = window
                .parse()
                .map_err(|_| Error::Config(format!("WINDOW is not a number: {window}")))?;
        }
        if let Some(code) = get("BASE_CURRENCY") {
            config.base_currency = parse_currency(&code)?;
        }
        if let Some(code) = get("BATCH_CURRENCY") {
            config.batch_currency = parse_currency(&code)?;
        }
        if let Some(rules) = get("SUFFIXES") {
            config.suffix_rules = parse_suffix_rules(&rules)?;
        }

        config.validate()?;
        debug!("Loaded config: {:?}", config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window == 0 {
            return Err(Error::Config("series window must be positive".into()));
        }
        if self.timeout.is_zero() {
            warn!("Upstream timeout is zero, requests will fail immediately");
        }
        url::Url::parse(&self.base_url)?;
        Ok(())
    }

    pub fn currency_resolver(&self) -> SuffixCurrencyResolver {
        SuffixCurrencyResolver::new(self.suffix_rules.clone(), self.base_currency)
    }
}

fn parse_currency(code: &str) -> Result<Currency> {
    Currency::from_code(&code.to_ascii_uppercase())
        .ok_or_else(|| Error::Config(format!("unknown currency code {code}")))
}

/// Parses `.NS=INR,.BO=INR` into suffix rules.
fn parse_suffix_rules(raw: &str) -> Result<Vec<SuffixRule>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| -> Result<SuffixRule> {
            let (suffix, code) = entry
                .split_once('=')
                .ok_or_else(|| Error::Config(format!("suffix rule without '=': {entry}")))?;
            let suffix = suffix.trim();
            if suffix.is_empty() {
                return Err(Error::Config(format!("suffix rule without suffix: {entry}")));
            }
            Ok(SuffixRule::new(suffix, parse_currency(code.trim())?))
        })
        .collect()
}
