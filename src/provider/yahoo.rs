use super::QuoteProvider;
use crate::{
    Error, Result,
    config::Config,
    models::{ChartEnvelope, ChartResult},
    utils::build_client,
};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

static CHART_PATH: &str = "v8/finance/chart/";

/// Reads quotes from the public Yahoo Finance chart endpoint.
#[derive(Debug, Clone)]
pub struct YahooChartProvider {
    client: Client,
    base_url: Url,
    range: String,
    interval: String,
}

impl YahooChartProvider {
    pub fn new(config: &Config) -> Result<Self> {
        let mut base_url = Url::parse(&config.base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            client: build_client(&config.user_agent, config.timeout)?,
            base_url,
            range: config.range.clone(),
            interval: config.interval.clone(),
        })
    }

    pub fn chart_url(&self, symbol: &str) -> Result<Url> {
        let mut url = self
            .base_url
            .join(&format!("{CHART_PATH}{}", urlencoding::encode(symbol)))?;
        url.query_pairs_mut()
            .append_pair("range", &self.range)
            .append_pair("interval", &self.interval);
        Ok(url)
    }
}

#[async_trait]
impl QuoteProvider for YahooChartProvider {
    #[tracing::instrument(skip(self))]
    async fn fetch_chart(&self, symbol: &str) -> Result<ChartResult> {
        let url = self.chart_url(symbol)?;
        debug!("Sending request to: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamStatus {
                symbol: symbol.to_string(),
                status,
            });
        }

        let body = response.bytes().await?;
        let envelope: ChartEnvelope = serde_json::from_slice(&body)?;
        if let Some(error) = &envelope.chart.error {
            warn!(
                "Upstream reported an error for {}: {}",
                symbol,
                error.description.as_deref().unwrap_or("unknown")
            );
        }

        envelope
            .into_first_result()
            .ok_or_else(|| Error::MissingData(format!("{symbol}: no chart result")))
    }
}
