use crate::{
    Error, Result,
    config::Config,
    models::{BatchQuotes, ErrorBody, QuoteRequest},
    quote::QuoteService,
};
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Quotes(BatchQuotes),
    Error(ErrorBody),
}

/// Status and JSON body returned to a dashboard caller.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteResponse {
    pub status: StatusCode,
    pub body: ResponseBody,
}

impl QuoteResponse {
    pub fn ok(batch: BatchQuotes) -> Self {
        Self {
            status: StatusCode::OK,
            body: ResponseBody::Quotes(batch),
        }
    }

    pub fn from_error(err: &Error) -> Self {
        Self {
            status: err.status(),
            body: ResponseBody::Error(ErrorBody {
                error: err.to_string(),
            }),
        }
    }

    pub fn quotes(&self) -> Option<&BatchQuotes> {
        match &self.body {
            ResponseBody::Quotes(batch) => Some(batch),
            ResponseBody::Error(_) => None,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.body)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.body)?)
    }
}

pub fn parse_request(body: &str) -> Result<QuoteRequest> {
    serde_json::from_str(body).map_err(|e| Error::BadRequest(e.to_string()))
}

/// Maps raw `{ "symbols": [...] }` request bodies onto quote batches.
#[derive(Debug, Clone)]
pub struct QuoteHandler {
    service: QuoteService,
}

impl QuoteHandler {
    pub fn new(service: QuoteService) -> Self {
        Self { service }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(QuoteService::from_config(config)?))
    }

    #[tracing::instrument(skip_all)]
    pub async fn handle(&self, body: &str) -> QuoteResponse {
        match self.try_handle(body).await {
            Ok(batch) => QuoteResponse::ok(batch),
            Err(e) => {
                error!("Error in quote request: {}", e);
                QuoteResponse::from_error(&e)
            }
        }
    }

    async fn try_handle(&self, body: &str) -> Result<BatchQuotes> {
        let request = parse_request(body)?;
        info!("Fetching stock data for symbols: {:?}", request.symbols);
        self.service.fetch_batch(&request.symbols).await
    }
}
