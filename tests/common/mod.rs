#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use tickerboard::{
    Error, QuoteProvider, Result, async_trait,
    models::{ChartEnvelope, ChartResult},
};
use tokio::sync::Barrier;

pub fn fixture(name: &str) -> String {
    let path = format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("missing fixture {path}: {e}"))
}

#[derive(Debug, Clone)]
pub enum Upstream {
    Json(String),
    Status(u16),
    Delayed(Duration, String),
    Panic,
}

/// In-process provider answering from canned upstream payloads.
#[derive(Debug, Default)]
pub struct FakeProvider {
    responses: HashMap<String, Upstream>,
    barrier: Option<Arc<Barrier>>,
    pub calls: AtomicUsize,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, symbol: &str, upstream: Upstream) -> Self {
        self.responses.insert(symbol.to_string(), upstream);
        self
    }

    pub fn json(self, symbol: &str, fixture_name: &str) -> Self {
        self.with(symbol, Upstream::Json(fixture(fixture_name)))
    }

    /// Every fetch waits until `parties` fetches are in flight at the same time.
    pub fn rendezvous(mut self, parties: usize) -> Self {
        self.barrier = Some(Arc::new(Barrier::new(parties)));
        self
    }
}

fn parse(body: &str) -> Result<ChartResult> {
    let envelope: ChartEnvelope = serde_json::from_str(body)?;
    envelope
        .into_first_result()
        .ok_or_else(|| Error::MissingData("no chart result".into()))
}

#[async_trait]
impl QuoteProvider for FakeProvider {
    async fn fetch_chart(&self, symbol: &str) -> Result<ChartResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }

        match self.responses.get(symbol) {
            Some(Upstream::Json(body)) => parse(body),
            Some(Upstream::Delayed(delay, body)) => {
                tokio::time::sleep(*delay).await;
                parse(body)
            }
            Some(Upstream::Status(code)) => Err(Error::UpstreamStatus {
                symbol: symbol.to_string(),
                status: reqwest::StatusCode::from_u16(*code).unwrap(),
            }),
            Some(Upstream::Panic) => panic!("provider blew up for {symbol}"),
            None => Err(Error::UpstreamStatus {
                symbol: symbol.to_string(),
                status: reqwest::StatusCode::NOT_FOUND,
            }),
        }
    }
}
