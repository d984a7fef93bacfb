//! HTTP fetch collaborator.
//!
//! Implements the core's `Fetch` boundary with a reqwless client over the
//! embassy-net stack. The trait is synchronous: a fetch runs to completion
//! inside the tick that triggered it. This implementation busy-polls its
//! futures with `block_on`, which is sound because the orchestrator
//! executor lives on core 1 while the network stack runs on core 0.

use alloc::string::String;
use alloc::vec::Vec;

use defmt::*;
use embassy_futures::block_on;
use embassy_net::dns::DnsSocket;
use embassy_net::tcp::client::{TcpClient, TcpClientState};
use embassy_net::Stack;
use embassy_time::{with_timeout, Duration};
use reqwless::client::HttpClient;
use reqwless::request::Method;
use serde::Deserialize;

use tessera_core::feed::DailyFeed;
use tessera_core::traits::{format_scaled, Fetch, FetchError, MetricValue};

use super::json_path;

/// Per-request timeout; the collaborator owns this, not the orchestrator
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Response buffer: feed documents run a few KiB
const RX_BUF: usize = 8 * 1024;

/// Prometheus instant-query response, just the parts we read
#[derive(Deserialize)]
struct PromResponse {
    status: String,
    data: PromData,
}

#[derive(Deserialize)]
struct PromData {
    result: Vec<PromResult>,
}

#[derive(Deserialize)]
struct PromResult {
    /// `[timestamp, "value"]`
    value: (f64, String),
}

pub struct HttpFetcher {
    stack: Stack<'static>,
}

impl HttpFetcher {
    pub fn new(stack: Stack<'static>) -> Self {
        Self { stack }
    }

    /// One GET, body returned as an owned byte vector
    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let tcp_state: TcpClientState<1, 4096, 4096> = TcpClientState::new();
        let tcp = TcpClient::new(self.stack, &tcp_state);
        let dns = DnsSocket::new(self.stack);
        let mut client = HttpClient::new(&tcp, &dns);

        let mut rx_buf = [0u8; RX_BUF];
        let request = async {
            let mut request = client
                .request(Method::GET, url)
                .await
                .map_err(|_| FetchError::Network)?;
            let response = request
                .send(&mut rx_buf)
                .await
                .map_err(|_| FetchError::Network)?;
            let body = response
                .body()
                .read_to_end()
                .await
                .map_err(|_| FetchError::Network)?;
            Ok(Vec::from(&body[..]))
        };

        match with_timeout(REQUEST_TIMEOUT, request).await {
            Ok(result) => result,
            Err(_) => {
                warn!("http: request timed out");
                Err(FetchError::Network)
            }
        }
    }

    async fn feed(&self, url: &str) -> Result<DailyFeed, FetchError> {
        let body = self.get(url).await?;
        serde_json::from_slice(&body).map_err(|_| FetchError::InvalidResponse)
    }

    async fn prometheus(
        &self,
        url: &str,
        divisor: f32,
        decimals: u8,
    ) -> Result<MetricValue, FetchError> {
        let body = self.get(url).await?;
        let response: PromResponse =
            serde_json::from_slice(&body).map_err(|_| FetchError::InvalidResponse)?;
        if response.status != "success" {
            return Err(FetchError::InvalidResponse);
        }
        let raw: f32 = response
            .data
            .result
            .first()
            .and_then(|r| r.value.1.trim().parse().ok())
            .ok_or(FetchError::InvalidResponse)?;
        Ok(format_scaled(raw, divisor, decimals))
    }

    async fn json_value(
        &self,
        url: &str,
        path: &str,
        divisor: f32,
        decimals: u8,
    ) -> Result<MetricValue, FetchError> {
        let body = self.get(url).await?;
        let doc: serde_json::Value =
            serde_json::from_slice(&body).map_err(|_| FetchError::InvalidResponse)?;
        let leaf = json_path::lookup(&doc, path).ok_or(FetchError::PathMissing)?;
        let raw = json_path::as_number(leaf).ok_or(FetchError::InvalidResponse)?;
        Ok(format_scaled(raw, divisor, decimals))
    }
}

impl Fetch for HttpFetcher {
    fn fetch_feed(&mut self, url: &str) -> Result<DailyFeed, FetchError> {
        block_on(self.feed(url))
    }

    fn fetch_prometheus(
        &mut self,
        url: &str,
        divisor: f32,
        decimals: u8,
    ) -> Result<MetricValue, FetchError> {
        block_on(self.prometheus(url, divisor, decimals))
    }

    fn fetch_json(
        &mut self,
        url: &str,
        path: &str,
        divisor: f32,
        decimals: u8,
    ) -> Result<MetricValue, FetchError> {
        block_on(self.json_value(url, path, divisor, decimals))
    }
}
