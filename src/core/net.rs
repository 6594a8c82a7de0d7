// src/core/net.rs
// Blocking HTTP client for the records search endpoint.

use std::time::Duration;

use reqwest::{blocking::Client, header::ACCEPT};
use tracing::debug;

use crate::{
    error::FetchError,
    fetch::{Page, Query, SearchApi},
};

pub struct DiscoveryClient {
    base_url: String,
    client: Client,
}

impl DiscoveryClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("discovery_harvest/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl SearchApi for DiscoveryClient {
    fn search(&self, query: &Query) -> Result<Page, FetchError> {
        debug!(url = %self.base_url, cursor = ?query.cursor(), "GET");

        let response = self
            .client
            .get(&self.base_url)
            .header(ACCEPT, "application/json")
            .query(&query.pairs())
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FetchError::Status { status: status.as_u16(), body });
        }

        response.json::<Page>().map_err(|e| {
            if e.is_decode() { FetchError::Decode(e.to_string()) } else { FetchError::Transport(e) }
        })
    }
}
