//! Monitored daemon height queries

use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::json::{build_client, fetch_json};
use crate::consensus::MonitoredTarget;
use crate::constants::upstream::NODE_HEIGHT_PATH;
use crate::errors::UpstreamError;

/// Daemon `/getheight` response
#[derive(Debug, Clone, Deserialize)]
pub struct GetHeightResponse {
    pub height: u64,
    #[serde(default)]
    pub network_height: Option<u64>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Clone)]
pub struct NodeHeightClient {
    client: Client,
    request_timeout: Duration,
}

impl NodeHeightClient {
    pub fn new(request_timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(request_timeout, false)?,
            request_timeout,
        })
    }

    /// Current height reported by `target`
    pub async fn fetch_height(&self, target: &MonitoredTarget) -> Result<u64, UpstreamError> {
        let url = format!("{}{}", target.base_url(), NODE_HEIGHT_PATH);
        let response: GetHeightResponse =
            fetch_json(&self.client, &url, self.request_timeout).await?;
        Ok(response.height)
    }
}
