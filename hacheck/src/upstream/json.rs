//! Shared JSON fetch helpers for the upstream clients

use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tokio::time::timeout;

use crate::errors::UpstreamError;

/// Build an HTTP client; gzip and deflate bodies are decoded transparently
pub fn build_client(request_timeout: Duration, accept_invalid_certs: bool) -> Result<Client> {
    Client::builder()
        .timeout(request_timeout)
        .danger_accept_invalid_certs(accept_invalid_certs)
        .build()
        .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))
}

/// GET `url` and decode the body as `T`, bounded by `request_timeout`
pub async fn fetch_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    request_timeout: Duration,
) -> Result<T, UpstreamError> {
    let body = timeout(request_timeout, async {
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(url, e))?;

        if !response.status().is_success() {
            return Err(UpstreamError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response
            .bytes()
            .await
            .map_err(|e| UpstreamError::from_reqwest(url, e))
    })
    .await
    .map_err(|_| UpstreamError::Timeout {
        url: url.to_string(),
    })??;

    serde_json::from_slice(&body).map_err(|e| UpstreamError::Parse {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// Accept a JSON number or a numeric string; anything else reads as zero
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    })
}
