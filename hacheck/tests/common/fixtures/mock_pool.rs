//! Mock mining pool APIs and the pool directory

use flate2::{write::GzEncoder, Compression};
use serde_json::{json, Value};
use std::io::Write;
use std::time::Duration;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// One pool API server; Forknote and Node-JS layouts can both be mounted
pub struct MockPoolServer {
    pub server: MockServer,
    pub base_url: String,
}

impl MockPoolServer {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();
        Self { server, base_url }
    }

    /// API base as listed in the directory, with the trailing slash
    pub fn api(&self, prefix: &str) -> String {
        format!("{}/{}/", self.base_url, prefix)
    }

    /// Forknote pool: `<api>stats`, `lastBlockFound` in milliseconds
    pub async fn mock_forknote(
        &self,
        prefix: &str,
        height: u64,
        difficulty: f64,
        hashrate: f64,
        last_block_found_ms: u64,
    ) {
        Mock::given(method("GET"))
            .and(path(format!("/{}/stats", prefix)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "config": { "coin": "turtlecoin" },
                "pool": {
                    "hashrate": hashrate,
                    "miners": 12,
                    "lastBlockFound": last_block_found_ms.to_string()
                },
                "network": {
                    "height": height,
                    "difficulty": difficulty
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Node-JS pool: `<api>pool/stats` and `<api>network/stats`,
    /// `lastBlockFound` in seconds
    pub async fn mock_nodejs(
        &self,
        prefix: &str,
        height: u64,
        difficulty: f64,
        hashrate: f64,
        last_block_found_s: u64,
    ) {
        Mock::given(method("GET"))
            .and(path(format!("/{}/pool/stats", prefix)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "pool_list": ["pplns"],
                "pool_statistics": {
                    "hashRate": hashrate,
                    "miners": 7,
                    "lastBlockFound": last_block_found_s
                }
            })))
            .mount(&self.server)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/{}/network/stats", prefix)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "difficulty": difficulty,
                "height": height,
                "hash": "abc"
            })))
            .mount(&self.server)
            .await;
    }

    /// Forknote pool that answers only after `delay`
    pub async fn mock_forknote_slow(&self, prefix: &str, height: u64, delay: Duration) {
        Mock::given(method("GET"))
            .and(path(format!("/{}/stats", prefix)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({
                        "pool": { "hashrate": 1000, "lastBlockFound": "0" },
                        "network": { "height": height, "difficulty": 60000 }
                    }))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    /// Node-JS pool whose `network/stats` fails while `pool/stats` answers
    pub async fn mock_nodejs_network_down(&self, prefix: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/{}/pool/stats", prefix)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "pool_statistics": { "hashRate": 1000, "lastBlockFound": 0 }
            })))
            .mount(&self.server)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/{}/network/stats", prefix)))
            .respond_with(ResponseTemplate::new(500))
            .mount(&self.server)
            .await;
    }

    /// Node-JS pool whose `pool/stats` fails while `network/stats` answers
    pub async fn mock_nodejs_pool_down(&self, prefix: &str, height: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/{}/pool/stats", prefix)))
            .respond_with(ResponseTemplate::new(503))
            .mount(&self.server)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/{}/network/stats", prefix)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "difficulty": 60000,
                "height": height
            })))
            .mount(&self.server)
            .await;
    }

    /// Number of requests received under `/<prefix>/`
    pub async fn requests_under(&self, prefix: &str) -> usize {
        let needle = format!("/{}/", prefix);
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path().starts_with(&needle))
            .count()
    }

    /// Any request under `prefix` fails
    pub async fn mock_unhealthy(&self, prefix: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/{}/stats", prefix)))
            .respond_with(ResponseTemplate::new(502))
            .mount(&self.server)
            .await;
    }
}

/// Externally hosted pool directory
pub struct MockPoolDirectory {
    pub server: MockServer,
    pub base_url: String,
}

impl MockPoolDirectory {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();
        Self { server, base_url }
    }

    pub fn url(&self) -> String {
        format!("{}/pools.json", self.base_url)
    }

    /// Serve `pools` as the directory body
    pub async fn mock_pools(&self, pools: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path("/pools.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "pools": pools })))
            .mount(&self.server)
            .await;
    }

    /// Serve `pools` gzip-compressed with a matching Content-Encoding
    pub async fn mock_pools_gzip(&self, pools: Vec<Value>) {
        let body = serde_json::to_vec(&json!({ "pools": pools })).unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&body).unwrap();
        let compressed = encoder.finish().unwrap();

        Mock::given(method("GET"))
            .and(path("/pools.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-encoding", "gzip")
                    .insert_header("content-type", "application/json")
                    .set_body_bytes(compressed),
            )
            .mount(&self.server)
            .await;
    }

    pub async fn mock_unavailable(&self) {
        Mock::given(method("GET"))
            .and(path("/pools.json"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&self.server)
            .await;
    }
}

/// Directory entry as published by the pool list maintainers
pub fn pool_entry(name: &str, api: &str, kind: &str, mining_address: &str) -> Value {
    json!({
        "name": name,
        "url": format!("https://{}.example", name),
        "api": api,
        "type": kind,
        "miningAddress": mining_address
    })
}
