//! Mock service node daemon answering `/getheight`

use serde_json::json;
use std::time::Duration;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

pub struct MockDaemonServer {
    pub server: MockServer,
    pub base_url: String,
}

impl MockDaemonServer {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();
        Self { server, base_url }
    }

    /// Port the daemon listens on, for config files
    pub fn port(&self) -> u16 {
        self.server.address().port()
    }

    /// Healthy daemon reporting `height`
    pub async fn mock_height(&self, height: u64) {
        Mock::given(method("GET"))
            .and(path("/getheight"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "height": height,
                "network_height": height,
                "status": "OK"
            })))
            .mount(&self.server)
            .await;
    }

    /// Daemon returning a server error
    pub async fn mock_unhealthy(&self) {
        Mock::given(method("GET"))
            .and(path("/getheight"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&self.server)
            .await;
    }

    /// Daemon answering with something that is not JSON
    pub async fn mock_garbage(&self) {
        Mock::given(method("GET"))
            .and(path("/getheight"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .mount(&self.server)
            .await;
    }

    /// Daemon slower than any sensible request timeout
    pub async fn mock_slow(&self, height: u64, delay: Duration) {
        Mock::given(method("GET"))
            .and(path("/getheight"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "height": height }))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }
}
