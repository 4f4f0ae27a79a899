//! Mock upstream controller for testing
//!
//! Hosts the probe target, the `/coin` plan endpoint, and the `/caldera`
//! status endpoint on one server.

use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "test-token";

pub struct MockControllerServer {
    pub server: MockServer,
    /// URL the relay probes at the start of each tick
    pub target_url: String,
    /// Controller base URL for `/coin` and `/caldera`
    pub api_url: String,
}

impl MockControllerServer {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let target_url = format!("{}/target", server.uri());
        let api_url = server.uri();
        Self {
            server,
            target_url,
            api_url,
        }
    }

    /// Probe target answering with the given status
    pub async fn mock_probe(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path("/target"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Plan endpoint returning the given actions, requiring bearer auth
    pub async fn mock_plan(&self, actions: Value) {
        Mock::given(method("POST"))
            .and(path("/coin"))
            .and(header("Authorization", format!("Bearer {}", TEST_TOKEN)))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "actions": actions })),
            )
            .mount(&self.server)
            .await;
    }

    /// Plan endpoint with an arbitrary response body
    pub async fn mock_plan_raw(&self, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path("/coin"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Plan endpoint that must never be called
    pub async fn expect_no_plan_fetch(&self) {
        Mock::given(method("POST"))
            .and(path("/coin"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"actions": []})))
            .expect(0)
            .mount(&self.server)
            .await;
    }

    /// Status endpoint accepting relayed transitions
    pub async fn mock_status_endpoint(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/caldera"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({})))
            .mount(&self.server)
            .await;
    }

    /// Bodies of the status updates this controller received, in order
    pub async fn status_updates(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == "/caldera")
            .map(|request| serde_json::from_slice(&request.body).unwrap())
            .collect()
    }

    /// Number of requests received on a given path
    pub async fn hits(&self, endpoint: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == endpoint)
            .count()
    }
}
