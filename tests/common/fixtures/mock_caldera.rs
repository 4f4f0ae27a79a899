//! Mock Caldera server for testing
//!
//! Simulates the operation endpoints under /api/v2 without a real Caldera
//! deployment.

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct MockCalderaServer {
    pub server: MockServer,
    /// Versioned API root, ready to hand to CalderaClient::new
    pub base_url: String,
}

impl MockCalderaServer {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = format!("{}/api/v2", server.uri());
        Self { server, base_url }
    }

    /// Mock successful operation creation, returning the given id
    pub async fn mock_create_operation(&self, operation_id: &str) {
        Mock::given(method("POST"))
            .and(path("/api/v2/operations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": operation_id,
                "state": "running"
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock operation creation failing with the given status
    pub async fn mock_create_failure(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/api/v2/operations"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Mock the live state of one operation
    pub async fn mock_operation_state(&self, operation_id: &str, state: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/api/v2/operations/{}", operation_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": operation_id,
                "state": state
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock the report endpoint for one operation
    pub async fn mock_report(&self, operation_id: &str, report: Value) {
        Mock::given(method("POST"))
            .and(path(format!("/api/v2/operations/{}/report", operation_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(report))
            .mount(&self.server)
            .await;
    }

    /// Mock the report endpoint failing, as it does while an operation is
    /// still starting up
    pub async fn mock_report_unavailable(&self, operation_id: &str, status: u16) {
        Mock::given(method("POST"))
            .and(path(format!("/api/v2/operations/{}/report", operation_id)))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Mock the operation listing
    pub async fn mock_operation_list(&self, operations: Value) {
        Mock::given(method("GET"))
            .and(path("/api/v2/operations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(operations))
            .mount(&self.server)
            .await;
    }

    /// Mock operation deletion
    pub async fn mock_delete_operation(&self, operation_id: &str, status: u16) {
        Mock::given(method("DELETE"))
            .and(path(format!("/api/v2/operations/{}", operation_id)))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// A minimal two-agent report payload
    pub fn sample_report(operation_id: &str) -> Value {
        json!({
            "id": operation_id,
            "steps": {
                "agent-a": {"steps": [
                    {"status": 0, "name": "discovery", "description": "Identify host"},
                    {"status": 1, "name": "collection", "description": "Stage files"}
                ]},
                "agent-b": {"steps": [
                    {"status": 124, "name": "exfil", "description": "Timed out"}
                ]}
            }
        })
    }

    /// Requests this server actually received
    pub async fn received(&self) -> Vec<wiremock::Request> {
        self.server.received_requests().await.unwrap_or_default()
    }
}
