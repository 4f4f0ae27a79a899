//! Stateless transport wrapper around the Caldera operation endpoints
//!
//! Every call attaches the `KEY` authentication header and JSON content
//! negotiation, and targets the versioned base path. No retry logic lives
//! here; callers decide how to recover.

use chrono::Utc;
use reqwest::header::ACCEPT;
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::{json, Value};

use crate::caldera::types::{
    OperationHandle, OperationRequest, OperationState, OperationStatusSnapshot,
};
use crate::errors::ApiError;

pub struct CalderaClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl CalderaClient {
    /// `base_url` is the versioned API root, e.g. `https://host:8888/api/v2`.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        // Caldera ships with a self-signed certificate, so verification is
        // off for this client only. Anything that terminates TLS properly
        // in front of Caldera silently loses that protection too.
        let client = Client::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .expect("Failed to create HTTP client for CalderaClient");

        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client,
        }
    }

    /// POST /operations
    pub async fn create_operation(
        &self,
        request: &OperationRequest,
    ) -> Result<OperationHandle, ApiError> {
        let raw = self.post_json("operations", request).await?;
        let id = raw
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| ApiError::Decode {
                endpoint: "operations".to_string(),
                reason: "create response has no operation id".to_string(),
            })?
            .to_string();

        Ok(OperationHandle {
            id,
            request: request.clone(),
            created_at: Utc::now(),
            raw,
        })
    }

    /// GET /operations/{id}
    pub async fn get_operation(
        &self,
        operation_id: &str,
    ) -> Result<OperationStatusSnapshot, ApiError> {
        let endpoint = format!("operations/{}", operation_id);
        let raw = self.get_json(&endpoint).await?;
        Self::snapshot_from(&endpoint, raw)
    }

    /// POST /operations/{id}/report
    pub async fn get_report(
        &self,
        operation_id: &str,
        enable_agent_output: bool,
    ) -> Result<Value, ApiError> {
        let endpoint = format!("operations/{}/report", operation_id);
        self.post_json(&endpoint, &json!({ "enable_agent_output": enable_agent_output }))
            .await
    }

    /// GET /operations
    pub async fn list_operations(&self) -> Result<Vec<OperationStatusSnapshot>, ApiError> {
        let endpoint = "operations";
        let raw = self.get_json(endpoint).await?;
        let entries = raw.as_array().ok_or_else(|| ApiError::Decode {
            endpoint: endpoint.to_string(),
            reason: "operation list is not an array".to_string(),
        })?;

        entries
            .iter()
            .map(|entry| Self::snapshot_from(endpoint, entry.clone()))
            .collect()
    }

    /// DELETE /operations/{id}
    pub async fn delete_operation(&self, operation_id: &str) -> Result<(), ApiError> {
        let endpoint = format!("operations/{}", operation_id);
        let response = self
            .client
            .delete(self.url(&endpoint))
            .header("KEY", &self.api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ApiError::Transport {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(ApiError::Status {
                endpoint,
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    fn snapshot_from(endpoint: &str, raw: Value) -> Result<OperationStatusSnapshot, ApiError> {
        let id = raw
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| ApiError::Decode {
                endpoint: endpoint.to_string(),
                reason: "operation object has no id".to_string(),
            })?
            .to_string();
        let state = raw
            .get("state")
            .and_then(Value::as_str)
            .map(OperationState::from_wire)
            .ok_or_else(|| ApiError::Decode {
                endpoint: endpoint.to_string(),
                reason: "operation object has no state".to_string(),
            })?;

        Ok(OperationStatusSnapshot { id, state, raw })
    }

    async fn get_json(&self, endpoint: &str) -> Result<Value, ApiError> {
        let response = self
            .client
            .get(self.url(endpoint))
            .header("KEY", &self.api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ApiError::Transport {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })?;
        Self::decode(endpoint, response).await
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<Value, ApiError> {
        let response = self
            .client
            .post(self.url(endpoint))
            .header("KEY", &self.api_key)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })?;
        Self::decode(endpoint, response).await
    }

    async fn decode(endpoint: &str, response: Response) -> Result<Value, ApiError> {
        if !response.status().is_success() {
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status: response.status().as_u16(),
            });
        }
        response.json().await.map_err(|e| ApiError::Decode {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }
}
