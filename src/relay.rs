//! Steady-state relay loop between the upstream controller and Caldera
//!
//! One tick: probe the target, fetch the action plan, dispatch each action
//! in order, then sleep. Failures are isolated per action; a tick-level
//! error is logged and the loop moves on. The loop has no terminal state of
//! its own — it runs until the surrounding task is cancelled.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::actions::Action;
use crate::caldera::{CalderaClient, OperationRequest};
use crate::config::Config;
use crate::constants::{intervals, retry};
use crate::retry::create_with_retry;
use crate::session::SessionDescriptor;
use crate::tracker::OperationTracker;

/// Status transition POSTed to the upstream `/caldera` endpoint.
/// `operation_name` goes out as null when the plan omitted it.
#[derive(Debug, Serialize)]
struct StatusUpdate<'a> {
    session_id: &'a str,
    operation_name: Option<&'a str>,
    operation_id: &'a str,
    status: &'a str,
}

pub struct StatusRelay {
    config: Arc<Config>,
    session: SessionDescriptor,
    client: Client,
    caldera: Arc<CalderaClient>,
    tracker: OperationTracker,
}

impl StatusRelay {
    pub fn new(
        config: Arc<Config>,
        session: SessionDescriptor,
        caldera: Arc<CalderaClient>,
        tracker: OperationTracker,
    ) -> Self {
        Self {
            config,
            session,
            client: Client::new(),
            caldera,
            tracker,
        }
    }

    /// Runs ticks forever. Only external cancellation stops the loop.
    pub async fn run(&self) {
        info!("Relay loop started for session {}", self.session.id);
        loop {
            if let Err(e) = self.tick().await {
                error!("Error during tick processing: {}", e);
            }
            sleep(intervals::CHECK_INTERVAL).await;
        }
    }

    /// One probe → plan → dispatch cycle.
    pub async fn tick(&self) -> Result<()> {
        if !self.probe().await {
            return Ok(());
        }

        let Some(actions) = self.fetch_plan().await? else {
            return Ok(());
        };
        for raw in &actions {
            self.dispatch(raw).await;
        }
        Ok(())
    }

    /// Bounded-timeout reachability check against the target URL. Anything
    /// but a clean 200 skips the rest of the tick.
    async fn probe(&self) -> bool {
        let url = &self.config.access_target_url;
        info!("Checking URL: {}", url);

        match self
            .client
            .get(url)
            .timeout(intervals::PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(response) if response.status() == StatusCode::OK => {
                info!("Successfully accessed {}", url);
                true
            }
            Ok(response) => {
                error!(
                    "GET request to {} failed with status code {}",
                    url,
                    response.status()
                );
                false
            }
            Err(e) => {
                error!("GET request to {} failed: {}", url, e);
                false
            }
        }
    }

    /// Fetches this tick's action plan from the controller. `None` means
    /// the controller declined or the response carried no action list.
    async fn fetch_plan(&self) -> Result<Option<Vec<Value>>> {
        let url = format!("{}/coin", self.config.api_server_url);
        info!("Requesting action plan from {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_token)
            .json(&json!({ "session": self.session.id }))
            .send()
            .await
            .map_err(|e| anyhow!("plan fetch from {} failed: {}", url, e))?;

        if response.status() != StatusCode::OK {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(
                "POST request to {} failed with status code {}: {}",
                url, status, body
            );
            return Ok(None);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| anyhow!("plan response from {} was not JSON: {}", url, e))?;
        Ok(body.get("actions").and_then(Value::as_array).cloned())
    }

    /// Dispatches one plan item. Failures never abort the tick.
    async fn dispatch(&self, raw: &Value) {
        match Action::decode(raw) {
            Ok(Action::RunOperation {
                operation_name,
                adversary,
                group,
            }) => self.run_operation(&operation_name, &adversary, &group).await,
            Ok(Action::CheckOperation {
                operation_id,
                operation_name,
            }) => {
                self.check_operation(&operation_id, operation_name.as_deref())
                    .await
            }
            Ok(Action::Ignored) => {}
            Err(e) => warn!("Invalid parameters in action: {}", e),
        }
    }

    async fn run_operation(&self, operation_name: &str, adversary: &str, group: &str) {
        let request = OperationRequest::new(operation_name, adversary).with_group(group);
        let caldera = self.caldera.clone();

        let created = create_with_retry(retry::MAX_ATTEMPTS, retry::RETRY_DELAY, move || {
            let caldera = caldera.clone();
            let request = request.clone();
            async move { caldera.create_operation(&request).await }
        })
        .await;

        match created {
            Some(handle) => {
                info!(
                    "Operation '{}' started with ID: {}",
                    operation_name, handle.id
                );
                let operation_id = handle.id.clone();
                self.tracker.register(handle).await;
                self.relay_status(Some(operation_name), &operation_id, "started")
                    .await;
            }
            None => error!("Failed to start operation '{}'", operation_name),
        }
    }

    async fn check_operation(&self, operation_id: &str, operation_name: Option<&str>) {
        match self.tracker.poll(operation_id).await {
            Ok(snapshot) => {
                info!(
                    "Operation '{}' checked with current status: {}",
                    operation_id, snapshot.state
                );
                self.relay_status(operation_name, operation_id, snapshot.state.as_str())
                    .await;
            }
            Err(e) => error!("Error checking operation '{}': {}", operation_id, e),
        }
    }

    /// Fire-and-forget status POST to the upstream controller. Delivery
    /// failure is logged and swallowed; there is no retry and no failure
    /// channel back to the caller.
    async fn relay_status(&self, operation_name: Option<&str>, operation_id: &str, status: &str) {
        let url = format!("{}/caldera", self.config.api_server_url);
        let payload = StatusUpdate {
            session_id: &self.session.id,
            operation_name,
            operation_id,
            status,
        };
        info!(
            "Posting status '{}' for operation {} to {}",
            status, operation_id, url
        );

        match self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_token)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) if response.status() == StatusCode::OK => {
                info!(
                    "Successfully updated operation {} with status '{}'",
                    operation_id, status
                );
            }
            Ok(response) => {
                let code = response.status();
                let body = response.text().await.unwrap_or_default();
                error!(
                    "Failed to update operation {} with status '{}'. Response {}: {}",
                    operation_id, status, code, body
                );
            }
            Err(e) => error!(
                "Error posting operation status for '{}': {}",
                operation_id, e
            ),
        }
    }
}
