//! In-flight operation tracking
//!
//! Keeps a keyed registry of operations that were started but not yet seen
//! in a terminal state. Live state is polled on demand, never cached; a
//! handle is removed the moment any non-`running` state is observed. Only
//! the `finished` state additionally captures a report — an operation that
//! ends cancelled or errored is pruned without one.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::caldera::{CalderaClient, OperationHandle, OperationStatusSnapshot};
use crate::constants::artifacts;
use crate::errors::ApiError;
use crate::report::normalize;

pub struct OperationTracker {
    client: Arc<CalderaClient>,
    artifact_dir: PathBuf,
    /// operation id -> handle; at most one live handle per id
    in_flight: RwLock<HashMap<String, OperationHandle>>,
}

impl OperationTracker {
    pub fn new(client: Arc<CalderaClient>, artifact_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            artifact_dir: artifact_dir.into(),
            in_flight: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a freshly created operation and records the submission
    /// artifact. One report is fetched right away for observability; the
    /// operation is normally still running at this point, so that fetch is
    /// allowed to fail.
    pub async fn register(&self, handle: OperationHandle) {
        let operation_id = handle.id.clone();
        let submission = handle.raw.clone();
        {
            let mut in_flight = self.in_flight.write().await;
            in_flight.insert(operation_id.clone(), handle);
        }
        info!("Tracking operation {}", operation_id);

        self.write_artifact(artifacts::NEW_OPERATION_FILE, &submission)
            .await;

        match self.client.get_report(&operation_id, true).await {
            Ok(_) => debug!("Early report available for operation {}", operation_id),
            Err(e) => debug!(
                "Early report for operation {} not available yet: {}",
                operation_id, e
            ),
        }
    }

    /// Fetches live state for an operation. Any non-`running` state removes
    /// the handle from the registry (a no-op when the id was never
    /// tracked). Exactly `finished` also captures the full report, with
    /// agent output, into the completion artifact.
    pub async fn poll(&self, operation_id: &str) -> Result<OperationStatusSnapshot, ApiError> {
        let snapshot = self.client.get_operation(operation_id).await?;

        if !snapshot.state.is_running() {
            let removed = {
                let mut in_flight = self.in_flight.write().await;
                in_flight.remove(operation_id)
            };
            if removed.is_some() {
                info!(
                    "Operation {} left the running state ({}), no longer tracked",
                    operation_id, snapshot.state
                );
            }

            if snapshot.state.is_finished() {
                let report = self.client.get_report(operation_id, true).await?;
                self.write_artifact(artifacts::COMPLETE_OPERATION_FILE, &report)
                    .await;

                let (normalized, ratio) = normalize(&report);
                info!(
                    "Operation {} finished: {} agents, {} steps, success ratio {:.2}",
                    operation_id,
                    normalized.agents.len(),
                    normalized.total_steps(),
                    ratio
                );
            }
        }

        Ok(snapshot)
    }

    pub async fn is_tracked(&self, operation_id: &str) -> bool {
        self.in_flight.read().await.contains_key(operation_id)
    }

    pub async fn len(&self) -> usize {
        self.in_flight.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.in_flight.read().await.is_empty()
    }

    async fn write_artifact(&self, file_name: &str, payload: &Value) {
        let path = self.artifact_dir.join(file_name);
        let body = match serde_json::to_vec(payload) {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to serialize artifact {}: {}", path.display(), e);
                return;
            }
        };
        if let Err(e) = tokio::fs::write(&path, body).await {
            warn!("Failed to write artifact {}: {}", path.display(), e);
        }
    }
}
