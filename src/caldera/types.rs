//! Wire types for the Caldera operation endpoints

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for operation creation, in the shape Caldera expects.
/// Immutable once submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationRequest {
    pub name: String,
    pub adversary: AdversaryRef,
    pub group: String,
    pub auto_close: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdversaryRef {
    pub adversary_id: String,
}

impl OperationRequest {
    pub fn new(name: impl Into<String>, adversary_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            adversary: AdversaryRef {
                adversary_id: adversary_id.into(),
            },
            group: String::new(),
            auto_close: true,
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }
}

/// A started operation, owned by the tracker until a terminal state is
/// observed.
#[derive(Debug, Clone)]
pub struct OperationHandle {
    /// Operation id issued by Caldera
    pub id: String,
    pub request: OperationRequest,
    pub created_at: DateTime<Utc>,
    /// Raw operation object from the create response, kept for the
    /// submission artifact
    pub raw: Value,
}

/// Lifecycle state as reported by Caldera. Anything that is not `running`
/// or `finished` is carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationState {
    Running,
    Finished,
    Other(String),
}

impl OperationState {
    pub fn from_wire(state: &str) -> Self {
        match state {
            "running" => OperationState::Running,
            "finished" => OperationState::Finished,
            other => OperationState::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            OperationState::Running => "running",
            OperationState::Finished => "finished",
            OperationState::Other(state) => state,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, OperationState::Running)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, OperationState::Finished)
    }
}

impl fmt::Display for OperationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Live state fetched fresh on every poll, never cached across ticks.
#[derive(Debug, Clone)]
pub struct OperationStatusSnapshot {
    pub id: String,
    pub state: OperationState,
    pub raw: Value,
}
