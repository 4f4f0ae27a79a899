//! Decoding of upstream action plans
//!
//! Plan items arrive as loose JSON keyed by a `(service, task)` string
//! pair. Decoding happens once at the boundary: recognized pairs become
//! explicit variants, anything else collapses into `Ignored`. A recognized
//! pair with missing or empty required fields is an error so the dispatcher
//! can log and skip that one item.

use anyhow::{anyhow, Result};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    RunOperation {
        operation_name: String,
        adversary: String,
        group: String,
    },
    CheckOperation {
        operation_id: String,
        /// Echoed back in the status relay; the plan may omit it
        operation_name: Option<String>,
    },
    Ignored,
}

impl Action {
    pub fn decode(raw: &Value) -> Result<Self> {
        let Some(service) = raw.get("service").and_then(Value::as_str) else {
            return Ok(Action::Ignored);
        };
        let task = raw.get("task").and_then(Value::as_str).unwrap_or_default();

        match (service, task) {
            ("caldera", "run_operation") => {
                let adversary = required(raw, "adversary")?;
                let operation_name = required(raw, "operation_name")?;
                let group = raw
                    .get("group")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                Ok(Action::RunOperation {
                    operation_name,
                    adversary,
                    group,
                })
            }
            ("caldera", "check_operation") => {
                let operation_id = required(raw, "operation_id")?;
                let operation_name = raw
                    .get("operation_name")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                Ok(Action::CheckOperation {
                    operation_id,
                    operation_name,
                })
            }
            _ => Ok(Action::Ignored),
        }
    }
}

/// Missing and empty both fail; the upstream plan format uses empty strings
/// for absent values.
fn required(raw: &Value, field: &str) -> Result<String> {
    raw.get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("action missing '{}': {}", field, raw))
}
