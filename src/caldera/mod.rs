//! Caldera REST API integration
//!
//! The client is a pure transport wrapper over `{server}:8888/api/v2`; it
//! holds no state beyond the HTTP client itself. Operation lifecycle logic
//! lives in the tracker, retry policy in the retry module.

pub mod client;
pub mod types;

pub use client::CalderaClient;
pub use types::{
    AdversaryRef, OperationHandle, OperationRequest, OperationState, OperationStatusSnapshot,
};
