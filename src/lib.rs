pub mod actions;
pub mod caldera;
pub mod config;
pub mod constants;
pub mod errors;
pub mod relay;
pub mod report;
pub mod retry;
pub mod session;
pub mod tracker;

// Re-export commonly used types
pub use actions::Action;
pub use caldera::{
    CalderaClient, OperationHandle, OperationRequest, OperationState, OperationStatusSnapshot,
};
pub use config::Config;
pub use relay::StatusRelay;
pub use session::SessionDescriptor;
pub use tracker::OperationTracker;
