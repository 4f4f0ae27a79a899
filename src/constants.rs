//! Application-wide constants for intervals, retry bounds, and endpoint values

use std::time::Duration;

/// Relay loop timing
pub mod intervals {
    use super::Duration;

    /// Delay between relay ticks
    pub const CHECK_INTERVAL: Duration = Duration::from_secs(10);

    /// Timeout for the target probe request
    pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);
}

/// Operation creation retry bounds
pub mod retry {
    use super::Duration;

    /// Maximum creation attempts before giving up
    pub const MAX_ATTEMPTS: u32 = 3;

    /// Fixed delay between creation attempts
    pub const RETRY_DELAY: Duration = Duration::from_secs(5);
}

/// Caldera server endpoint values
pub mod caldera {
    /// Port the Caldera REST API listens on
    pub const API_PORT: u16 = 8888;

    /// Versioned API base path
    pub const API_BASE_PATH: &str = "api/v2";
}

/// Diagnostic artifact file names, written into the configured artifact
/// directory. Each write overwrites the previous one.
pub mod artifacts {
    /// Raw operation object captured on every submission
    pub const NEW_OPERATION_FILE: &str = "new_operation.json";

    /// Raw report captured when an operation reaches `finished`
    pub const COMPLETE_OPERATION_FILE: &str = "complete_operation.json";
}

/// Default configuration values
pub mod defaults {
    /// Session descriptor location when SESSION_XML_PATH is not set
    pub const SESSION_XML_PATH: &str = "session.xml";

    /// Artifact directory when ARTIFACT_DIR is not set
    pub const ARTIFACT_DIR: &str = ".";
}
