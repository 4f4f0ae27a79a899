//! Environment-based configuration, built once in main

use std::env;
use std::path::PathBuf;

use crate::constants::{caldera, defaults};
use crate::errors::ConfigError;

#[derive(Debug, Clone)]
pub struct Config {
    /// Target URL probed at the start of every tick
    pub access_target_url: String,

    /// Upstream controller base URL (`/coin` and `/caldera` endpoints)
    pub api_server_url: String,

    /// Bearer token for the upstream controller
    pub api_token: String,

    /// Caldera server address, without port or path
    pub caldera_server: String,

    /// Value of the `KEY` header on Caldera API calls
    pub caldera_api_token: String,

    /// Path to the session descriptor XML
    pub session_xml_path: String,

    /// Directory the diagnostic JSON artifacts are written into
    pub artifact_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            access_target_url: required("ACCESS_TARGET_URL")?,
            api_server_url: required("API_SERVER_URL")?,
            api_token: required("API_TOKEN")?,
            caldera_server: required("CALDERA_SERVER")?,
            caldera_api_token: required("CALDERA_API_TOKEN")?,
            session_xml_path: optional("SESSION_XML_PATH")
                .unwrap_or_else(|| defaults::SESSION_XML_PATH.to_string()),
            artifact_dir: optional("ARTIFACT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(defaults::ARTIFACT_DIR)),
        })
    }

    /// Versioned Caldera API base URL. The port is pinned by the Caldera
    /// deployment, not configurable.
    pub fn caldera_base_url(&self) -> String {
        format!(
            "{}:{}/{}",
            self.caldera_server,
            caldera::API_PORT,
            caldera::API_BASE_PATH
        )
    }
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    optional(var).ok_or(ConfigError::MissingRequired { var })
}

/// An empty value counts as unset.
fn optional(var: &str) -> Option<String> {
    env::var(var).ok().filter(|value| !value.is_empty())
}
