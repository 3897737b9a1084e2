//! Pipeline configuration

use std::path::PathBuf;

use crate::constants;
use crate::logic::error::{TriageError, TriageResult};
use crate::logic::oracle::OracleClientConfig;

/// Runtime configuration, resolved from env vars (and `.env`) with defaults
#[derive(Debug, Clone)]
pub struct EvalConfig {
    /// Oracle base URL (OpenAI-compatible)
    pub oracle_url: String,

    /// Oracle API key, required only by the classify stage
    pub oracle_api_key: Option<String>,

    pub oracle_model: String,

    /// Per-call timeout in seconds
    pub oracle_timeout_secs: u64,

    /// Oracle calls in flight (1 = sequential)
    pub max_in_flight: usize,

    /// Where stage outputs are written
    pub output_dir: PathBuf,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            oracle_url: constants::DEFAULT_ORACLE_URL.to_string(),
            oracle_api_key: None,
            oracle_model: constants::DEFAULT_ORACLE_MODEL.to_string(),
            oracle_timeout_secs: constants::DEFAULT_ORACLE_TIMEOUT_SECS,
            max_in_flight: constants::DEFAULT_MAX_IN_FLIGHT,
            output_dir: PathBuf::from(constants::DEFAULT_OUTPUT_DIR),
        }
    }
}

impl EvalConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            oracle_url: constants::get_oracle_url(),
            oracle_api_key: constants::get_oracle_api_key(),
            oracle_model: constants::get_oracle_model(),
            oracle_timeout_secs: constants::get_oracle_timeout_secs(),
            max_in_flight: constants::get_max_in_flight().max(1),
            output_dir: PathBuf::from(constants::get_output_dir()),
        }
    }

    /// Settings for the HTTP oracle; fails when no API key is configured
    pub fn oracle_client_config(&self) -> TriageResult<OracleClientConfig> {
        let api_key = self.oracle_api_key.clone().ok_or_else(|| {
            TriageError::Config("ORACLE_API_KEY is not set".to_string())
        })?;

        Ok(OracleClientConfig {
            base_url: self.oracle_url.trim_end_matches('/').to_string(),
            api_key,
            model: self.oracle_model.clone(),
            timeout_seconds: self.oracle_timeout_secs,
        })
    }
}
