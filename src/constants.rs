//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To point the pipeline at another oracle endpoint, set the env vars below
//! (or a `.env` file) instead of editing this file.

/// Default oracle base URL (OpenAI-compatible chat completions API)
pub const DEFAULT_ORACLE_URL: &str = "https://api.deepseek.com";

/// Default oracle model
pub const DEFAULT_ORACLE_MODEL: &str = "deepseek-reasoner";

/// Default per-call timeout (seconds). Reasoning models are slow.
pub const DEFAULT_ORACLE_TIMEOUT_SECS: u64 = 120;

/// Default number of oracle calls in flight (1 = sequential pass)
pub const DEFAULT_MAX_IN_FLIGHT: usize = 1;

/// Default directory for generated files
pub const DEFAULT_OUTPUT_DIR: &str = ".";

/// Maximum justification length (characters) kept after sanitation
pub const MAX_JUSTIFICATION_CHARS: usize = 30_000;

/// Marker appended to truncated justifications
pub const TRUNCATION_MARKER: &str = " [TRUNCATED]";

/// Placeholder for fields absent from a record or response
pub const MISSING: &str = "MISSING";

/// Sentinel written into every oracle field when a call fails
pub const ORACLE_ERROR: &str = "ERROR";

/// Timestamp format used in generated file names
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "triage-eval";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get oracle base URL from environment or use default
pub fn get_oracle_url() -> String {
    std::env::var("ORACLE_API_URL")
        .unwrap_or_else(|_| DEFAULT_ORACLE_URL.to_string())
}

/// Get oracle API key from environment (no default)
pub fn get_oracle_api_key() -> Option<String> {
    std::env::var("ORACLE_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty())
}

/// Get oracle model from environment or use default
pub fn get_oracle_model() -> String {
    std::env::var("ORACLE_MODEL")
        .unwrap_or_else(|_| DEFAULT_ORACLE_MODEL.to_string())
}

/// Get oracle timeout from environment or use default
pub fn get_oracle_timeout_secs() -> u64 {
    std::env::var("ORACLE_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_ORACLE_TIMEOUT_SECS)
}

/// Get max in-flight oracle calls from environment or use default
pub fn get_max_in_flight() -> usize {
    std::env::var("ORACLE_MAX_IN_FLIGHT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MAX_IN_FLIGHT)
}

/// Get output directory from environment or use default
pub fn get_output_dir() -> String {
    std::env::var("TRIAGE_OUTPUT_DIR")
        .unwrap_or_else(|_| DEFAULT_OUTPUT_DIR.to_string())
}
