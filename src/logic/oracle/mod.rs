//! Oracle Module - the external classifier capability
//!
//! The pipeline only knows the `ClassifierOracle` trait. Transport, auth and
//! prompt live in the adapters.
//!
//! # Components
//! - `client.rs`: OpenAI-compatible chat-completions adapter (reqwest)

pub mod client;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::logic::alert::OracleResponse;

pub use client::{ChatCompletionsOracle, OracleClientConfig, SYSTEM_PROMPT};

/// One classification request: rule description plus sanitized payload
#[async_trait]
pub trait ClassifierOracle: Send + Sync {
    async fn classify(&self, description: &str, payload: &Value) -> Result<OracleResponse, OracleError>;

    /// Model or adapter name, for run statistics
    fn name(&self) -> &str;
}

/// Oracle call errors. Every variant becomes the `ERROR` sentinel upstream.
#[derive(Debug, Clone, Error)]
pub enum OracleError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Timed out after {0}s")]
    Timeout(u64),

    #[error("Server error: {status} {body}")]
    ServerError { status: u16, body: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Oracle not configured: {0}")]
    NotConfigured(String),
}
