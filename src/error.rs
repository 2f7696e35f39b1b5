//! Error types for request routing and escalation
//!
//! Only two failures are terminal and ever reach the caller: an invalid
//! request and a failed enrichment. Everything an agent reports is an
//! [`AgentFault`], which the dispatcher recovers by escalating.

use thiserror::Error;

/// Inbound request validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("Missing '{field}' key in request.")]
    MissingField { field: &'static str },
}

impl RequestError {
    /// Create a missing field error
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }
}

/// Failures a capability agent reports instead of a solved result
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AgentFault {
    /// Target is outside the agent's allow-list
    #[error("{agent} cannot access {target}.")]
    CapabilityDenied { agent: String, target: String },

    /// Target does not match the agent's bound worker type
    #[error("Incorrect server configuration for {agent}.")]
    ConfigurationFault { agent: String, target: String },

    /// The bound worker reported failure
    #[error("{}", .message.as_deref().unwrap_or("Worker failed without an error message"))]
    WorkerFailure {
        worker: String,
        message: Option<String>,
    },
}

impl AgentFault {
    /// Error text carried in the agent's unsolved result.
    ///
    /// A worker failure without a message stays message-less so the
    /// escalation envelope echoes exactly what the worker reported.
    pub fn result_error(&self) -> Option<String> {
        match self {
            AgentFault::WorkerFailure { message, .. } => message.clone(),
            other => Some(other.to_string()),
        }
    }
}

/// Terminal dispatch failures surfaced to the caller
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] RequestError),

    #[error("{message}")]
    EnrichmentFailure { message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl DispatchError {
    /// Create enrichment failure error
    pub fn enrichment_failure<S: Into<String>>(message: S) -> Self {
        Self::EnrichmentFailure {
            message: message.into(),
        }
    }
}

/// Result type for dispatch operations
pub type DispatchResult<T> = Result<T, DispatchError>;
