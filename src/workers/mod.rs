//! Collaborator contracts
//!
//! Workers and enrichers are external collaborators: the router calls them
//! and normalizes their outcome but never looks inside. The two capabilities
//! are separate traits; a type may implement both, and the router only ever
//! calls `solve` on workers and `enrich_and_solve` on enrichers.

pub mod repr;
pub mod stubs;

pub use repr::{is_truthy, PayloadRepr};
pub use stubs::{StubEnricher, StubWorker};

use serde_json::Value;

/// Outcome reported by a worker or enricher
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    Success { data: String },
    Failure { error: Option<String> },
}

impl SolveOutcome {
    pub fn success<S: Into<String>>(data: S) -> Self {
        Self::Success { data: data.into() }
    }

    pub fn failure<S: Into<String>>(error: S) -> Self {
        Self::Failure {
            error: Some(error.into()),
        }
    }

    /// Failure that carries no message
    pub fn silent_failure() -> Self {
        Self::Failure { error: None }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SolveOutcome::Success { .. })
    }
}

/// A worker solves payloads for the target it is named after
pub trait Worker: Send + Sync {
    /// Worker type name, which is also the target it serves
    fn name(&self) -> &str;

    /// Solve a payload. Must return, never panic, for any input.
    fn solve(&self, payload: &Value) -> SolveOutcome;
}

/// An enricher synthesizes a result from degraded or partial payloads
pub trait Enricher: Send + Sync {
    fn name(&self) -> &str;

    /// Attempt best-effort resolution. Must return, never panic, for any input.
    fn enrich_and_solve(&self, payload: &Value) -> SolveOutcome;
}
