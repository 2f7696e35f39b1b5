//! Escalation Router
//!
//! Routes task requests to the capability agent that owns their target, and
//! escalates to a generalist fallback when that agent fails or no agent owns
//! the target.
//!
//! # Overview
//!
//! - Request validation and the message types passed between components
//! - Capability agents guarded by an allow-list, each bound to one worker
//! - A fallback coordinator that recovers the most specific payload from an
//!   escalation envelope and hands it to an enricher
//! - A dispatcher tying them together over an immutable routing table
//!
//! # Quick Start
//!
//! ```rust
//! use escalation_router::config::RouterConfig;
//! use escalation_router::observability::TracingObserver;
//! use escalation_router::routing::Dispatcher;
//! use serde_json::json;
//!
//! let dispatcher =
//!     Dispatcher::from_config(&RouterConfig::default(), TracingObserver::shared()).unwrap();
//!
//! // Worker failure escalates to the enricher
//! let result = dispatcher.handle(&json!({
//!     "mcp_server": "WorkerA",
//!     "data": {"payload": "y", "error": true}
//! }));
//! assert!(result.success);
//!
//! // Missing keys are rejected before anything is called
//! let result = dispatcher.handle(&json!({"data": "no target"}));
//! assert_eq!(
//!     result.error.as_deref(),
//!     Some("Invalid request: Missing 'mcp_server' key in request.")
//! );
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod observability;
pub mod protocol;
pub mod routing;
pub mod testing;
pub mod workers;

pub use agent::{CapabilityAgent, FallbackCoordinator};
pub use config::*;
pub use error::{AgentFault, DispatchError, DispatchResult, RequestError};
pub use protocol::*;
pub use routing::{Dispatcher, DispatcherBuilder, RoutingTable};
pub use workers::{Enricher, SolveOutcome, Worker};
