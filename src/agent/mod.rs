//! Agents that act on routed requests
//!
//! Capability agents each own an allow-list and a single bound worker.
//! The fallback coordinator owns the enricher that escalated requests end
//! up with.

pub mod capability;
pub mod fallback;

pub use capability::CapabilityAgent;
pub use fallback::FallbackCoordinator;
