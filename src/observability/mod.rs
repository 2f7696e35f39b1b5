//! Observability for the dispatch pipeline
//!
//! Structured logging setup, the injected event observer, and counters
//! built on top of it.

pub mod events;
pub mod logging;
pub mod metrics;

pub use events::{CompositeObserver, DispatchEvent, DispatchObserver, SharedObserver, TracingObserver};
pub use logging::{init_default_logging, init_logging, LogFormat};
pub use metrics::{DispatchMetrics, MetricsSnapshot};

pub use logging::{escalation_span, request_span};
