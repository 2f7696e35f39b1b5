//! Dispatch diagnostics as an injected dependency
//!
//! Components never log through ambient state of their own choosing: each
//! one holds an `Arc<dyn DispatchObserver>` handed to it at construction and
//! reports [`DispatchEvent`]s to it. [`TracingObserver`] turns those events
//! into structured `tracing` records; tests swap in a recording observer.

use std::sync::Arc;
use tracing::{debug, info, warn};

/// Something that happened while handling a single request
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchEvent {
    /// Validation failed; nothing downstream was called
    RequestRejected { reason: String },
    /// An owning agent was found for the target
    Routed { target: String, agent: String },
    /// The owning agent's worker solved the request
    AgentSolved { agent: String, target: String },
    /// Target is not on the agent's allow-list
    CapabilityDenied { agent: String, target: String },
    /// Target does not match the agent's bound worker type
    ConfigurationFault { agent: String, target: String },
    /// The bound worker reported failure
    WorkerFailed {
        agent: String,
        worker: String,
        error: Option<String>,
    },
    /// Request handed to the fallback coordinator
    Escalated {
        target: String,
        coordinator: String,
        cause: &'static str,
    },
    EnrichmentSucceeded { coordinator: String, enricher: String },
    EnrichmentFailed {
        coordinator: String,
        enricher: String,
        error: Option<String>,
    },
    /// Final result produced for the caller
    Completed { target: String, success: bool },
}

/// Receiver for dispatch diagnostics
pub trait DispatchObserver: Send + Sync {
    fn on_event(&self, event: &DispatchEvent);
}

/// Shared observer handle passed into each component
pub type SharedObserver = Arc<dyn DispatchObserver>;

/// Emits every event as a structured `tracing` record
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl TracingObserver {
    pub fn shared() -> SharedObserver {
        Arc::new(Self)
    }
}

impl DispatchObserver for TracingObserver {
    fn on_event(&self, event: &DispatchEvent) {
        match event {
            DispatchEvent::RequestRejected { reason } => {
                info!(reason = %reason, "Rejected invalid request");
            }
            DispatchEvent::Routed { target, agent } => {
                debug!(target_name = %target, agent = %agent, "Routing request to agent");
            }
            DispatchEvent::AgentSolved { agent, target } => {
                info!(target_name = %target, agent = %agent, "Agent solved the task");
            }
            DispatchEvent::CapabilityDenied { agent, target } => {
                warn!(target_name = %target, agent = %agent, "Agent denied access to target");
            }
            DispatchEvent::ConfigurationFault { agent, target } => {
                warn!(
                    target_name = %target,
                    agent = %agent,
                    "Agent is bound to a different worker than its route; check configuration"
                );
            }
            DispatchEvent::WorkerFailed {
                agent,
                worker,
                error,
            } => {
                info!(
                    agent = %agent,
                    worker = %worker,
                    error = error.as_deref().unwrap_or(""),
                    "Worker reported failure"
                );
            }
            DispatchEvent::Escalated {
                target,
                coordinator,
                cause,
            } => {
                info!(
                    target_name = %target,
                    coordinator = %coordinator,
                    cause = cause,
                    "Escalating to fallback"
                );
            }
            DispatchEvent::EnrichmentSucceeded {
                coordinator,
                enricher,
            } => {
                debug!(coordinator = %coordinator, enricher = %enricher, "Enrichment succeeded");
            }
            DispatchEvent::EnrichmentFailed {
                coordinator,
                enricher,
                error,
            } => {
                warn!(
                    coordinator = %coordinator,
                    enricher = %enricher,
                    error = error.as_deref().unwrap_or(""),
                    "Enrichment failed"
                );
            }
            DispatchEvent::Completed { target, success } => {
                debug!(target_name = %target, success = success, "Request completed");
            }
        }
    }
}

/// Fans each event out to several observers in order
#[derive(Default, Clone)]
pub struct CompositeObserver {
    observers: Vec<SharedObserver>,
}

impl CompositeObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, observer: SharedObserver) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl DispatchObserver for CompositeObserver {
    fn on_event(&self, event: &DispatchEvent) {
        for observer in &self.observers {
            observer.on_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counter(AtomicUsize);

    impl DispatchObserver for Counter {
        fn on_event(&self, _event: &DispatchEvent) {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_composite_fans_out() {
        let first = Arc::new(Counter::default());
        let second = Arc::new(Counter::default());
        let composite = CompositeObserver::new()
            .with(first.clone())
            .with(second.clone());

        assert_eq!(composite.len(), 2);
        composite.on_event(&DispatchEvent::RequestRejected {
            reason: "Missing 'data' key in request.".to_string(),
        });

        assert_eq!(first.0.load(Ordering::Relaxed), 1);
        assert_eq!(second.0.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_tracing_observer_handles_every_event_without_subscriber() {
        let observer = TracingObserver;
        let events = vec![
            DispatchEvent::RequestRejected {
                reason: "r".to_string(),
            },
            DispatchEvent::ConfigurationFault {
                agent: "a".to_string(),
                target: "t".to_string(),
            },
            DispatchEvent::WorkerFailed {
                agent: "a".to_string(),
                worker: "w".to_string(),
                error: None,
            },
            DispatchEvent::Completed {
                target: "t".to_string(),
                success: true,
            },
        ];
        for event in &events {
            observer.on_event(event);
        }
    }
}
