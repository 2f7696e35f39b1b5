//! Capability agents: allow-list checked access to a single bound worker

use crate::error::AgentFault;
use crate::observability::{DispatchEvent, SharedObserver, TracingObserver};
use crate::protocol::{AgentResult, Request};
use crate::workers::{SolveOutcome, Worker};
use std::fmt;
use std::sync::Arc;

/// Agent authorized to invoke one worker type
///
/// The allow-list is checked on every call, independently of the
/// dispatcher's routing table. `routes` is the set of targets this agent
/// declares ownership of for routing; it defaults to the allow-list.
pub struct CapabilityAgent {
    name: String,
    allowed_targets: Vec<String>,
    routes: Vec<String>,
    worker: Arc<dyn Worker>,
    observer: SharedObserver,
}

impl fmt::Debug for CapabilityAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityAgent")
            .field("name", &self.name)
            .field("allowed_targets", &self.allowed_targets)
            .field("routes", &self.routes)
            .field("worker", &self.worker.name())
            .finish()
    }
}

impl CapabilityAgent {
    pub fn new<S, I, T>(name: S, allowed_targets: I, worker: Arc<dyn Worker>) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let allowed_targets: Vec<String> = allowed_targets.into_iter().map(Into::into).collect();
        Self {
            name: name.into(),
            routes: allowed_targets.clone(),
            allowed_targets,
            worker,
            observer: TracingObserver::shared(),
        }
    }

    /// Declare routing ownership separately from the allow-list
    pub fn with_routes<I, T>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.routes = routes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_observer(mut self, observer: SharedObserver) -> Self {
        self.observer = observer;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn allowed_targets(&self) -> &[String] {
        &self.allowed_targets
    }

    pub fn routes(&self) -> &[String] {
        &self.routes
    }

    /// Worker type this agent is bound to
    pub fn worker_type(&self) -> &str {
        self.worker.name()
    }

    /// Check whether this agent may serve `target` with its bound worker
    pub fn authorize(&self, target: &str) -> Result<(), AgentFault> {
        if !self.allowed_targets.iter().any(|t| t == target) {
            return Err(AgentFault::CapabilityDenied {
                agent: self.name.clone(),
                target: target.to_string(),
            });
        }

        if target != self.worker.name() {
            return Err(AgentFault::ConfigurationFault {
                agent: self.name.clone(),
                target: target.to_string(),
            });
        }

        Ok(())
    }

    /// Run the request through the bound worker and normalize its outcome.
    ///
    /// Every failure comes back as an unsolved result echoing the request.
    pub fn perform_task(&self, request: &Request) -> AgentResult {
        let authorized = match request.target_name() {
            Some(target) => self.authorize(target),
            None => Err(AgentFault::CapabilityDenied {
                agent: self.name.clone(),
                target: request.target_label(),
            }),
        };
        if let Err(fault) = authorized {
            self.observer.on_event(&self.fault_event(&fault));
            return AgentResult::unsolved(fault.result_error(), request.clone());
        }

        match self.worker.solve(&request.payload) {
            SolveOutcome::Success { data } => {
                self.observer.on_event(&DispatchEvent::AgentSolved {
                    agent: self.name.clone(),
                    target: request.target_label(),
                });
                AgentResult::solved(data.into())
            }
            SolveOutcome::Failure { error } => {
                let fault = AgentFault::WorkerFailure {
                    worker: self.worker.name().to_string(),
                    message: error,
                };
                self.observer.on_event(&self.fault_event(&fault));
                AgentResult::unsolved(fault.result_error(), request.clone())
            }
        }
    }

    fn fault_event(&self, fault: &AgentFault) -> DispatchEvent {
        match fault {
            AgentFault::CapabilityDenied { agent, target } => DispatchEvent::CapabilityDenied {
                agent: agent.clone(),
                target: target.clone(),
            },
            AgentFault::ConfigurationFault { agent, target } => {
                DispatchEvent::ConfigurationFault {
                    agent: agent.clone(),
                    target: target.clone(),
                }
            }
            AgentFault::WorkerFailure { worker, message } => DispatchEvent::WorkerFailed {
                agent: self.name.clone(),
                worker: worker.clone(),
                error: message.clone(),
            },
        }
    }
}
