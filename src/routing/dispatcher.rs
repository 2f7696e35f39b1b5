//! Request dispatcher: validate, route, escalate
//!
//! ```text
//! caller → Dispatcher → CapabilityAgent → Worker
//!                 └──(failure / no owner)──→ FallbackCoordinator → Enricher
//! ```
//!
//! Every request runs to completion synchronously. Each downstream stage is
//! attempted once; the only terminal failures are an invalid request and a
//! failed enrichment.
//!
//! # Example
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
//! let result = dispatcher.handle(&json!({"mcp_server": "WorkerA", "data": {"info": "x"}}));
//! assert!(result.success);
//! assert_eq!(
//!     result.data,
//!     Some(json!("Processed data from WorkerA: {'info': 'x'}"))
//! );
//! ```

use super::table::RoutingTable;
use crate::agent::{CapabilityAgent, FallbackCoordinator};
use crate::config::{ConfigError, RouterConfig};
use crate::error::{DispatchError, DispatchResult, RequestError};
use crate::observability::{request_span, DispatchEvent, SharedObserver, TracingObserver};
use crate::protocol::{EscalationEnvelope, FinalResult, Request};
use crate::workers::{StubEnricher, StubWorker};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Entry point for inbound requests
pub struct Dispatcher {
    table: RoutingTable,
    fallback: FallbackCoordinator,
    observer: SharedObserver,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("table", &self.table)
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// Wire the stub collaborators named in `config`
    pub fn from_config(config: &RouterConfig, observer: SharedObserver) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut builder = Self::builder().observer(observer);
        for section in &config.agents {
            let worker = Arc::new(StubWorker::new(section.worker.clone()));
            let agent = CapabilityAgent::new(
                section.name.clone(),
                section.allowed_targets.iter().cloned(),
                worker,
            )
            .with_routes(section.effective_routes().iter().cloned());
            builder = builder.agent(agent);
        }

        let enricher = Arc::new(StubEnricher::new(config.fallback.enricher.clone()));
        builder
            .fallback(FallbackCoordinator::new(config.fallback.name.clone(), enricher))
            .build()
    }

    /// Check that both required keys are present
    pub fn validate(&self, raw: &Value) -> Result<Request, RequestError> {
        Request::from_value(raw)
    }

    /// Agent owning the request's target, if any
    ///
    /// Only string targets can match a route.
    pub fn route(&self, request: &Request) -> Option<&CapabilityAgent> {
        request
            .target_name()
            .and_then(|target| self.table.lookup(target))
    }

    pub fn routing_table(&self) -> &RoutingTable {
        &self.table
    }

    pub fn fallback(&self) -> &FallbackCoordinator {
        &self.fallback
    }

    /// Handle one request, returning the solved value or a terminal error
    pub fn dispatch(&self, raw: &Value) -> DispatchResult<Value> {
        let request = match self.validate(raw) {
            Ok(request) => request,
            Err(error) => {
                self.observer.on_event(&DispatchEvent::RequestRejected {
                    reason: error.to_string(),
                });
                return Err(error.into());
            }
        };

        let span = request_span!(
            request_id = %Uuid::new_v4(),
            target_name = %request.target_label()
        );
        let _guard = span.enter();

        let outcome = self.resolve(&request);
        self.observer.on_event(&DispatchEvent::Completed {
            target: request.target_label(),
            success: outcome.is_ok(),
        });
        outcome
    }

    /// Handle one request and shape the outcome for the caller
    pub fn handle(&self, raw: &Value) -> FinalResult {
        match self.dispatch(raw) {
            Ok(data) => FinalResult::success(data),
            Err(error) => FinalResult::failure(error.to_string()),
        }
    }

    fn resolve(&self, request: &Request) -> DispatchResult<Value> {
        let envelope = match self.route(request) {
            Some(agent) => {
                self.observer.on_event(&DispatchEvent::Routed {
                    target: request.target_label(),
                    agent: agent.name().to_string(),
                });

                let result = agent.perform_task(request);
                if result.solved {
                    return Ok(result.result.unwrap_or(Value::Null));
                }
                EscalationEnvelope::from_agent_failure(request, result)
            }
            None => EscalationEnvelope::from_no_agent(request),
        };

        self.observer.on_event(&DispatchEvent::Escalated {
            target: request.target_label(),
            coordinator: self.fallback.name().to_string(),
            cause: envelope.partial_data.kind(),
        });

        let result = self.fallback.enrich_and_solve(&envelope);
        if result.solved {
            Ok(result.result.unwrap_or(Value::Null))
        } else {
            let message = result
                .error
                .unwrap_or_else(|| self.fallback.default_error());
            Err(DispatchError::enrichment_failure(message))
        }
    }
}

/// Assembles a dispatcher from explicitly constructed components
///
/// An observer set here replaces the observer of every agent and of the
/// fallback coordinator, so one sink sees the whole request chain.
#[derive(Default)]
pub struct DispatcherBuilder {
    agents: Vec<CapabilityAgent>,
    fallback: Option<FallbackCoordinator>,
    observer: Option<SharedObserver>,
}

impl DispatcherBuilder {
    pub fn agent(mut self, agent: CapabilityAgent) -> Self {
        self.agents.push(agent);
        self
    }

    pub fn fallback(mut self, fallback: FallbackCoordinator) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn observer(mut self, observer: SharedObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn build(self) -> Result<Dispatcher, ConfigError> {
        let mut fallback = self.fallback.ok_or(ConfigError::MissingFallback)?;
        let mut agents = self.agents;

        let observer = match self.observer {
            Some(observer) => {
                agents = agents
                    .into_iter()
                    .map(|agent| agent.with_observer(observer.clone()))
                    .collect();
                fallback = fallback.with_observer(observer.clone());
                observer
            }
            None => TracingObserver::shared(),
        };

        Ok(Dispatcher {
            table: RoutingTable::build(agents)?,
            fallback,
            observer,
        })
    }
}
