//! Test helpers and utilities for integration tests

use escalation_router::agent::{CapabilityAgent, FallbackCoordinator};
use escalation_router::config::RouterConfig;
use escalation_router::observability::TracingObserver;
use escalation_router::routing::Dispatcher;
use escalation_router::testing::{MockEnricher, MockWorker, RecordingObserver};
use std::sync::Arc;

/// Dispatcher over the default topology with stub collaborators
#[allow(dead_code)]
pub fn default_dispatcher() -> Dispatcher {
    Dispatcher::from_config(&RouterConfig::default(), TracingObserver::shared())
        .expect("default topology should build")
}

/// Two mock-backed agents, a mock enricher, and a recording observer
#[allow(dead_code)]
pub struct MockTopology {
    pub dispatcher: Dispatcher,
    pub worker_a: Arc<MockWorker>,
    pub worker_b: Arc<MockWorker>,
    pub enricher: Arc<MockEnricher>,
    pub observer: Arc<RecordingObserver>,
}

#[allow(dead_code)]
pub fn mock_topology(
    worker_a: MockWorker,
    worker_b: MockWorker,
    enricher: MockEnricher,
) -> MockTopology {
    let worker_a = Arc::new(worker_a);
    let worker_b = Arc::new(worker_b);
    let enricher = Arc::new(enricher);
    let observer = Arc::new(RecordingObserver::new());

    let dispatcher = Dispatcher::builder()
        .agent(CapabilityAgent::new(
            "CapabilityAgentA",
            ["WorkerA"],
            worker_a.clone(),
        ))
        .agent(CapabilityAgent::new(
            "CapabilityAgentB",
            ["WorkerB"],
            worker_b.clone(),
        ))
        .fallback(FallbackCoordinator::new(
            "FallbackCoordinator",
            enricher.clone(),
        ))
        .observer(observer.clone())
        .build()
        .expect("mock topology should build");

    MockTopology {
        dispatcher,
        worker_a,
        worker_b,
        enricher,
        observer,
    }
}
