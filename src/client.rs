use std::sync::Arc;

use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};

use crate::config::Config;
use crate::domains::inputs::InputField;
use crate::domains::network::Network;
use crate::domains::query::UrlQueryState;
use crate::error::Result;
use crate::interfaces::gateway::HealthCheckGateway;
use crate::services::gateway::{HttpGateway, ServiceResolver};
use crate::services::orchestrator::{CheckCommand, CheckEvent, CheckOrchestrator, CheckResult};
use crate::services::view::ConsoleView;

/// Drives a `CheckOrchestrator`, running its gateway commands cooperatively on the
/// caller's task and feeding each completion back as an event.
pub struct CheckConsole {
    orchestrator: CheckOrchestrator,
    gateway: Arc<dyn HealthCheckGateway>,
    in_flight: FuturesUnordered<BoxFuture<'static, CheckEvent>>,
}

impl CheckConsole {
    pub fn new(
        gateway: Arc<dyn HealthCheckGateway>,
        resolver: ServiceResolver,
        network: Network,
        query: UrlQueryState,
    ) -> Self {
        let mut console = Self {
            orchestrator: CheckOrchestrator::new(resolver, network, query),
            gateway,
            in_flight: FuturesUnordered::new(),
        };
        let commands = console.orchestrator.mount();
        console.schedule(commands);
        console
    }

    pub fn from_config(config: &Config, network: Network, query: UrlQueryState) -> Result<Self> {
        let gateway = Arc::new(HttpGateway::from_config(config)?);
        Ok(Self::new(
            gateway,
            ServiceResolver::from_config(config),
            network,
            query,
        ))
    }

    pub fn dispatch(&mut self, event: CheckEvent) {
        let commands = self.orchestrator.handle(event);
        self.schedule(commands);
    }

    pub fn set_input(&mut self, field: InputField, value: impl Into<String>) {
        self.dispatch(CheckEvent::InputChanged {
            field,
            value: value.into(),
        });
    }

    fn schedule(&mut self, commands: Vec<CheckCommand>) {
        for command in commands {
            let gateway = Arc::clone(&self.gateway);
            let pending = match command {
                CheckCommand::FetchConfigurations {
                    generation,
                    service_url,
                } => async move {
                    let result = gateway.list_configurations(&service_url).await;
                    CheckEvent::ConfigurationsLoaded {
                        generation,
                        service_url,
                        result,
                    }
                }
                .boxed(),
                CheckCommand::RunCheck {
                    request_id,
                    service_url,
                    request,
                } => async move {
                    let result = gateway.run_check(&service_url, &request).await;
                    CheckEvent::CheckCompleted { request_id, result }
                }
                .boxed(),
            };
            self.in_flight.push(pending);
        }
    }

    /// Waits for the next gateway response and applies it. Returns `false` when
    /// nothing is outstanding.
    pub async fn poll_next(&mut self) -> bool {
        match self.in_flight.next().await {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    /// Runs until every outstanding gateway call has resolved.
    pub async fn settle(&mut self) {
        while self.poll_next().await {}
    }

    /// Submits the current inputs and waits for the outcome.
    pub async fn check(&mut self) -> Option<&CheckResult> {
        self.dispatch(CheckEvent::SubmitRequested);
        self.settle().await;
        self.orchestrator.result()
    }

    pub fn pending(&self) -> usize {
        self.in_flight.len()
    }

    pub fn orchestrator(&self) -> &CheckOrchestrator {
        &self.orchestrator
    }

    pub fn view(&self) -> ConsoleView {
        ConsoleView::from_orchestrator(&self.orchestrator)
    }
}
