use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::domains::configuration::{EvaluationConfiguration, FieldRequirements};
use crate::domains::inputs::{CheckInputs, CheckRequest, InputField};
use crate::domains::network::Network;
use crate::domains::query::UrlQueryState;
use crate::domains::report::CheckReport;
use crate::error::{NodeCheckerError, Result};
use crate::services::gateway::ServiceResolver;
use crate::services::registry::ConfigurationRegistry;
use crate::validation::{parse_port, validate_inputs, InputValidation};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum CheckResult {
    Pending,
    Success(Box<CheckReport>),
    Failure(String),
}

static PENDING: CheckResult = CheckResult::Pending;

#[derive(Debug, Clone, PartialEq)]
pub enum CheckState {
    Idle,
    Checking { request_id: u64 },
    Completed(CheckResult),
}

/// Everything that can move the orchestrator.
#[derive(Debug)]
pub enum CheckEvent {
    NetworkChanged(Network),
    UrlStateChanged(UrlQueryState),
    ConfigurationsLoaded {
        generation: u64,
        service_url: String,
        result: Result<Vec<EvaluationConfiguration>>,
    },
    ConfigurationSelected(String),
    InputChanged {
        field: InputField,
        value: String,
    },
    SubmitRequested,
    CheckCompleted {
        request_id: u64,
        result: Result<CheckReport>,
    },
    ErrorDismissed,
}

/// Gateway work the driver must perform and report back as an event.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckCommand {
    FetchConfigurations {
        generation: u64,
        service_url: String,
    },
    RunCheck {
        request_id: u64,
        service_url: String,
        request: CheckRequest,
    },
}

pub struct CheckOrchestrator {
    resolver: ServiceResolver,
    network: Network,
    query: UrlQueryState,
    inputs: CheckInputs,
    registry: ConfigurationRegistry,
    selected: Option<Arc<EvaluationConfiguration>>,
    requirements: FieldRequirements,
    state: CheckState,
    error_banner: Option<String>,
    fetch_generation: u64,
    configurations_loading: bool,
    next_request_id: u64,
    /// Last check sent whose response has not come back, current or abandoned.
    outstanding_check: Option<u64>,
}

impl CheckOrchestrator {
    pub fn new(resolver: ServiceResolver, network: Network, query: UrlQueryState) -> Self {
        let inputs = query.inputs();
        Self {
            resolver,
            network,
            query,
            inputs,
            registry: ConfigurationRegistry::new(),
            selected: None,
            requirements: FieldRequirements::default(),
            state: CheckState::Idle,
            error_banner: None,
            fetch_generation: 0,
            configurations_loading: false,
            next_request_id: 1,
            outstanding_check: None,
        }
    }

    /// Starts the first configuration fetch for the initial network.
    pub fn mount(&mut self) -> Vec<CheckCommand> {
        vec![self.begin_configuration_fetch()]
    }

    pub fn handle(&mut self, event: CheckEvent) -> Vec<CheckCommand> {
        match event {
            CheckEvent::NetworkChanged(network) => self.on_network_changed(network),
            CheckEvent::UrlStateChanged(query) => {
                self.on_url_state_changed(query);
                Vec::new()
            }
            CheckEvent::ConfigurationsLoaded {
                generation,
                service_url,
                result,
            } => {
                self.on_configurations_loaded(generation, &service_url, result);
                Vec::new()
            }
            CheckEvent::ConfigurationSelected(id) => {
                self.on_configuration_selected(&id);
                Vec::new()
            }
            CheckEvent::InputChanged { field, value } => {
                self.inputs.set(field, value);
                Vec::new()
            }
            CheckEvent::SubmitRequested => self.on_submit().into_iter().collect(),
            CheckEvent::CheckCompleted { request_id, result } => {
                self.on_check_completed(request_id, result);
                Vec::new()
            }
            CheckEvent::ErrorDismissed => {
                self.error_banner = None;
                Vec::new()
            }
        }
    }

    fn on_network_changed(&mut self, network: Network) -> Vec<CheckCommand> {
        if network == self.network {
            return Vec::new();
        }
        info!(from = %self.network, to = %network, "network changed");
        self.network = network;
        self.reset_to_idle();
        vec![self.begin_configuration_fetch()]
    }

    fn on_url_state_changed(&mut self, query: UrlQueryState) {
        if query == self.query {
            return;
        }
        if let CheckState::Checking { request_id } = self.state {
            debug!(request_id, "ignoring url state change while checking");
            return;
        }
        debug!(query = %query.to_query_string(), "url state changed");
        self.query = query;
        self.reset_to_idle();
        if !self.configurations_loading && !self.registry.is_empty() {
            let preferred = self.query.baseline_config().map(str::to_string);
            self.select(self.registry.resolve_default(preferred.as_deref()));
        }
    }

    fn begin_configuration_fetch(&mut self) -> CheckCommand {
        self.registry.clear();
        self.select(None);
        self.fetch_generation += 1;
        self.configurations_loading = true;
        CheckCommand::FetchConfigurations {
            generation: self.fetch_generation,
            service_url: self.service_url().to_string(),
        }
    }

    fn on_configurations_loaded(
        &mut self,
        generation: u64,
        service_url: &str,
        result: Result<Vec<EvaluationConfiguration>>,
    ) {
        if generation != self.fetch_generation {
            debug!(generation, current = self.fetch_generation, "discarding stale configuration list");
            return;
        }
        self.configurations_loading = false;
        match self.registry.apply(service_url, result) {
            Ok(()) => {
                let preferred = self.query.baseline_config().map(str::to_string);
                self.select(self.registry.resolve_default(preferred.as_deref()));
                self.error_banner = None;
            }
            Err(err) => {
                self.select(None);
                self.error_banner = Some(banner_message(&err));
            }
        }
    }

    fn on_configuration_selected(&mut self, id: &str) {
        match self.registry.get(id) {
            Some(configuration) => self.select(Some(configuration)),
            None => warn!(id, "ignoring selection of unknown configuration"),
        }
    }

    fn select(&mut self, configuration: Option<Arc<EvaluationConfiguration>>) {
        self.requirements = FieldRequirements::for_configuration(configuration.as_deref());
        self.selected = configuration;
    }

    fn on_submit(&mut self) -> Option<CheckCommand> {
        if let CheckState::Checking { request_id } = self.state {
            debug!(request_id, "check already in flight, ignoring submit");
            return None;
        }
        if let Some(request_id) = self.outstanding_check {
            debug!(request_id, "abandoned check still outstanding, ignoring submit");
            return None;
        }
        let validation = self.validation();
        if !validation.all_valid() {
            debug!(invalid = ?validation.invalid_fields(), "submit blocked by invalid fields");
            return None;
        }
        let Some(configuration) = self.selected.clone() else {
            debug!("submit blocked, no configuration selected");
            return None;
        };
        let request = match build_request(&self.inputs, &configuration.id) {
            Ok(request) => request,
            Err(err) => {
                error!(error = %err, "validated inputs failed to convert");
                return None;
            }
        };

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.outstanding_check = Some(request_id);
        self.query = UrlQueryState::from_submission(&self.network, &self.inputs, &configuration.id);
        self.error_banner = None;
        self.state = CheckState::Checking { request_id };
        info!(
            request_id,
            node_url = %request.node_url,
            configuration = %configuration.id,
            "starting node check"
        );
        Some(CheckCommand::RunCheck {
            request_id,
            service_url: self.service_url().to_string(),
            request,
        })
    }

    fn on_check_completed(&mut self, request_id: u64, result: Result<CheckReport>) {
        if self.outstanding_check == Some(request_id) {
            self.outstanding_check = None;
        }
        if self.state != (CheckState::Checking { request_id }) {
            info!(request_id, "discarding stale check response");
            return;
        }
        self.state = match result {
            Ok(report) => {
                self.error_banner = None;
                CheckState::Completed(CheckResult::Success(Box::new(report)))
            }
            Err(err) => {
                let message = failure_message(&err);
                warn!(request_id, error = %err, "node check failed");
                self.error_banner = Some(message.clone());
                CheckState::Completed(CheckResult::Failure(message))
            }
        };
    }

    fn reset_to_idle(&mut self) {
        if let CheckState::Checking { request_id } = self.state {
            info!(request_id, "abandoning in-flight check");
        }
        self.state = CheckState::Idle;
        self.error_banner = None;
        self.inputs = self.query.inputs();
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn service_url(&self) -> &str {
        self.resolver.resolve(&self.network)
    }

    pub fn query(&self) -> &UrlQueryState {
        &self.query
    }

    pub fn inputs(&self) -> &CheckInputs {
        &self.inputs
    }

    pub fn registry(&self) -> &ConfigurationRegistry {
        &self.registry
    }

    pub fn selected_configuration(&self) -> Option<&EvaluationConfiguration> {
        self.selected.as_deref()
    }

    pub fn requirements(&self) -> FieldRequirements {
        self.requirements
    }

    pub fn state(&self) -> &CheckState {
        &self.state
    }

    pub fn is_checking(&self) -> bool {
        matches!(self.state, CheckState::Checking { .. })
    }

    pub fn configurations_loading(&self) -> bool {
        self.configurations_loading
    }

    pub fn result(&self) -> Option<&CheckResult> {
        match &self.state {
            CheckState::Idle => None,
            CheckState::Checking { .. } => Some(&PENDING),
            CheckState::Completed(result) => Some(result),
        }
    }

    pub fn error_banner(&self) -> Option<&str> {
        self.error_banner.as_deref()
    }

    pub fn validation(&self) -> InputValidation {
        validate_inputs(&self.inputs, self.requirements)
    }

    pub fn can_submit(&self) -> bool {
        self.outstanding_check.is_none()
            && self.selected.is_some()
            && self.validation().all_valid()
    }
}

/// Built from the same inputs the query state records, which are exact once validated.
fn build_request(inputs: &CheckInputs, configuration_id: &str) -> Result<CheckRequest> {
    let port = |raw: &str| -> Result<Option<u16>> {
        if raw.is_empty() {
            return Ok(None);
        }
        parse_port(raw)
            .map(Some)
            .ok_or_else(|| NodeCheckerError::Runtime(format!("port {raw} out of range")))
    };
    let public_key = &inputs.public_key;
    Ok(CheckRequest {
        node_url: inputs.url.clone(),
        baseline_configuration_id: configuration_id.to_string(),
        api_port: port(&inputs.api_port)?,
        noise_port: port(&inputs.noise_port)?,
        metrics_port: port(&inputs.metrics_port)?,
        public_key: (!public_key.is_empty()).then(|| public_key.clone()),
    })
}

fn banner_message(err: &NodeCheckerError) -> String {
    match err {
        NodeCheckerError::Http(message) => message.clone(),
        other => other.to_string(),
    }
}

/// Folds the remote service's structured error body into the message when present.
pub fn failure_message(err: &NodeCheckerError) -> String {
    let mut message = format!("Failed to check node: {err}");
    if let Some(detail) = err.remote_detail() {
        message.push_str(": ");
        message.push_str(&detail);
    }
    message
}
