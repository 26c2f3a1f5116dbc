#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use node_checker_console::domains::configuration::EvaluationConfiguration;
use node_checker_console::domains::inputs::CheckRequest;
use node_checker_console::domains::report::{CheckReport, EvaluationResult};
use node_checker_console::error::{NodeCheckerError, Result};
use node_checker_console::interfaces::gateway::HealthCheckGateway;

pub fn configuration(id: &str, evaluators: &[&str]) -> EvaluationConfiguration {
    EvaluationConfiguration {
        id: id.to_string(),
        display_name: format!("{id} display"),
        required_evaluators: evaluators.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn basic_and_noise() -> Vec<EvaluationConfiguration> {
    vec![
        configuration("cfg_noise", &["noise_handshake"]),
        configuration("cfg_basic", &[]),
    ]
}

pub fn passing_report() -> CheckReport {
    CheckReport {
        evaluation_results: vec![EvaluationResult {
            headline: "API is reachable".to_string(),
            score: 100,
            explanation: "The node answered on its API port.".to_string(),
            evaluator_name: "api_reachable".to_string(),
            category: "api".to_string(),
            links: Vec::new(),
        }],
        summary_score: 100,
        summary_explanation: "100: Awesome!".to_string(),
    }
}

/// In-memory gateway that replays queued answers and records every call.
pub struct ScriptedGateway {
    configurations: Vec<EvaluationConfiguration>,
    fail_configurations: bool,
    check_responses: Mutex<VecDeque<Result<CheckReport>>>,
    pub requests: Mutex<Vec<(String, CheckRequest)>>,
    pub configuration_urls: Mutex<Vec<String>>,
    configuration_calls: AtomicUsize,
    check_calls: AtomicUsize,
}

impl ScriptedGateway {
    pub fn new(configurations: Vec<EvaluationConfiguration>) -> Self {
        Self {
            configurations,
            fail_configurations: false,
            check_responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            configuration_urls: Mutex::new(Vec::new()),
            configuration_calls: AtomicUsize::new(0),
            check_calls: AtomicUsize::new(0),
        }
    }

    pub fn unreachable() -> Self {
        let mut gateway = Self::new(Vec::new());
        gateway.fail_configurations = true;
        gateway
    }

    pub fn with_check_response(self, response: Result<CheckReport>) -> Self {
        self.check_responses
            .try_lock()
            .expect("fresh gateway")
            .push_back(response);
        self
    }

    pub fn configuration_calls(&self) -> usize {
        self.configuration_calls.load(Ordering::SeqCst)
    }

    pub fn check_calls(&self) -> usize {
        self.check_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HealthCheckGateway for ScriptedGateway {
    async fn list_configurations(&self, service_url: &str) -> Result<Vec<EvaluationConfiguration>> {
        self.configuration_calls.fetch_add(1, Ordering::SeqCst);
        self.configuration_urls
            .lock()
            .await
            .push(service_url.to_string());
        if self.fail_configurations {
            return Err(NodeCheckerError::Http("connection refused".to_string()));
        }
        Ok(self.configurations.clone())
    }

    async fn run_check(&self, service_url: &str, request: &CheckRequest) -> Result<CheckReport> {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .await
            .push((service_url.to_string(), request.clone()));
        tokio::task::yield_now().await;
        self.check_responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(passing_report()))
    }
}
