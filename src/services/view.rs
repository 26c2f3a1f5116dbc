use serde::Serialize;

use crate::domains::configuration::FieldRequirements;
use crate::domains::inputs::CheckInputs;
use crate::services::orchestrator::{CheckOrchestrator, CheckResult, CheckState};
use crate::validation::InputValidation;

pub const IDLE_HINT: &str = "Only the node URL is required, other fields are only necessary if you want to check that component.";

const LOADING_TEXT: [&str; 24] = [
    "Reticulating splines...",
    "Swapping time and space...",
    "Spinning violently around the y-axis...",
    "Tokenizing real life...",
    "Filtering morale...",
    "Crumbling breadcrumbs...",
    "Weighing the ocean...",
    "Reinventing the wheel...",
    "Compiling the sun...",
    "Translating the moon...",
    "Rendering the universe...",
    "Washing the dishes...",
    "Contacting spline reticulation server...",
    "Destabilizing orbital payloads...",
    "Unsequencing genomes...",
    "Picking berries...",
    "Loading more than you ever thought possible...",
    "Training neural networks...",
    "Nerfing the sun...",
    "Buffing the sun...",
    "Downloading more RAM...",
    "Uploading surplus RAM...",
    "Solving the halting problem...",
    "Proving P=NP...",
];

pub fn loading_text(request_id: u64) -> &'static str {
    LOADING_TEXT[(request_id % LOADING_TEXT.len() as u64) as usize]
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigurationOption {
    pub id: String,
    pub display_name: String,
}

/// Snapshot of everything the presentation layer draws.
#[derive(Debug, Clone, Serialize)]
pub struct ConsoleView {
    pub network: String,
    pub service_url: String,
    pub inputs: CheckInputs,
    pub validation: InputValidation,
    pub requirements: FieldRequirements,
    pub configurations: Vec<ConfigurationOption>,
    pub selected_configuration: Option<String>,
    pub configurations_loading: bool,
    pub checking: bool,
    pub can_submit: bool,
    pub status_text: Option<String>,
    pub result: Option<CheckResult>,
    pub error: Option<String>,
    pub share_query: String,
}

impl ConsoleView {
    pub fn from_orchestrator(orchestrator: &CheckOrchestrator) -> Self {
        let status_text = match orchestrator.state() {
            CheckState::Idle => Some(IDLE_HINT.to_string()),
            CheckState::Checking { request_id } => Some(loading_text(*request_id).to_string()),
            CheckState::Completed(_) => None,
        };
        Self {
            network: orchestrator.network().to_string(),
            service_url: orchestrator.service_url().to_string(),
            inputs: orchestrator.inputs().clone(),
            validation: orchestrator.validation(),
            requirements: orchestrator.requirements(),
            configurations: orchestrator
                .registry()
                .list()
                .map(|configuration| ConfigurationOption {
                    id: configuration.id.clone(),
                    display_name: configuration.display_name.clone(),
                })
                .collect(),
            selected_configuration: orchestrator
                .selected_configuration()
                .map(|configuration| configuration.id.clone()),
            configurations_loading: orchestrator.configurations_loading(),
            checking: orchestrator.is_checking(),
            can_submit: orchestrator.can_submit(),
            status_text,
            result: orchestrator.result().cloned(),
            error: orchestrator.error_banner().map(str::to_string),
            share_query: orchestrator.query().to_query_string(),
        }
    }
}
