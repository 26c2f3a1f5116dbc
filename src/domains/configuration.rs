use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A baseline configuration the remote service can evaluate a node against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationConfiguration {
    pub id: String,
    #[serde(rename = "displayName", alias = "pretty_name", alias = "display_name")]
    pub display_name: String,
    #[serde(
        rename = "requiredEvaluators",
        alias = "required_evaluators",
        alias = "evaluators",
        default
    )]
    pub required_evaluators: BTreeSet<String>,
}

impl EvaluationConfiguration {
    /// Handshake evaluators connect over the node's noise port and need its public key.
    pub fn requires_public_key(&self) -> bool {
        self.required_evaluators
            .iter()
            .any(|name| name.contains("handshake"))
    }

    pub fn requires_metrics_port(&self) -> bool {
        self.required_evaluators
            .iter()
            .any(|name| name.starts_with("metrics"))
    }
}

/// Which optional inputs are mandatory under the selected configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FieldRequirements {
    pub public_key: bool,
    pub metrics_port: bool,
}

impl FieldRequirements {
    pub fn for_configuration(configuration: Option<&EvaluationConfiguration>) -> Self {
        match configuration {
            Some(configuration) => Self {
                public_key: configuration.requires_public_key(),
                metrics_port: configuration.requires_metrics_port(),
            },
            None => Self::default(),
        }
    }
}
