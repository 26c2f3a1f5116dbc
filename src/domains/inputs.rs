use serde::{Deserialize, Serialize};

/// Raw text of every check input, exactly as the user typed it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInputs {
    pub url: String,
    pub api_port: String,
    pub noise_port: String,
    pub metrics_port: String,
    pub public_key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    Url,
    ApiPort,
    NoisePort,
    MetricsPort,
    PublicKey,
}

impl InputField {
    pub const ALL: [InputField; 5] = [
        InputField::Url,
        InputField::ApiPort,
        InputField::NoisePort,
        InputField::MetricsPort,
        InputField::PublicKey,
    ];

    pub fn label(self) -> &'static str {
        match self {
            InputField::Url => "Node URL",
            InputField::ApiPort => "API Port",
            InputField::NoisePort => "Noise Port",
            InputField::MetricsPort => "Metrics Port",
            InputField::PublicKey => "Public Key",
        }
    }
}

impl CheckInputs {
    pub fn get(&self, field: InputField) -> &str {
        match field {
            InputField::Url => &self.url,
            InputField::ApiPort => &self.api_port,
            InputField::NoisePort => &self.noise_port,
            InputField::MetricsPort => &self.metrics_port,
            InputField::PublicKey => &self.public_key,
        }
    }

    pub fn set(&mut self, field: InputField, value: impl Into<String>) {
        let slot = match field {
            InputField::Url => &mut self.url,
            InputField::ApiPort => &mut self.api_port,
            InputField::NoisePort => &mut self.noise_port,
            InputField::MetricsPort => &mut self.metrics_port,
            InputField::PublicKey => &mut self.public_key,
        };
        *slot = value.into();
    }
}

/// A single check submission as sent to the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckRequest {
    pub node_url: String,
    pub baseline_configuration_id: String,
    pub api_port: Option<u16>,
    pub noise_port: Option<u16>,
    pub metrics_port: Option<u16>,
    pub public_key: Option<String>,
}

impl CheckRequest {
    /// Query parameters for the check endpoint; absent optionals are omitted.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("baselineConfigurationId", self.baseline_configuration_id.clone()),
            ("nodeUrl", self.node_url.clone()),
        ];
        if let Some(port) = self.api_port {
            pairs.push(("apiPort", port.to_string()));
        }
        if let Some(port) = self.noise_port {
            pairs.push(("noisePort", port.to_string()));
        }
        if let Some(port) = self.metrics_port {
            pairs.push(("metricsPort", port.to_string()));
        }
        if let Some(key) = &self.public_key {
            pairs.push(("publicKey", key.clone()));
        }
        pairs
    }
}
