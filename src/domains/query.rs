use std::collections::BTreeMap;

use serde::Serialize;

use crate::domains::inputs::CheckInputs;
use crate::domains::network::Network;

pub const NETWORK_KEY: &str = "network";
pub const URL_KEY: &str = "url";
pub const API_PORT_KEY: &str = "apiPort";
pub const NOISE_PORT_KEY: &str = "noisePort";
pub const METRICS_PORT_KEY: &str = "metricsPort";
pub const PUBLIC_KEY_KEY: &str = "publicKey";
pub const BASELINE_CONFIG_KEY: &str = "baselineConfig";

/// Shareable query-string form of a check submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UrlQueryState {
    params: BTreeMap<String, String>,
}

impl UrlQueryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `a=1&b=2`, with or without a leading `?`. Malformed pairs are skipped.
    pub fn parse(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        let mut params = BTreeMap::new();
        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let (Some(key), Some(value)) = (decode_component(key), decode_component(value))
            else {
                continue;
            };
            if key.is_empty() {
                continue;
            }
            params.insert(key, value);
        }
        Self { params }
    }

    pub fn from_submission(
        network: &Network,
        inputs: &CheckInputs,
        baseline_configuration_id: &str,
    ) -> Self {
        let mut state = Self::new();
        state.set(NETWORK_KEY, network.as_str());
        state.set(URL_KEY, &inputs.url);
        state.set(API_PORT_KEY, &inputs.api_port);
        state.set(NOISE_PORT_KEY, &inputs.noise_port);
        state.set(METRICS_PORT_KEY, &inputs.metrics_port);
        state.set(PUBLIC_KEY_KEY, &inputs.public_key);
        state.set(BASELINE_CONFIG_KEY, baseline_configuration_id);
        state
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(|value| value.as_str())
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.params.insert(key.to_string(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Inputs seeded from the query; missing keys become empty fields.
    pub fn inputs(&self) -> CheckInputs {
        let field = |key: &str| self.get(key).unwrap_or_default().to_string();
        CheckInputs {
            url: field(URL_KEY),
            api_port: field(API_PORT_KEY),
            noise_port: field(NOISE_PORT_KEY),
            metrics_port: field(METRICS_PORT_KEY),
            public_key: field(PUBLIC_KEY_KEY),
        }
    }

    pub fn network(&self) -> Option<Network> {
        self.get(NETWORK_KEY)
            .filter(|name| !name.trim().is_empty())
            .map(|name| Network::from(name.to_string()))
    }

    pub fn baseline_config(&self) -> Option<&str> {
        self.get(BASELINE_CONFIG_KEY).filter(|id| !id.is_empty())
    }

    pub fn to_query_string(&self) -> String {
        self.params
            .iter()
            .map(|(key, value)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn decode_component(raw: &str) -> Option<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).ok().map(|value| value.into_owned())
}
