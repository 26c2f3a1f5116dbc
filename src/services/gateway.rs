use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::Config;
use crate::domains::configuration::EvaluationConfiguration;
use crate::domains::inputs::CheckRequest;
use crate::domains::network::Network;
use crate::domains::report::CheckReport;
use crate::error::{NodeCheckerError, Result};
use crate::interfaces::gateway::HealthCheckGateway;

pub const DEFAULT_SERVICE_URL: &str = "https://node-checker.dev.gcp.aptosdev.com";
pub const LOCAL_SERVICE_URL: &str = "http://127.0.0.1:20121";

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
// Checks run every evaluator against the node before answering.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Maps a network to the health-check service instance that serves it.
#[derive(Debug, Clone)]
pub struct ServiceResolver {
    default_url: String,
    overrides: HashMap<String, String>,
}

impl Default for ServiceResolver {
    fn default() -> Self {
        let mut overrides = HashMap::new();
        overrides.insert(Network::Local.as_str().to_string(), LOCAL_SERVICE_URL.to_string());
        Self {
            default_url: DEFAULT_SERVICE_URL.to_string(),
            overrides,
        }
    }
}

impl ServiceResolver {
    pub fn from_config(config: &Config) -> Self {
        let mut resolver = Self::default();
        if let Some(url) = config
            .default_service_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
        {
            resolver.default_url = url.to_string();
        }
        if let Some(table) = &config.service_overrides {
            for (network, url) in table {
                let network = Network::from(network.clone());
                resolver
                    .overrides
                    .insert(network.as_str().to_string(), url.trim().to_string());
            }
        }
        resolver
    }

    pub fn resolve(&self, network: &Network) -> &str {
        self.overrides
            .get(network.as_str())
            .map(|url| url.as_str())
            .unwrap_or(self.default_url.as_str())
    }

    pub fn default_url(&self) -> &str {
        &self.default_url
    }
}

/// `HealthCheckGateway` over plain HTTP.
pub struct HttpGateway {
    client: reqwest::Client,
}

impl HttpGateway {
    pub fn new() -> Result<Self> {
        Self::with_timeouts(
            Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_timeouts(
            Duration::from_secs(
                config
                    .connect_timeout_seconds
                    .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
            ),
            Duration::from_secs(
                config
                    .request_timeout_seconds
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
        )
    }

    pub fn with_timeouts(connect: Duration, request: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect)
            .timeout(request)
            .build()
            .map_err(|e| NodeCheckerError::Runtime(e.to_string()))?;
        Ok(Self { client })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        service_url: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = endpoint_url(service_url, path, query)?;
        debug!(%url, "health checker request");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| NodeCheckerError::Http(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| NodeCheckerError::Http(e.to_string()))?;
        if !status.is_success() {
            return Err(NodeCheckerError::Api {
                status: status.as_u16(),
                body: text,
            });
        }
        serde_json::from_str(&text).map_err(|e| NodeCheckerError::Serialization(e.to_string()))
    }
}

#[async_trait]
impl HealthCheckGateway for HttpGateway {
    async fn list_configurations(&self, service_url: &str) -> Result<Vec<EvaluationConfiguration>> {
        let configurations: Vec<EvaluationConfiguration> =
            self.get_json(service_url, "configurations", &[]).await?;
        info!(
            service_url,
            count = configurations.len(),
            "fetched baseline configurations"
        );
        Ok(configurations)
    }

    async fn run_check(&self, service_url: &str, request: &CheckRequest) -> Result<CheckReport> {
        let report: CheckReport = self
            .get_json(service_url, "check", &request.query_pairs())
            .await?;
        info!(
            service_url,
            node_url = %request.node_url,
            summary_score = report.summary_score,
            "node check finished"
        );
        Ok(report)
    }
}

/// `{base}/{path}`, with the query form-encoded only when there is one.
fn endpoint_url(base_url: &str, path: &str, query: &[(&str, String)]) -> Result<Url> {
    let joined = format!(
        "{}/{}",
        base_url.trim().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    let parsed = if query.is_empty() {
        Url::parse(&joined)
    } else {
        Url::parse_with_params(&joined, query.iter().map(|(key, value)| (*key, value.as_str())))
    };
    parsed.map_err(|e| NodeCheckerError::Http(format!("invalid service url {joined}: {e}")))
}
