use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::domains::configuration::EvaluationConfiguration;
use crate::error::{NodeCheckerError, Result};
use crate::interfaces::gateway::HealthCheckGateway;

/// Configurations offered by the service for the current network, keyed by id.
#[derive(Debug, Default, Clone)]
pub struct ConfigurationRegistry {
    configurations: BTreeMap<String, Arc<EvaluationConfiguration>>,
}

impl ConfigurationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.configurations.clear();
    }

    /// Clears the registry, then fetches from `service_url` and replaces its contents.
    /// On failure the registry stays empty.
    pub async fn load(
        &mut self,
        gateway: &dyn HealthCheckGateway,
        service_url: &str,
    ) -> Result<()> {
        self.clear();
        let fetched = gateway.list_configurations(service_url).await;
        self.apply(service_url, fetched)
    }

    /// Applies the outcome of a fetch that was started after the last `clear`.
    pub fn apply(
        &mut self,
        service_url: &str,
        fetched: Result<Vec<EvaluationConfiguration>>,
    ) -> Result<()> {
        self.clear();
        match fetched {
            Ok(configurations) => {
                for configuration in configurations {
                    self.configurations
                        .insert(configuration.id.clone(), Arc::new(configuration));
                }
                info!(
                    service_url,
                    count = self.configurations.len(),
                    "configuration registry loaded"
                );
                Ok(())
            }
            Err(err) => {
                warn!(service_url, error = %err, "failed to load configurations");
                Err(NodeCheckerError::Http(format!(
                    "Failed to connect to Node Health Checker at {service_url}"
                )))
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<Arc<EvaluationConfiguration>> {
        self.configurations.get(id).cloned()
    }

    pub fn first_or_default(&self) -> Option<Arc<EvaluationConfiguration>> {
        self.configurations.values().next().cloned()
    }

    /// `preferred` when it names a loaded configuration, else the first by id.
    pub fn resolve_default(&self, preferred: Option<&str>) -> Option<Arc<EvaluationConfiguration>> {
        preferred
            .and_then(|id| self.get(id))
            .or_else(|| self.first_or_default())
    }

    /// Configurations sorted by id ascending.
    pub fn list(&self) -> impl Iterator<Item = &Arc<EvaluationConfiguration>> {
        self.configurations.values()
    }

    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }
}
