use async_trait::async_trait;

use crate::domains::configuration::EvaluationConfiguration;
use crate::domains::inputs::CheckRequest;
use crate::domains::report::CheckReport;
use crate::error::Result;

/// Remote node health-check service.
#[async_trait]
pub trait HealthCheckGateway: Send + Sync {
    async fn list_configurations(&self, service_url: &str) -> Result<Vec<EvaluationConfiguration>>;

    /// Issues exactly one check request; implementations must not retry.
    async fn run_check(&self, service_url: &str, request: &CheckRequest) -> Result<CheckReport>;
}
