use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{NodeCheckerError, Result};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    pub default_service_url: Option<String>,
    pub service_overrides: Option<HashMap<String, String>>,
    pub connect_timeout_seconds: Option<u64>,
    pub request_timeout_seconds: Option<u64>,
    pub default_network: Option<String>,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| NodeCheckerError::Config(e.to_string()))?;
        let config: Config =
            serde_json::from_str(&content).map_err(|e| NodeCheckerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let urls = self
            .default_service_url
            .iter()
            .chain(self.service_overrides.iter().flat_map(|table| table.values()));
        for url in urls {
            let parsed = reqwest::Url::parse(url.trim())
                .map_err(|e| NodeCheckerError::Config(format!("invalid service url {url}: {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(NodeCheckerError::Config(format!(
                    "service url {url} must use http or https"
                )));
            }
        }
        Ok(())
    }
}
