use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeCheckerError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("runtime error: {0}")]
    Runtime(String),
    #[error("api error: status {status}")]
    Api { status: u16, body: String },
}

impl NodeCheckerError {
    /// Human-readable detail supplied by the remote service, if any.
    ///
    /// Structured bodies of the form `{"statusCode": .., "message": ..}` yield the
    /// message; any other non-empty body is returned as-is.
    pub fn remote_detail(&self) -> Option<String> {
        let NodeCheckerError::Api { body, .. } = self else {
            return None;
        };
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return None;
        }
        let message = serde_json::from_str::<serde_json::Value>(trimmed)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string())
            });
        Some(message.unwrap_or_else(|| trimmed.to_string()))
    }
}

pub type Result<T> = std::result::Result<T, NodeCheckerError>;
