use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid endpoint url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("transport failure: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("server responded with status {status}{}", status_detail(.message))]
    Status { status: u16, message: Option<String> },
    #[error("malformed response body: {0}")]
    Decode(String),
}

fn status_detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl GatewayError {
    /// Backend-provided message, when the failing response carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            GatewayError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            GatewayError::Decode(value.to_string())
        } else if let Some(status) = value.status() {
            GatewayError::Status {
                status: status.as_u16(),
                message: None,
            }
        } else {
            GatewayError::Transport(value)
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(value: serde_json::Error) -> Self {
        GatewayError::Decode(value.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ScreenError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("screen was unmounted before the request completed")]
    Cancelled,
}

impl ScreenError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ScreenError::Validation(_))
    }
}
