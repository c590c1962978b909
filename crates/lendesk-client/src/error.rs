use lendesk_forms::GatewayError;
use thiserror::Error;

/// Error type for HTTP gateway operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// The API answered with a non-success status
    #[error("API error {status}: {body}")]
    Api {
        status: u16,
        body: serde_json::Value,
    },

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true if the token was missing or refused
    pub fn is_authentication_error(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}

impl From<ClientError> for GatewayError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api { status, body } => GatewayError::Rejected { status, body },
            other => GatewayError::Transport(other.to_string()),
        }
    }
}
