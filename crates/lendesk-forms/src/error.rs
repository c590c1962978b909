// File: src/error.rs
// Purpose: Errors raised by form state and submission

use thiserror::Error;

use crate::gateway::GatewayError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error("field `{0}` is read-only")]
    ReadOnly(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    /// The API refused the submission; `message` is what the user should see
    #[error("{message}")]
    Rejected {
        message: String,
        #[source]
        source: GatewayError,
    },
}

impl SubmitError {
    pub fn user_message(&self) -> &str {
        match self {
            SubmitError::Rejected { message, .. } => message,
        }
    }
}
