//! Outbound boundary to the remote API
//!
//! Forms never talk HTTP directly; they hand a [`SubmitRequest`] to a
//! [`Gateway`]. The REST implementation lives in the `lendesk-client` crate,
//! [`MemoryGateway`] serves tests and offline use.

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::schema::EntityKind;
use crate::submission::ServerError;

pub mod memory;

pub use memory::MemoryGateway;

/// What the request does to the remote record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitAction {
    Create,
    Update(u64),
    /// Flips the record's `activo` flag
    Toggle(u64),
    Delete(u64),
}

/// One write against the API
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitRequest {
    pub entity: EntityKind,
    pub action: SubmitAction,
    pub payload: Map<String, Value>,
}

impl SubmitRequest {
    pub fn create(entity: EntityKind, payload: Map<String, Value>) -> Self {
        Self {
            entity,
            action: SubmitAction::Create,
            payload,
        }
    }

    pub fn update(entity: EntityKind, id: u64, payload: Map<String, Value>) -> Self {
        Self {
            entity,
            action: SubmitAction::Update(id),
            payload,
        }
    }

    pub fn toggle(entity: EntityKind, id: u64) -> Self {
        Self {
            entity,
            action: SubmitAction::Toggle(id),
            payload: Map::new(),
        }
    }

    pub fn delete(entity: EntityKind, id: u64) -> Self {
        Self {
            entity,
            action: SubmitAction::Delete(id),
            payload: Map::new(),
        }
    }

    /// REST path relative to the API base
    pub fn path(&self) -> String {
        let resource = self.entity.resource();
        match self.action {
            SubmitAction::Create => format!("/{}/", resource),
            SubmitAction::Update(id) | SubmitAction::Delete(id) => {
                format!("/{}/{}/", resource, id)
            }
            SubmitAction::Toggle(id) => format!("/{}/{}/toggle/", resource, id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    /// The API answered with a non-success status
    #[error("API rejected the request with status {status}")]
    Rejected { status: u16, body: Value },

    /// The request never got an answer
    #[error("transport error: {0}")]
    Transport(String),
}

impl GatewayError {
    /// Message suitable for a notification
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Rejected { body, .. } => ServerError::from_body(body).user_message(),
            GatewayError::Transport(_) => {
                "No se pudo conectar con el servidor, intenta más tarde.".to_string()
            }
        }
    }
}

/// Trait for API backends that accept form submissions
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Sends one write and returns the created/updated record
    async fn submit(&self, request: SubmitRequest) -> Result<Value, GatewayError>;

    /// Get gateway backend name
    fn name(&self) -> &'static str;
}
