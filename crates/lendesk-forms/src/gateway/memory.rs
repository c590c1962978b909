//! In-memory gateway
//!
//! Records every request and answers with the payload plus an assigned id.
//! Deletes answer `null`. A failure can be queued for the next call to
//! exercise error paths.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::gateway::{Gateway, GatewayError, SubmitAction, SubmitRequest};

#[derive(Clone)]
pub struct MemoryGateway {
    requests: Arc<RwLock<Vec<SubmitRequest>>>,
    next_failure: Arc<RwLock<Option<GatewayError>>>,
    next_id: Arc<AtomicU64>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(RwLock::new(Vec::new())),
            next_failure: Arc::new(RwLock::new(None)),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Every request received so far, oldest first
    pub async fn requests(&self) -> Vec<SubmitRequest> {
        self.requests.read().await.clone()
    }

    /// Makes the next call fail with `status` and `body`
    pub async fn reject_next(&self, status: u16, body: Value) {
        *self.next_failure.write().await = Some(GatewayError::Rejected { status, body });
    }

    /// Makes the next call fail as if the network were down
    pub async fn disconnect_next(&self, reason: &str) {
        *self.next_failure.write().await = Some(GatewayError::Transport(reason.to_string()));
    }
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn submit(&self, request: SubmitRequest) -> Result<Value, GatewayError> {
        self.requests.write().await.push(request.clone());

        if let Some(failure) = self.next_failure.write().await.take() {
            return Err(failure);
        }

        let id = match request.action {
            SubmitAction::Create => self.next_id.fetch_add(1, Ordering::SeqCst),
            SubmitAction::Update(id) | SubmitAction::Toggle(id) => id,
            SubmitAction::Delete(_) => return Ok(Value::Null),
        };

        let mut record = request.payload;
        record.insert("id".to_string(), Value::from(id));
        Ok(Value::Object(record))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EntityKind;
    use serde_json::{json, Map};

    #[tokio::test]
    async fn test_create_assigns_ids() {
        let gateway = MemoryGateway::new();
        let first = gateway
            .submit(SubmitRequest::create(EntityKind::Client, Map::new()))
            .await
            .unwrap();
        let second = gateway
            .submit(SubmitRequest::create(EntityKind::Client, Map::new()))
            .await
            .unwrap();

        assert_eq!(first["id"], json!(1));
        assert_eq!(second["id"], json!(2));
        assert_eq!(gateway.requests().await.len(), 2);
    }

    #[tokio::test]
    async fn test_update_keeps_id() {
        let gateway = MemoryGateway::new();
        let updated = gateway
            .submit(SubmitRequest::update(EntityKind::Employee, 9, Map::new()))
            .await
            .unwrap();
        assert_eq!(updated["id"], json!(9));
    }

    #[tokio::test]
    async fn test_toggle_and_delete() {
        let gateway = MemoryGateway::new();
        let toggled = gateway
            .submit(SubmitRequest::toggle(EntityKind::Client, 4))
            .await
            .unwrap();
        assert_eq!(toggled, json!({ "id": 4 }));

        let deleted = gateway
            .submit(SubmitRequest::delete(EntityKind::LoanRequest, 12))
            .await
            .unwrap();
        assert_eq!(deleted, Value::Null);

        let actions: Vec<_> = gateway.requests().await.iter().map(|r| r.action).collect();
        assert_eq!(actions, vec![SubmitAction::Toggle(4), SubmitAction::Delete(12)]);
    }

    #[tokio::test]
    async fn test_failure_is_one_shot() {
        let gateway = MemoryGateway::new();
        gateway.reject_next(400, json!({ "error": "duplicado" })).await;

        let request = SubmitRequest::create(EntityKind::Client, Map::new());
        assert!(gateway.submit(request.clone()).await.is_err());
        assert!(gateway.submit(request).await.is_ok());
    }
}
