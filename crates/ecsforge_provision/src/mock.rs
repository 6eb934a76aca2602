//! Mock provisioning backend for testing.
//!
//! Records every creation call and export so tests can check what a
//! provisioning run asked for, without a real engine behind it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::backend::ProvisioningBackend;
use crate::error::{BackendError, BackendResult};
use crate::resource::{
    ClusterArgs, KeyArgs, LogGroupArgs, Output, ResourceHandle, ResourceKind, RoleArgs,
    RolePolicyAttachmentArgs,
};

pub const MOCK_REGION: &str = "us-east-1";
pub const MOCK_ACCOUNT: &str = "123456789012";

/// Captured call information for verification.
#[derive(Debug, Clone)]
pub struct CapturedCall {
    pub method: String,
    pub logical_name: String,
    /// Arguments as the engine would receive them.
    pub args: Value,
}

/// Mock provisioning backend.
#[derive(Clone)]
pub struct MockBackend {
    captured_calls: Arc<RwLock<Vec<CapturedCall>>>,
    exports: Arc<RwLock<Vec<(String, Output)>>>,
    /// Methods that should fail, with the message to fail with.
    failures: Arc<RwLock<HashMap<String, String>>>,
    created: Arc<AtomicUsize>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            captured_calls: Arc::new(RwLock::new(Vec::new())),
            exports: Arc::new(RwLock::new(Vec::new())),
            failures: Arc::new(RwLock::new(HashMap::new())),
            created: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make every call to `method` fail with `message`.
    pub fn fail_on(self, method: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures.write().insert(method.into(), message.into());
        self
    }

    /// Clear all captured calls and exports.
    pub fn clear_calls(&self) {
        self.captured_calls.write().clear();
        self.exports.write().clear();
    }

    pub fn get_calls(&self) -> Vec<CapturedCall> {
        self.captured_calls.read().clone()
    }

    /// Number of calls made, including ones that failed.
    pub fn call_count(&self) -> usize {
        self.captured_calls.read().len()
    }

    /// Number of resources successfully created.
    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn was_called(&self, method: &str) -> bool {
        self.captured_calls
            .read()
            .iter()
            .any(|c| c.method == method)
    }

    pub fn get_method_calls(&self, method: &str) -> Vec<CapturedCall> {
        self.captured_calls
            .read()
            .iter()
            .filter(|c| c.method == method)
            .cloned()
            .collect()
    }

    /// Method names in call order.
    pub fn call_sequence(&self) -> Vec<String> {
        self.captured_calls
            .read()
            .iter()
            .map(|c| c.method.clone())
            .collect()
    }

    /// Exports in the order they were written.
    pub fn exports(&self) -> Vec<(String, Output)> {
        self.exports.read().clone()
    }

    pub fn export_keys(&self) -> Vec<String> {
        self.exports.read().iter().map(|(k, _)| k.clone()).collect()
    }

    fn record<A: Serialize>(
        &self,
        method: &str,
        kind: ResourceKind,
        logical_name: &str,
        args: &A,
    ) -> BackendResult<ResourceHandle> {
        self.captured_calls.write().push(CapturedCall {
            method: method.to_string(),
            logical_name: logical_name.to_string(),
            args: serde_json::to_value(args).unwrap_or(Value::Null),
        });

        if let Some(message) = self.failures.read().get(method).cloned() {
            return Err(BackendError::Rejected {
                kind,
                name: logical_name.to_string(),
                message,
            });
        }

        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Self::handle(kind, logical_name))
    }

    /// Identifiers shaped like the ones AWS hands back.
    fn handle(kind: ResourceKind, logical_name: &str) -> ResourceHandle {
        let (id, arn) = match kind {
            ResourceKind::Key => {
                let key_id = Uuid::new_v4().to_string();
                let arn = format!("arn:aws:kms:{}:{}:key/{}", MOCK_REGION, MOCK_ACCOUNT, key_id);
                (key_id, arn)
            }
            ResourceKind::LogGroup => (
                logical_name.to_string(),
                format!("arn:aws:logs:{}:{}:log-group:{}", MOCK_REGION, MOCK_ACCOUNT, logical_name),
            ),
            ResourceKind::Cluster => {
                let arn = format!("arn:aws:ecs:{}:{}:cluster/{}", MOCK_REGION, MOCK_ACCOUNT, logical_name);
                (arn.clone(), arn)
            }
            ResourceKind::Role => (
                logical_name.to_string(),
                format!("arn:aws:iam::{}:role/{}", MOCK_ACCOUNT, logical_name),
            ),
            ResourceKind::RolePolicyAttachment => (
                format!("{}-{}", logical_name, Uuid::new_v4().simple()),
                String::new(),
            ),
        };

        ResourceHandle {
            kind,
            logical_name: logical_name.to_string(),
            id: Output::new(id),
            arn: Output::new(arn),
            name: Output::new(logical_name),
        }
    }
}

#[async_trait]
impl ProvisioningBackend for MockBackend {
    async fn create_key(&self, logical_name: &str, args: &KeyArgs) -> BackendResult<ResourceHandle> {
        self.record("create_key", ResourceKind::Key, logical_name, args)
    }

    async fn create_log_group(
        &self,
        logical_name: &str,
        args: &LogGroupArgs,
    ) -> BackendResult<ResourceHandle> {
        self.record("create_log_group", ResourceKind::LogGroup, logical_name, args)
    }

    async fn create_cluster(
        &self,
        logical_name: &str,
        args: &ClusterArgs,
    ) -> BackendResult<ResourceHandle> {
        self.record("create_cluster", ResourceKind::Cluster, logical_name, args)
    }

    async fn create_role(&self, logical_name: &str, args: &RoleArgs) -> BackendResult<ResourceHandle> {
        self.record("create_role", ResourceKind::Role, logical_name, args)
    }

    async fn attach_role_policy(
        &self,
        logical_name: &str,
        args: &RolePolicyAttachmentArgs,
    ) -> BackendResult<ResourceHandle> {
        self.record(
            "attach_role_policy",
            ResourceKind::RolePolicyAttachment,
            logical_name,
            args,
        )
    }

    fn export(&self, key: &str, value: &Output) {
        self.exports.write().push((key.to_string(), value.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_backend_captures_calls() {
        let backend = MockBackend::new();

        let key = backend
            .create_key("demo-log-key", &KeyArgs::new("demo key"))
            .await
            .unwrap();

        assert!(key.arn.as_str().starts_with("arn:aws:kms:us-east-1:123456789012:key/"));
        assert!(key.arn.as_str().ends_with(key.id.as_str()));

        let calls = backend.get_method_calls("create_key");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].logical_name, "demo-log-key");
        assert_eq!(calls[0].args["description"], "demo key");
    }

    #[tokio::test]
    async fn test_mock_backend_failure_simulation() {
        let backend = MockBackend::new().fail_on("create_log_group", "throttled");

        let err = backend
            .create_log_group("demo-log-group", &LogGroupArgs::default())
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::Rejected { ref message, .. } if message == "throttled"));
        assert_eq!(backend.call_count(), 1);
        assert_eq!(backend.created_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_backend_records_exports() {
        let backend = MockBackend::new();
        backend.export("A", &Output::new("1"));
        backend.export("B", &Output::new("2"));

        assert_eq!(backend.export_keys(), vec!["A".to_string(), "B".to_string()]);

        backend.clear_calls();
        assert!(backend.exports().is_empty());
    }
}
