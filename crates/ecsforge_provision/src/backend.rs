//! Provisioning backend trait.

use async_trait::async_trait;

use crate::error::BackendResult;
use crate::resource::{
    ClusterArgs, KeyArgs, LogGroupArgs, Output, ResourceHandle, RoleArgs,
    RolePolicyAttachmentArgs,
};

/// Connection to the engine that owns the real resources.
///
/// Each create call registers one resource under `logical_name` and returns
/// a handle whose identifiers may be resolved later by the engine.
#[async_trait]
pub trait ProvisioningBackend: Send + Sync {
    /// Create a KMS key.
    async fn create_key(&self, logical_name: &str, args: &KeyArgs) -> BackendResult<ResourceHandle>;

    /// Create a CloudWatch log group.
    async fn create_log_group(
        &self,
        logical_name: &str,
        args: &LogGroupArgs,
    ) -> BackendResult<ResourceHandle>;

    /// Create an ECS cluster.
    async fn create_cluster(
        &self,
        logical_name: &str,
        args: &ClusterArgs,
    ) -> BackendResult<ResourceHandle>;

    /// Create an IAM role.
    async fn create_role(&self, logical_name: &str, args: &RoleArgs) -> BackendResult<ResourceHandle>;

    /// Attach a managed policy to a role.
    async fn attach_role_policy(
        &self,
        logical_name: &str,
        args: &RolePolicyAttachmentArgs,
    ) -> BackendResult<ResourceHandle>;

    /// Publish a named stack output.
    fn export(&self, key: &str, value: &Output);
}
