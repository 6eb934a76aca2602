//! Cluster provisioning run.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use ecsforge_spec::{ClusterLogging, ClusterSpec};

use crate::backend::ProvisioningBackend;
use crate::error::{ProvisionError, ProvisionResult};
use crate::resource::{
    ClusterArgs, KeyArgs, LogGroupArgs, ResourceHandle, RoleArgs, RolePolicyAttachmentArgs,
    EXPORT_CLUSTER_ID, EXPORT_LOG_GROUP_ID, EXPORT_LOG_KEY_ID,
};

/// Handles produced by a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterOutputs {
    pub cluster: ResourceHandle,
    pub task_exec_role: ResourceHandle,
}

/// Creates an ECS cluster and its task execution role.
///
/// Steps run strictly in order and the first failure ends the run. Nothing
/// already created is rolled back; the engine reconciles leftovers on its
/// next apply.
pub struct ClusterProvisioner {
    backend: Arc<dyn ProvisioningBackend>,
    cluster: Option<ResourceHandle>,
    task_exec_role: Option<ResourceHandle>,
}

impl ClusterProvisioner {
    pub fn new(backend: Arc<dyn ProvisioningBackend>) -> Self {
        Self {
            backend,
            cluster: None,
            task_exec_role: None,
        }
    }

    /// Cluster created by the last run, if it got that far.
    pub fn cluster(&self) -> Option<&ResourceHandle> {
        self.cluster.as_ref()
    }

    /// Task execution role created by the last run, if it got that far.
    pub fn task_exec_role(&self) -> Option<&ResourceHandle> {
        self.task_exec_role.as_ref()
    }

    pub async fn provision(&mut self, spec: &ClusterSpec) -> ProvisionResult<ClusterOutputs> {
        self.cluster = None;
        self.task_exec_role = None;
        spec.validate()?;
        info!("Provisioning ECS cluster {} ({})", spec.name, spec.logging);

        let cluster_args = match spec.logging {
            ClusterLogging::ExecuteCommand => self.execute_command_logging(spec).await?,
            ClusterLogging::ContainerInsights => ClusterArgs::container_insights(),
        };

        let cluster = self
            .backend
            .create_cluster(&spec.name, &cluster_args)
            .await
            .map_err(|e| ProvisionError::backend(&spec.name, e))?;
        self.cluster = Some(cluster.clone());
        self.backend.export(EXPORT_CLUSTER_ID, &cluster.id);
        debug!("Created cluster {}", cluster.id);

        let role_name = spec.task_exec_role_name();
        let role = self
            .backend
            .create_role(&role_name, &RoleArgs::ecs_task_execution())
            .await
            .map_err(|e| ProvisionError::backend(&role_name, e))?;
        self.task_exec_role = Some(role.clone());
        debug!("Created task execution role {}", role.name);

        let policy_name = spec.task_exec_policy_name();
        self.backend
            .attach_role_policy(
                &policy_name,
                &RolePolicyAttachmentArgs::task_execution(role.name.clone()),
            )
            .await
            .map_err(|e| ProvisionError::backend(&policy_name, e))?;

        info!("Provisioned ECS cluster {}", spec.name);
        Ok(ClusterOutputs {
            cluster,
            task_exec_role: role,
        })
    }

    /// Create the key and log group that execute-command sessions write to.
    async fn execute_command_logging(&self, spec: &ClusterSpec) -> ProvisionResult<ClusterArgs> {
        let key_name = spec.log_key_name();
        let key = self
            .backend
            .create_key(&key_name, &KeyArgs::new(spec.log_key_description()))
            .await
            .map_err(|e| ProvisionError::backend(&key_name, e))?;
        self.backend.export(EXPORT_LOG_KEY_ID, &key.id);

        let group_name = spec.log_group_name();
        let log_group = self
            .backend
            .create_log_group(&group_name, &LogGroupArgs::default())
            .await
            .map_err(|e| ProvisionError::backend(&group_name, e))?;
        self.backend.export(EXPORT_LOG_GROUP_ID, &log_group.id);

        Ok(ClusterArgs::execute_command_logging(key.arn, log_group.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBackend;
    use crate::program::ProgramBackend;

    #[tokio::test]
    async fn test_outputs_retained() {
        let backend = Arc::new(MockBackend::new());
        let mut provisioner = ClusterProvisioner::new(backend.clone());

        let outputs = provisioner.provision(&ClusterSpec::new("demo")).await.unwrap();

        assert_eq!(provisioner.cluster(), Some(&outputs.cluster));
        assert_eq!(provisioner.task_exec_role(), Some(&outputs.task_exec_role));
        assert_eq!(outputs.cluster.logical_name, "demo");
        assert_eq!(outputs.task_exec_role.logical_name, "demo-task-exec-role");
    }

    #[tokio::test]
    async fn test_cluster_retained_when_role_fails() {
        let backend = Arc::new(MockBackend::new().fail_on("create_role", "access denied"));
        let mut provisioner = ClusterProvisioner::new(backend.clone());

        let err = provisioner.provision(&ClusterSpec::new("demo")).await.unwrap_err();

        assert!(err.is_backend_failure());
        assert!(provisioner.cluster().is_some());
        assert!(provisioner.task_exec_role().is_none());
    }

    #[tokio::test]
    async fn test_failed_rerun_clears_previous_handles() {
        let backend = Arc::new(ProgramBackend::new("demo"));
        let mut provisioner = ClusterProvisioner::new(backend.clone());
        provisioner.provision(&ClusterSpec::new("demo")).await.unwrap();
        assert!(provisioner.cluster().is_some());

        let err = provisioner.provision(&ClusterSpec::new("demo")).await.unwrap_err();

        assert!(err.is_backend_failure());
        assert!(provisioner.cluster().is_none());
        assert!(provisioner.task_exec_role().is_none());
    }

    #[tokio::test]
    async fn test_invalid_rerun_clears_previous_handles() {
        let backend = Arc::new(MockBackend::new());
        let mut provisioner = ClusterProvisioner::new(backend.clone());
        provisioner.provision(&ClusterSpec::new("demo")).await.unwrap();

        let err = provisioner.provision(&ClusterSpec::new("")).await.unwrap_err();

        assert!(err.is_missing_field());
        assert!(provisioner.cluster().is_none());
        assert!(provisioner.task_exec_role().is_none());
    }
}
