//! ECS cluster specification.

use serde::{Deserialize, Serialize};

use crate::error::{SpecError, SpecResult};

/// How a cluster records container activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterLogging {
    /// Container Insights monitoring only.
    #[default]
    ContainerInsights,
    /// `ecs execute-command` sessions logged to a KMS-encrypted CloudWatch
    /// log group.
    ExecuteCommand,
}

impl ClusterLogging {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterLogging::ContainerInsights => "container_insights",
            ClusterLogging::ExecuteCommand => "execute_command",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "container_insights" => Some(ClusterLogging::ContainerInsights),
            "execute_command" => Some(ClusterLogging::ExecuteCommand),
            _ => None,
        }
    }
}

impl std::fmt::Display for ClusterLogging {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Desired state of an ECS cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSpec {
    pub name: String,
    #[serde(default)]
    pub logging: ClusterLogging,
}

impl ClusterSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            logging: ClusterLogging::default(),
        }
    }

    /// Map the on/off logging switch onto [`ClusterLogging`].
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.logging = if enabled {
            ClusterLogging::ExecuteCommand
        } else {
            ClusterLogging::ContainerInsights
        };
        self
    }

    pub fn with_logging_mode(mut self, logging: ClusterLogging) -> Self {
        self.logging = logging;
        self
    }

    pub fn validate(&self) -> SpecResult<()> {
        if self.name.is_empty() {
            return Err(SpecError::missing("ECS.Name"));
        }
        Ok(())
    }

    pub fn log_key_name(&self) -> String {
        format!("{}-log-key", self.name)
    }

    pub fn log_key_description(&self) -> String {
        format!("{} KMS encryption key for logging container activity", self.name)
    }

    pub fn log_group_name(&self) -> String {
        format!("{}-log-group", self.name)
    }

    pub fn task_exec_role_name(&self) -> String {
        format!("{}-task-exec-role", self.name)
    }

    pub fn task_exec_policy_name(&self) -> String {
        format!("{}-task-exec-policy", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_name() {
        let err = ClusterSpec::new("").validate().unwrap_err();
        assert!(err.is_missing_field());
        assert_eq!(err.to_string(), "missing ECS.Name");

        assert!(ClusterSpec::new("demo").validate().is_ok());
    }

    #[test]
    fn test_with_logging_maps_flag() {
        assert_eq!(ClusterSpec::new("demo").logging, ClusterLogging::ContainerInsights);
        assert_eq!(
            ClusterSpec::new("demo").with_logging(true).logging,
            ClusterLogging::ExecuteCommand
        );
        assert_eq!(
            ClusterSpec::new("demo").with_logging(false).logging,
            ClusterLogging::ContainerInsights
        );
    }

    #[test]
    fn test_derived_names() {
        let spec = ClusterSpec::new("demo");
        assert_eq!(spec.log_key_name(), "demo-log-key");
        assert_eq!(spec.log_group_name(), "demo-log-group");
        assert_eq!(spec.task_exec_role_name(), "demo-task-exec-role");
        assert_eq!(spec.task_exec_policy_name(), "demo-task-exec-policy");
        assert_eq!(
            spec.log_key_description(),
            "demo KMS encryption key for logging container activity"
        );
    }

    #[test]
    fn test_logging_from_str() {
        assert_eq!(ClusterLogging::from_str("execute-command"), Some(ClusterLogging::ExecuteCommand));
        assert_eq!(ClusterLogging::from_str("Container_Insights"), Some(ClusterLogging::ContainerInsights));
        assert_eq!(ClusterLogging::from_str("verbose"), None);
    }
}
