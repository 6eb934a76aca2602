//! Resource arguments and handles exchanged with a backend.
//!
//! Argument structs serialize to the property names the engine's AWS
//! provider uses, so a backend can forward them without translation.

use serde::{Deserialize, Serialize};

/// Trust policy letting ECS tasks assume the execution role.
pub const TASK_EXEC_TRUST_POLICY: &str = r#"{
    "Version": "2008-10-17",
    "Statement": [{
        "Sid": "",
        "Effect": "Allow",
        "Principal": {
            "Service": "ecs-tasks.amazonaws.com"
        },
        "Action": "sts:AssumeRole"
    }]
}"#;

/// AWS-managed policy granted to task execution roles.
pub const TASK_EXEC_POLICY_ARN: &str =
    "arn:aws:iam::aws:policy/service-role/AmazonECSTaskExecutionRolePolicy";

/// Waiting period before a scheduled key deletion takes effect.
pub const LOG_KEY_DELETION_WINDOW_DAYS: u32 = 7;

pub const EXPORT_LOG_KEY_ID: &str = "CLUSTER-LOG-KMS-KEY-ID";
pub const EXPORT_LOG_GROUP_ID: &str = "CLUSTER-LOG-GROUP-ID";
pub const EXPORT_CLUSTER_ID: &str = "CLUSTER-ID";

/// Kinds of resource the provisioner creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Key,
    LogGroup,
    Cluster,
    Role,
    RolePolicyAttachment,
}

impl ResourceKind {
    /// Engine type token, e.g. `aws:kms:Key`.
    pub fn type_token(&self) -> &'static str {
        match self {
            ResourceKind::Key => "aws:kms:Key",
            ResourceKind::LogGroup => "aws:cloudwatch:LogGroup",
            ResourceKind::Cluster => "aws:ecs:Cluster",
            ResourceKind::Role => "aws:iam:Role",
            ResourceKind::RolePolicyAttachment => "aws:iam:RolePolicyAttachment",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.type_token())
    }
}

/// A value produced by the backend.
///
/// Either a literal the backend already knows, or a deferred reference such
/// as `${demo.arn}` that the engine resolves when it applies the program.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Output(String);

impl Output {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn reference(logical_name: &str, property: &str) -> Self {
        Self(format!("${{{}.{}}}", logical_name, property))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_reference(&self) -> bool {
        self.0.starts_with("${") && self.0.ends_with('}')
    }
}

impl std::fmt::Display for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle to a created resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceHandle {
    pub kind: ResourceKind,
    pub logical_name: String,
    pub id: Output,
    pub arn: Output,
    pub name: Output,
}

impl ResourceHandle {
    /// Handle whose identifiers are all engine references.
    pub fn deferred(kind: ResourceKind, logical_name: impl Into<String>) -> Self {
        let logical_name = logical_name.into();
        Self {
            kind,
            id: Output::reference(&logical_name, "id"),
            arn: Output::reference(&logical_name, "arn"),
            name: Output::reference(&logical_name, "name"),
            logical_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyArgs {
    pub description: String,
    pub deletion_window_in_days: u32,
}

impl KeyArgs {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            deletion_window_in_days: LOG_KEY_DELETION_WINDOW_DAYS,
        }
    }
}

/// Log group arguments. The engine picks every default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogGroupArgs {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterArgs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<ClusterConfiguration>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub settings: Vec<ClusterSetting>,
}

impl ClusterArgs {
    /// Cluster with Container Insights monitoring switched on.
    pub fn container_insights() -> Self {
        Self {
            configuration: None,
            settings: vec![ClusterSetting::new("containerInsights", "enabled")],
        }
    }

    /// Cluster whose execute-command sessions are logged to `log_group_name`
    /// and encrypted with `kms_key_arn`.
    pub fn execute_command_logging(kms_key_arn: Output, log_group_name: Output) -> Self {
        Self {
            configuration: Some(ClusterConfiguration {
                execute_command_configuration: ExecuteCommandConfiguration {
                    kms_key_id: kms_key_arn,
                    logging: ExecuteCommandLogging::Override,
                    log_configuration: ExecuteCommandLogConfiguration {
                        cloud_watch_encryption_enabled: true,
                        cloud_watch_log_group_name: log_group_name,
                    },
                },
            }),
            settings: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfiguration {
    pub execute_command_configuration: ExecuteCommandConfiguration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteCommandConfiguration {
    pub kms_key_id: Output,
    pub logging: ExecuteCommandLogging,
    pub log_configuration: ExecuteCommandLogConfiguration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecuteCommandLogging {
    None,
    Default,
    Override,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteCommandLogConfiguration {
    pub cloud_watch_encryption_enabled: bool,
    pub cloud_watch_log_group_name: Output,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSetting {
    pub name: String,
    pub value: String,
}

impl ClusterSetting {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleArgs {
    pub assume_role_policy: String,
}

impl RoleArgs {
    /// Role assumable by the ECS task service.
    pub fn ecs_task_execution() -> Self {
        Self {
            assume_role_policy: TASK_EXEC_TRUST_POLICY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePolicyAttachmentArgs {
    pub role: Output,
    pub policy_arn: String,
}

impl RolePolicyAttachmentArgs {
    pub fn task_execution(role: Output) -> Self {
        Self {
            role,
            policy_arn: TASK_EXEC_POLICY_ARN.to_string(),
        }
    }
}
