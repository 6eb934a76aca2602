//! Stack configuration files.
//!
//! A stack file is YAML describing one cluster and the containers that run
//! on it:
//!
//! ```yaml
//! project: payments
//! cluster:
//!   name: payments
//!   logging: execute_command
//! containers:
//!   - name: api
//!     image: ghcr.io/acme/payments:1.4.2
//!     portMappings:
//!       - containerPort: 8080
//!         hostPort: 8080
//!         protocol: tcp
//!     logConfiguration:
//!       logDriver: awslogs
//!       options:
//!         awslogs-group: /ecs/payments
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cluster::ClusterSpec;
use crate::container::ContainerDefinition;
use crate::error::{SpecError, SpecResult};

/// Everything needed to provision one ECS stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackConfig {
    /// Project name used for the generated program. Defaults to the cluster
    /// name.
    #[serde(default)]
    pub project: Option<String>,
    pub cluster: ClusterSpec,
    #[serde(default)]
    pub containers: Vec<ContainerDefinition>,
}

impl StackConfig {
    pub fn new(cluster: ClusterSpec) -> Self {
        Self {
            project: None,
            cluster,
            containers: Vec::new(),
        }
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn with_container(mut self, container: ContainerDefinition) -> Self {
        self.containers.push(container);
        self
    }

    pub fn project_name(&self) -> &str {
        self.project.as_deref().unwrap_or(&self.cluster.name)
    }

    /// Validate the cluster and every container, returning the normalized
    /// configuration. Stops at the first failure.
    pub fn validate(self) -> SpecResult<Self> {
        self.cluster.validate()?;

        let containers = self
            .containers
            .into_iter()
            .map(ContainerDefinition::validate)
            .collect::<SpecResult<Vec<_>>>()?;

        Ok(Self {
            project: self.project,
            cluster: self.cluster,
            containers,
        })
    }
}

/// Reader for stack configuration files.
pub struct ConfigReader;

impl ConfigReader {
    /// Read a stack configuration from a YAML file.
    pub fn read_file(path: impl AsRef<Path>) -> SpecResult<StackConfig> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SpecError::NotFound(path.to_path_buf()));
        }
        debug!("Reading stack config from {:?}", path);

        let content = fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a stack configuration from YAML text.
    pub fn from_str(content: &str) -> SpecResult<StackConfig> {
        let config: StackConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }
}
