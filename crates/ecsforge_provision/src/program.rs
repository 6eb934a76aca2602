//! Pulumi YAML program backend.
//!
//! Instead of calling AWS, this backend writes every creation call into a
//! Pulumi YAML program. Handles carry `${name.property}` references, so the
//! engine wires resources together and resolves identifiers when the program
//! is applied with `pulumi up`.

use std::fs;
use std::path::Path;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use tracing::{debug, info};

use crate::backend::ProvisioningBackend;
use crate::error::{BackendError, BackendResult};
use crate::resource::{
    ClusterArgs, KeyArgs, LogGroupArgs, Output, ResourceHandle, ResourceKind, RoleArgs,
    RolePolicyAttachmentArgs,
};

#[derive(Default)]
struct ProgramState {
    resources: Mapping,
    outputs: Mapping,
}

/// Backend that builds a Pulumi YAML program.
pub struct ProgramBackend {
    name: String,
    description: Option<String>,
    state: RwLock<ProgramState>,
}

impl ProgramBackend {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            state: RwLock::new(ProgramState::default()),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn resource_count(&self) -> usize {
        self.state.read().resources.len()
    }

    /// Logical names in registration order.
    pub fn resource_names(&self) -> Vec<String> {
        self.state
            .read()
            .resources
            .keys()
            .filter_map(|k| k.as_str().map(str::to_string))
            .collect()
    }

    /// Build the program document.
    pub fn to_program(&self) -> Value {
        let state = self.state.read();

        let mut program = Mapping::new();
        program.insert("name".into(), self.name.as_str().into());
        program.insert("runtime".into(), "yaml".into());
        if let Some(description) = &self.description {
            program.insert("description".into(), description.as_str().into());
        }
        program.insert("resources".into(), Value::Mapping(state.resources.clone()));
        if !state.outputs.is_empty() {
            program.insert("outputs".into(), Value::Mapping(state.outputs.clone()));
        }

        Value::Mapping(program)
    }

    /// Render the program as YAML text.
    pub fn to_yaml(&self) -> BackendResult<String> {
        Ok(serde_yaml::to_string(&self.to_program())?)
    }

    /// Write the program to `path`, typically `Pulumi.yaml`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> BackendResult<()> {
        let path = path.as_ref();
        let content = self.to_yaml()?;
        fs::write(path, content)?;
        info!("Wrote Pulumi program to {:?}", path);
        Ok(())
    }

    fn register<A: Serialize>(
        &self,
        kind: ResourceKind,
        logical_name: &str,
        args: &A,
    ) -> BackendResult<ResourceHandle> {
        let properties = serde_yaml::to_value(args)?;

        let mut state = self.state.write();
        if state.resources.contains_key(logical_name) {
            return Err(BackendError::DuplicateResource(logical_name.to_string()));
        }

        let mut resource = Mapping::new();
        resource.insert("type".into(), kind.type_token().into());
        let has_properties = matches!(&properties, Value::Mapping(m) if !m.is_empty());
        if has_properties {
            resource.insert("properties".into(), properties);
        }
        state
            .resources
            .insert(logical_name.into(), Value::Mapping(resource));

        debug!("Registered {} {}", kind, logical_name);
        Ok(ResourceHandle::deferred(kind, logical_name))
    }
}

#[async_trait]
impl ProvisioningBackend for ProgramBackend {
    async fn create_key(&self, logical_name: &str, args: &KeyArgs) -> BackendResult<ResourceHandle> {
        self.register(ResourceKind::Key, logical_name, args)
    }

    async fn create_log_group(
        &self,
        logical_name: &str,
        args: &LogGroupArgs,
    ) -> BackendResult<ResourceHandle> {
        self.register(ResourceKind::LogGroup, logical_name, args)
    }

    async fn create_cluster(
        &self,
        logical_name: &str,
        args: &ClusterArgs,
    ) -> BackendResult<ResourceHandle> {
        self.register(ResourceKind::Cluster, logical_name, args)
    }

    async fn create_role(&self, logical_name: &str, args: &RoleArgs) -> BackendResult<ResourceHandle> {
        self.register(ResourceKind::Role, logical_name, args)
    }

    async fn attach_role_policy(
        &self,
        logical_name: &str,
        args: &RolePolicyAttachmentArgs,
    ) -> BackendResult<ResourceHandle> {
        self.register(ResourceKind::RolePolicyAttachment, logical_name, args)
    }

    fn export(&self, key: &str, value: &Output) {
        self.state
            .write()
            .outputs
            .insert(key.into(), value.as_str().into());
    }
}
