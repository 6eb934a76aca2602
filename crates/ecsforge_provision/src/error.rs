//! Error types for provisioning.

use ecsforge_spec::SpecError;
use thiserror::Error;

use crate::resource::ResourceKind;

/// Result type alias for backend calls.
pub type BackendResult<T> = Result<T, BackendError>;

/// Result type alias for provisioning runs.
pub type ProvisionResult<T> = Result<T, ProvisionError>;

/// Errors raised by a provisioning backend.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("{kind} {name} rejected: {message}")]
    Rejected {
        kind: ResourceKind,
        name: String,
        message: String,
    },

    #[error("Resource already registered: {0}")]
    DuplicateResource(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors that stop a provisioning run.
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error("Backend call failed for {resource}")]
    BackendCallFailed {
        resource: String,
        #[source]
        source: BackendError,
    },
}

impl ProvisionError {
    pub fn backend(resource: impl Into<String>, source: BackendError) -> Self {
        Self::BackendCallFailed {
            resource: resource.into(),
            source,
        }
    }

    /// Whether the run stopped on a missing configuration field.
    pub fn is_missing_field(&self) -> bool {
        matches!(self, ProvisionError::Spec(e) if e.is_missing_field())
    }

    /// Whether the run stopped on a rejected backend call.
    pub fn is_backend_failure(&self) -> bool {
        matches!(self, ProvisionError::BackendCallFailed { .. })
    }
}
