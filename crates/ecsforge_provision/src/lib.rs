//! # ecsforge_provision
//!
//! Turns an ECS cluster specification into an ordered series of resource
//! creation calls against a declarative provisioning engine.
//!
//! The engine is reached through the [`ProvisioningBackend`] trait, which is
//! passed explicitly into the [`ClusterProvisioner`]. Reconciliation, state
//! diffing and cleanup all remain the engine's job.
//!
//! # Backends
//!
//! - **Program**: emits a Pulumi YAML program for `pulumi up`
//! - **Mock**: records calls and exports for tests
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use ecsforge_provision::{ClusterProvisioner, ProgramBackend};
//! use ecsforge_spec::ClusterSpec;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = Arc::new(ProgramBackend::new("demo"));
//!     let mut provisioner = ClusterProvisioner::new(backend.clone());
//!
//!     let outputs = provisioner
//!         .provision(&ClusterSpec::new("demo").with_logging(true))
//!         .await?;
//!     println!("cluster: {}", outputs.cluster.arn);
//!
//!     backend.write_to("Pulumi.yaml")?;
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod error;
pub mod mock;
pub mod program;
pub mod provisioner;
pub mod resource;

pub use backend::ProvisioningBackend;
pub use error::{BackendError, BackendResult, ProvisionError, ProvisionResult};
pub use mock::{CapturedCall, MockBackend};
pub use program::ProgramBackend;
pub use provisioner::{ClusterOutputs, ClusterProvisioner};
pub use resource::{
    ClusterArgs, ClusterConfiguration, ClusterSetting, ExecuteCommandConfiguration,
    ExecuteCommandLogConfiguration, ExecuteCommandLogging, KeyArgs, LogGroupArgs, Output,
    ResourceHandle, ResourceKind, RoleArgs, RolePolicyAttachmentArgs,
};
