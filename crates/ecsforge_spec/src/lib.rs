//! # ecsforge_spec
//!
//! Declarative configuration models for ECS workloads.
//!
//! This crate describes what an operator wants deployed: container
//! definitions (image, ports, environment, logging, capabilities) and
//! clusters (with optional KMS-encrypted command logging). It validates and
//! normalizes those descriptions before they are handed to a provisioning
//! backend.
//!
//! ## Example
//!
//! ```rust
//! use ecsforge_spec::{ContainerDefinition, LogConfiguration};
//!
//! let container = ContainerDefinition::new("web", "nginx:1.25")
//!     .port(80, 80, "tcp")
//!     .env("MODE", "production")
//!     .log_configuration(LogConfiguration::new("awslogs"))
//!     .validate()
//!     .unwrap();
//!
//! // Task definitions expect a JSON list of containers.
//! assert!(container.to_string().starts_with("[{"));
//! ```

pub mod cluster;
pub mod config;
pub mod container;
pub mod error;

pub use cluster::{ClusterLogging, ClusterSpec};
pub use config::{ConfigReader, StackConfig};
pub use container::{
    Capabilities, ContainerDefinition, EnvVar, LinuxParameters, LogConfiguration, PortMapping,
};
pub use error::{SpecError, SpecResult};
