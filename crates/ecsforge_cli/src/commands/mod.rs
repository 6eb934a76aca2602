//! CLI command definitions.

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use ecsforge_spec::{ConfigReader, StackConfig};

pub mod plan;
pub mod render;
pub mod validate;

/// ecsforge - declarative ECS cluster and container provisioning
#[derive(Parser)]
#[command(name = "ecsforge")]
#[command(version, about = "ecsforge - declarative ECS cluster and container provisioning")]
#[command(long_about = r#"
ecsforge reads a stack file describing an ECS cluster and its containers,
validates it, and turns it into a Pulumi YAML program for `pulumi up`.

COMMANDS:
  validate  → Check a stack file for missing fields
  render    → Print container definitions as task-definition JSON
  plan      → Generate the Pulumi program for the cluster

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Validation failure
  5 - Provisioning error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a stack file
    Validate(validate::ValidateArgs),

    /// Render container definitions as JSON
    Render(render::RenderArgs),

    /// Generate a Pulumi YAML program for the cluster
    Plan(plan::PlanArgs),
}

/// Load and validate the stack file at `path`.
pub fn load_stack(path: &Path) -> Result<StackConfig> {
    let config = ConfigReader::read_file(path)
        .with_context(|| format!("failed to read stack file {}", path.display()))?;
    let config = config
        .validate()
        .with_context(|| format!("validation failed for {}", path.display()))?;
    Ok(config)
}
