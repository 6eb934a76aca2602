//! Plan command - Generate the Pulumi program for a cluster.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use ecsforge_provision::{ClusterOutputs, ClusterProvisioner, ProgramBackend};
use ecsforge_spec::{ClusterLogging, StackConfig};

#[derive(Args)]
pub struct PlanArgs {
    /// Path to the stack file
    #[arg(short, long, env = "ECSFORGE_CONFIG", default_value = "ecsforge.yaml")]
    pub config: PathBuf,

    /// Where to write the program (stdout when omitted)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Override the cluster logging mode (container-insights, execute-command)
    #[arg(long, value_parser = parse_logging)]
    pub logging: Option<ClusterLogging>,
}

fn parse_logging(s: &str) -> Result<ClusterLogging, String> {
    ClusterLogging::from_str(s).ok_or_else(|| format!("unknown logging mode: {}", s))
}

pub async fn execute(args: PlanArgs) -> Result<()> {
    let config = super::load_stack(&args.config)?;
    let (backend, outputs) = build_program(config, args.logging).await?;

    match &args.out {
        Some(path) => {
            backend
                .write_to(path)
                .with_context(|| format!("failed to write program to {}", path.display()))?;
            println!("✅ Wrote {} resources to {}", backend.resource_count(), path.display());
            println!("   cluster: {}", outputs.cluster.logical_name);
            println!("   task execution role: {}", outputs.task_exec_role.logical_name);
        }
        None => print!("{}", backend.to_yaml()?),
    }

    Ok(())
}

/// Run the provisioner against a program backend for `config`.
pub async fn build_program(
    mut config: StackConfig,
    logging: Option<ClusterLogging>,
) -> Result<(Arc<ProgramBackend>, ClusterOutputs)> {
    if let Some(logging) = logging {
        config.cluster.logging = logging;
    }
    info!("Planning stack {}", config.project_name());

    let backend = Arc::new(
        ProgramBackend::new(config.project_name())
            .with_description(format!("ECS cluster {}", config.cluster.name)),
    );
    let mut provisioner = ClusterProvisioner::new(backend.clone());
    let outputs = provisioner.provision(&config.cluster).await?;

    Ok((backend, outputs))
}
