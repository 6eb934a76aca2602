//! Render command - Print container definitions for task definitions.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use ecsforge_spec::StackConfig;

#[derive(Args)]
pub struct RenderArgs {
    /// Path to the stack file
    #[arg(short, long, env = "ECSFORGE_CONFIG", default_value = "ecsforge.yaml")]
    pub config: PathBuf,

    /// Only render the named container
    #[arg(long)]
    pub container: Option<String>,
}

pub async fn execute(args: RenderArgs) -> Result<()> {
    let config = super::load_stack(&args.config)?;

    for line in render_containers(&config, args.container.as_deref())? {
        println!("{}", line);
    }

    Ok(())
}

/// One bracket-wrapped JSON line per selected container.
pub fn render_containers(config: &StackConfig, only: Option<&str>) -> Result<Vec<String>> {
    let selected: Vec<_> = config
        .containers
        .iter()
        .filter(|c| only.map_or(true, |name| c.name == name))
        .collect();

    if let Some(name) = only {
        if selected.is_empty() {
            anyhow::bail!("container not found: {}", name);
        }
    }

    let mut lines = Vec::with_capacity(selected.len());
    for container in selected {
        info!("Rendering container {}", container.name);
        lines.push(container.to_json_array()?);
    }
    Ok(lines)
}
