//! Validate command - Check a stack file.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

#[derive(Args)]
pub struct ValidateArgs {
    /// Path to the stack file
    #[arg(short, long, env = "ECSFORGE_CONFIG", default_value = "ecsforge.yaml")]
    pub config: PathBuf,
}

pub async fn execute(args: ValidateArgs) -> Result<()> {
    info!("Validating stack file {:?}", args.config);

    let config = super::load_stack(&args.config)?;

    println!("Cluster {} ({})", config.cluster.name, config.cluster.logging);
    for container in &config.containers {
        println!("   ✅ container {} ({})", container.name, container.image);
    }
    println!("✅ Stack file is valid");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::write_stack;
    use crate::{categorize_error, ExitCodes};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_validate_accepts_valid_stack() {
        let dir = tempdir().unwrap();
        let path = write_stack(
            dir.path(),
            "cluster:\n  name: demo\ncontainers:\n  - name: web\n    image: nginx\n    logConfiguration:\n      logDriver: awslogs\n",
        );

        execute(ValidateArgs { config: path }).await.unwrap();
    }

    #[tokio::test]
    async fn test_validate_missing_image() {
        let dir = tempdir().unwrap();
        let path = write_stack(
            dir.path(),
            "cluster:\n  name: demo\ncontainers:\n  - name: web\n    image: \"\"\n",
        );

        let err = execute(ValidateArgs { config: path }).await.unwrap_err();

        assert!(format!("{:#}", err).contains("missing ContainerDefinition.Image"));
        assert_eq!(categorize_error(&err), ExitCodes::VALIDATION_FAILURE);
    }

    #[tokio::test]
    async fn test_validate_missing_file() {
        let dir = tempdir().unwrap();

        let err = execute(ValidateArgs {
            config: dir.path().join("absent.yaml"),
        })
        .await
        .unwrap_err();

        assert_eq!(categorize_error(&err), ExitCodes::INVALID_ARGS);
    }
}
