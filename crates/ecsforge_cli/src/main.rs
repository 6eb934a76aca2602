//! ecsforge CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Validation failure
//! - 5: Provisioning error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

use commands::{Cli, Commands};
use ecsforge_provision::ProvisionError;
use ecsforge_spec::SpecError;

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const VALIDATION_FAILURE: u8 = 3;
    pub const PROVISION_ERROR: u8 = 5;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "ecsforge=debug"
    } else if cli.quiet {
        "ecsforge=warn"
    } else {
        "ecsforge=info"
    };

    let mut filter = EnvFilter::from_default_env();
    for directive in [level, "warn"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }

    // Already initialized in tests; keep going either way.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let result = match cli.command {
        Commands::Validate(args) => commands::validate::execute(args).await,
        Commands::Render(args) => commands::render::execute(args).await,
        Commands::Plan(args) => commands::plan::execute(args).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Pick an exit code from the error chain.
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(err) = cause.downcast_ref::<ProvisionError>() {
            return match err {
                ProvisionError::Spec(_) => ExitCodes::VALIDATION_FAILURE,
                ProvisionError::BackendCallFailed { .. } => ExitCodes::PROVISION_ERROR,
            };
        }
        if let Some(err) = cause.downcast_ref::<SpecError>() {
            return match err {
                SpecError::MissingField(_) => ExitCodes::VALIDATION_FAILURE,
                SpecError::NotFound(_) => ExitCodes::INVALID_ARGS,
                _ => ExitCodes::GENERAL_ERROR,
            };
        }
    }
    ExitCodes::GENERAL_ERROR
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecsforge_provision::BackendError;

    #[test]
    fn test_categorize_missing_field() {
        let err = anyhow::Error::new(SpecError::MissingField("ECS.Name".to_string()))
            .context("validation failed for stack.yaml");
        assert_eq!(categorize_error(&err), ExitCodes::VALIDATION_FAILURE);
    }

    #[test]
    fn test_categorize_backend_failure() {
        let err = anyhow::Error::new(ProvisionError::backend(
            "demo",
            BackendError::DuplicateResource("demo".to_string()),
        ));
        assert_eq!(categorize_error(&err), ExitCodes::PROVISION_ERROR);
    }

    #[test]
    fn test_categorize_missing_file() {
        let err = anyhow::Error::new(SpecError::NotFound("stack.yaml".into()));
        assert_eq!(categorize_error(&err), ExitCodes::INVALID_ARGS);

        assert_eq!(categorize_error(&anyhow::anyhow!("boom")), ExitCodes::GENERAL_ERROR);
    }
}
