use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};

use super::context::CliContext;
use super::dispatch::dispatch;
use super::env::CliArgs;
use super::runtime::{init_logging, load_config, load_local_env_overrides, LoadedConfig};

pub async fn run() -> Result<ExitCode> {
    load_local_env_overrides();
    let cli = CliArgs::parse();

    init_logging(&cli.log_level, cli.debug)?;

    info!(
        build = env!("PAGEPILOT_BUILD_DATE"),
        commit = env!("PAGEPILOT_GIT_HASH"),
        "Starting PagePilot v{}",
        env!("CARGO_PKG_VERSION")
    );

    let LoadedConfig { config, path } = load_config(cli.config.as_ref()).await?;
    let cli_context = CliContext::new(config, path)?;

    match dispatch(&cli, &cli_context).await {
        Ok(true) => {
            info!("Command completed successfully");
            Ok(ExitCode::SUCCESS)
        }
        Ok(false) => {
            warn!("Command completed with failures");
            Ok(ExitCode::FAILURE)
        }
        Err(err) => {
            error!("Command failed: {}", err);
            Err(err)
        }
    }
}
