use super::env::CliArgs;
use super::fill::cmd_fill;
use super::run::cmd_run;
use super::snapshot::cmd_snapshot;
use super::templates::cmd_templates;
use crate::cli::commands::Commands;
use crate::cli::context::CliContext;
use anyhow::Result;

/// Runs the selected command; `Ok(false)` means it ran but reported failure.
pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> Result<bool> {
    let output = cli.output.clone();
    match cli.command.clone() {
        Commands::Run(args) => cmd_run(args, ctx, output).await,
        Commands::Fill(args) => cmd_fill(args, ctx, output).await,
        Commands::Snapshot(args) => cmd_snapshot(args, ctx, output).await,
        Commands::Templates => cmd_templates(ctx, output),
    }
}
