use std::path::PathBuf;

use action_flow::{ActionPlan, ExecutionReport};
use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use tokio::fs;

use super::context::CliContext;
use super::output::{emit_structured, OutputFormat};
use super::page::load_page;

#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    /// HTML file to run against
    #[arg(long, value_name = "FILE")]
    pub page: PathBuf,

    /// URL the page reports (defaults to the file URL)
    #[arg(long)]
    pub url: Option<String>,

    /// Workflow template name
    #[arg(long, conflicts_with = "plan", required_unless_present = "plan")]
    pub workflow: Option<String>,

    /// Text bound into the template's type steps
    #[arg(long, default_value = "")]
    pub text: String,

    /// JSON file holding `execute_workflow` call arguments
    #[arg(long, value_name = "FILE")]
    pub plan: Option<PathBuf>,
}

pub async fn cmd_run(args: RunArgs, ctx: &CliContext, output: OutputFormat) -> Result<bool> {
    let document = load_page(&args.page, args.url.as_deref()).await?;

    let report = match (&args.workflow, &args.plan) {
        (Some(name), _) => {
            ctx.engine()
                .run(&document, &ActionPlan::template(name.clone(), args.text.clone()))
                .await
        }
        (None, Some(path)) => {
            let raw = fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read plan {}", path.display()))?;
            let call: Value = serde_json::from_str(&raw).context("Failed to parse plan JSON")?;
            ctx.engine().run_call(&document, &call).await
        }
        (None, None) => anyhow::bail!("either --workflow or --plan is required"),
    };

    if !emit_structured(&report, &output)? {
        print_report(&report);
    }
    Ok(report.success)
}

fn print_report(report: &ExecutionReport) {
    println!("{}", report.summary());
    for outcome in &report.outcomes {
        println!("  {outcome}");
    }
    println!("  ({} ms)", report.latency_ms);
}
