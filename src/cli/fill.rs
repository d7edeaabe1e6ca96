use std::path::PathBuf;

use action_flow::{FormFillReport, FormFillRequest};
use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use tokio::fs;

use super::context::CliContext;
use super::output::{emit_structured, OutputFormat};
use super::page::load_page;

#[derive(Args, Clone, Debug)]
pub struct FillArgs {
    /// HTML file holding the form
    #[arg(long, value_name = "FILE")]
    pub page: PathBuf,

    /// URL the page reports (defaults to the file URL)
    #[arg(long)]
    pub url: Option<String>,

    /// JSON object mapping locator hints to values
    #[arg(long, value_name = "FILE")]
    pub data: PathBuf,

    /// Submit the first form once something was filled
    #[arg(long)]
    pub submit: bool,
}

pub async fn cmd_fill(args: FillArgs, ctx: &CliContext, output: OutputFormat) -> Result<bool> {
    let raw = fs::read_to_string(&args.data)
        .await
        .with_context(|| format!("Failed to read form data {}", args.data.display()))?;
    let data: Value = serde_json::from_str(&raw).context("Failed to parse form data JSON")?;
    let request = FormFillRequest::from_json(&data, args.submit)?;

    let document = load_page(&args.page, args.url.as_deref()).await?;
    let report = ctx.engine().fill_form(&document, &request).await;

    if !emit_structured(&report, &output)? {
        print_report(&report);
    }
    Ok(report.submission.is_none() || report.submitted())
}

fn print_report(report: &FormFillReport) {
    println!("{}", report.summary());
    for outcome in &report.outcomes {
        println!("  {outcome}");
    }
    if let Some(submission) = &report.submission {
        println!("  {}", submission.detail);
    }
}
