use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use perceiver_structural::PageSnapshot;

use super::context::CliContext;
use super::output::{emit_structured, OutputFormat};
use super::page::load_page;

#[derive(Args, Clone, Debug)]
pub struct SnapshotArgs {
    /// HTML file to digest
    #[arg(long, value_name = "FILE")]
    pub page: PathBuf,

    /// URL the page reports (defaults to the file URL)
    #[arg(long)]
    pub url: Option<String>,

    /// Include the truncated markup in human output
    #[arg(long)]
    pub markup: bool,
}

pub async fn cmd_snapshot(args: SnapshotArgs, ctx: &CliContext, output: OutputFormat) -> Result<bool> {
    let document = load_page(&args.page, args.url.as_deref()).await?;
    let snapshot = ctx.engine().snapshot(document.as_ref()).await?;

    if !emit_structured(&snapshot, &output)? {
        print_snapshot(&snapshot, args.markup);
    }
    Ok(true)
}

fn print_snapshot(snapshot: &PageSnapshot, with_markup: bool) {
    println!("{} <{}>", snapshot.title, snapshot.url);
    if let Some(description) = &snapshot.meta.description {
        println!("  {description}");
    }

    println!("Forms: {}", snapshot.forms.len());
    for form in &snapshot.forms {
        println!(
            "  {} {} ({} fields)",
            form.method,
            form.action.as_deref().unwrap_or("-"),
            form.inputs.len()
        );
        for field in &form.inputs {
            println!(
                "    {} [{}] = {}",
                field.name.as_deref().or(field.id.as_deref()).unwrap_or("?"),
                field.field_type,
                field.value.as_deref().unwrap_or("")
            );
        }
    }

    println!("Links: {}", snapshot.links.len());
    for link in &snapshot.links {
        println!("  {} -> {}", link.text, link.href);
    }
    println!("Images: {}", snapshot.images.len());
    println!("Buttons: {}", snapshot.buttons.len());
    for button in &snapshot.buttons {
        println!("  {}", button.text.as_deref().unwrap_or("(unlabeled)"));
    }

    println!("Text ({} chars):", snapshot.text.chars().count());
    println!("{}", snapshot.text);
    if with_markup {
        println!("Markup:");
        println!("{}", snapshot.markup);
    }
}
