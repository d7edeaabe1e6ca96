use anyhow::Result;
use serde::Serialize;

use super::context::CliContext;
use super::output::{emit_structured, OutputFormat};

#[derive(Serialize)]
struct TemplateEntry<'a> {
    name: &'a str,
    description: &'a str,
    steps: Vec<&'a str>,
}

pub fn cmd_templates(ctx: &CliContext, output: OutputFormat) -> Result<bool> {
    let entries: Vec<TemplateEntry<'_>> = ctx
        .engine()
        .catalog()
        .templates()
        .map(|template| TemplateEntry {
            name: &template.name,
            description: &template.description,
            steps: template.steps.iter().map(|step| step.label.as_str()).collect(),
        })
        .collect();

    if emit_structured(&entries, &output)? {
        return Ok(true);
    }

    println!("Config: {}", ctx.config_path().display());
    if let Some(path) = &ctx.config().templates_path {
        println!("Extra templates: {}", path.display());
    }
    for entry in &entries {
        println!("{} - {}", entry.name, entry.description);
        for (idx, label) in entry.steps.iter().enumerate() {
            println!("  {}. {}", idx + 1, label);
        }
    }
    Ok(true)
}
