use clap::Subcommand;

use super::fill::FillArgs;
use super::run::RunArgs;
use super::snapshot::SnapshotArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Run a workflow template or a custom step plan against a page
    Run(RunArgs),

    /// Fill form fields on a page
    Fill(FillArgs),

    /// Print a bounded structural snapshot of a page
    Snapshot(SnapshotArgs),

    /// List the workflow templates in the catalog
    Templates,
}
