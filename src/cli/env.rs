use clap::{builder::PossibleValuesParser, Parser};
use std::path::PathBuf;

use super::commands::Commands;
use super::output::OutputFormat;

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

#[derive(Parser)]
#[command(name = "pagepilot", author, version)]
#[command(
    about = "Run page automation workflows against saved HTML pages",
    long_about = "Loads an HTML file as the active page, then runs workflow templates, \
                  custom step plans, form fills or structural snapshots against it. \
                  Results go to stdout, logs to stderr."
)]
#[command(propagate_version = true)]
pub struct CliArgs {
    /// Settings file (timing, snapshot limits, extra templates)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Log verbosity when RUST_LOG is unset
    #[arg(
        short,
        long,
        default_value = "info",
        global = true,
        value_parser = PossibleValuesParser::new(LOG_LEVELS)
    )]
    pub log_level: String,

    /// Shorthand for `--log-level debug`
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// How results are printed
    #[arg(short, long, default_value = "human", global = true)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn arguments_are_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let args = CliArgs::try_parse_from([
            "pagepilot",
            "snapshot",
            "--page",
            "login.html",
            "-o",
            "json",
            "--log-level",
            "warn",
        ])
        .unwrap();

        assert!(matches!(args.output, OutputFormat::Json));
        assert_eq!(args.log_level, "warn");
        assert!(matches!(args.command, Commands::Snapshot(_)));
    }

    #[test]
    fn unknown_log_levels_are_rejected() {
        let err = CliArgs::try_parse_from(["pagepilot", "-l", "loud", "templates"]);
        assert!(err.is_err());
    }
}
