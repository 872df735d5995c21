//! Command-line interface for gakfeedback.
//!
//! This module provides the CLI structure for the `gakfb` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ClearCommand, ConfigCommand, DeleteCommand, ExportCommand, FilterCommand, FilterFieldArg,
    FrequenciaArg, ImpactoArg, ListCommand, OutputFormat, PrioridadeArg, ProcessoArg,
    StatusCommand, SubmitCommand, TipoArg,
};

/// gakfb - Collect process feedback from the field
///
/// Records improvement suggestions and recurring problems, lists and filters
/// them, and exports the collection as JSON.
#[derive(Debug, Parser)]
#[command(name = "gakfb")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit a new feedback
    Submit(SubmitCommand),

    /// List every feedback, newest first
    List(ListCommand),

    /// List feedback matching a field value
    Filter(FilterCommand),

    /// Delete one feedback by id
    Delete(DeleteCommand),

    /// Delete every feedback
    Clear(ClearCommand),

    /// Export every feedback as a JSON file
    Export(ExportCommand),

    /// Show storage status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "gakfb");
    }

    #[test]
    fn test_verbosity_levels() {
        use crate::logging::Verbosity;

        assert_eq!(parse(&["gakfb", "-q", "list"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["gakfb", "list"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["gakfb", "-v", "list"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["gakfb", "-vv", "list"]).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_submit() {
        let cli = parse(&[
            "gakfb", "submit", "--tipo", "problema", "--nome", "Bea", "--titulo", "T2",
            "--descricao", "D2", "--prioridade", "alta", "--impacto", "sim",
        ]);
        let Command::Submit(cmd) = cli.command else {
            panic!("expected submit");
        };
        assert_eq!(cmd.tipo, Some(TipoArg::Problema));
        assert_eq!(cmd.prioridade, Some(PrioridadeArg::Alta));
        assert_eq!(cmd.impacto, Some(ImpactoArg::Sim));
        assert!(cmd.processo.is_none());
        assert_eq!(cmd.obra, "");
    }

    #[test]
    fn test_parse_submit_rejects_unknown_choice() {
        let result = Cli::try_parse_from(["gakfb", "submit", "--prioridade", "urgente"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_list_format() {
        let cli = parse(&["gakfb", "list", "--format", "html"]);
        assert!(matches!(
            cli.command,
            Command::List(ListCommand {
                format: OutputFormat::Html
            })
        ));
    }

    #[test]
    fn test_parse_filter() {
        let cli = parse(&["gakfb", "filter", "--field", "impacto", "--value", "sim"]);
        let Command::Filter(cmd) = cli.command else {
            panic!("expected filter");
        };
        assert_eq!(cmd.field, FilterFieldArg::ImpactoFinanceiro);
        assert_eq!(cmd.value, "sim");
        assert_eq!(cmd.format, OutputFormat::Plain);
    }

    #[test]
    fn test_parse_delete() {
        let cli = parse(&["gakfb", "delete", "feedback_1_abc", "--yes"]);
        let Command::Delete(cmd) = cli.command else {
            panic!("expected delete");
        };
        assert_eq!(cmd.id, "feedback_1_abc");
        assert!(cmd.yes);
    }

    #[test]
    fn test_parse_export_conflicting_flags() {
        let result = Cli::try_parse_from(["gakfb", "export", "--stdout", "--output", "/tmp"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["gakfb", "-c", "/custom/config.toml", "status"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_config_show() {
        let cli = parse(&["gakfb", "config", "show", "--json"]);
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Show { json: true })
        ));
    }
}
