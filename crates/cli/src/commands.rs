//! Command line definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Runs conformance checks against public REST APIs.
#[derive(Debug, Parser)]
#[command(name = "probe")]
#[command(about = "Run REST API conformance checks and lint dependency manifests")]
#[command(version)]
pub struct Cli {
    /// YAML configuration file (defaults to ./probe.yaml when present)
    #[arg(long, global = true, env = "PROBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the built-in check groups and their cases
    List,

    /// Run check groups
    Run(RunArgs),

    /// Lint a pinned dependency manifest
    Manifest {
        /// Full manifest (`name==version` per line)
        full: PathBuf,
        /// Minimal manifest that must be a subset of the full one
        #[arg(long)]
        minimal: Option<PathBuf>,
    },

    /// Diagnostics against the live APIs
    #[command(subcommand)]
    Debug(DebugCommand),
}

/// Diagnostic subcommands.
#[derive(Debug, Subcommand)]
pub enum DebugCommand {
    /// Send the ReqRes user requests and print the raw exchanges
    Reqres,
}

/// Arguments of `probe run`.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Groups to run: `all` or numbers 1-5
    #[arg(value_name = "GROUP")]
    pub groups: Vec<String>,

    /// Override the JSONPlaceholder base URL
    #[arg(long, env = "PROBE_JSONPLACEHOLDER_URL")]
    pub jsonplaceholder_url: Option<String>,

    /// Override the ReqRes base URL
    #[arg(long, env = "PROBE_REQRES_URL")]
    pub reqres_url: Option<String>,

    /// Per-request timeout in milliseconds
    #[arg(long, env = "PROBE_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Directory report files are written to
    #[arg(long, env = "PROBE_REPORT_DIR")]
    pub report_dir: Option<PathBuf>,

    /// Skip writing report files
    #[arg(long)]
    pub no_report: bool,

    /// Output format on stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
    pub format: OutputFormat,

    /// Stop after the first failed group
    #[arg(long)]
    pub fail_fast: bool,
}

/// How `probe run` prints its report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human readable summary.
    Console,
    /// The run report as JSON.
    Json,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_arguments() {
        let cli = Cli::try_parse_from([
            "probe",
            "--verbose",
            "run",
            "1",
            "3",
            "--timeout-ms",
            "2000",
            "--format",
            "json",
            "--fail-fast",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.groups, vec!["1".to_string(), "3".to_string()]);
        assert_eq!(args.timeout_ms, Some(2000));
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.fail_fast);
        assert!(!args.no_report);
    }

    #[test]
    fn test_manifest_arguments() {
        let cli = Cli::try_parse_from([
            "probe",
            "manifest",
            "requirements.txt",
            "--minimal",
            "requirements-minimal.txt",
        ])
        .unwrap();

        let Commands::Manifest { full, minimal } = cli.command else {
            panic!("expected manifest");
        };
        assert_eq!(full, PathBuf::from("requirements.txt"));
        assert_eq!(minimal, Some(PathBuf::from("requirements-minimal.txt")));
    }

    #[test]
    fn test_debug_reqres() {
        let cli = Cli::try_parse_from(["probe", "debug", "reqres"]).unwrap();
        assert!(matches!(cli.command, Commands::Debug(DebugCommand::Reqres)));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["probe", "run", "--format", "xml"]).is_err());
    }
}
