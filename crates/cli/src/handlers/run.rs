//! `probe run`.

use std::sync::Arc;

use anyhow::Context;
use probe_application::ports::HttpClient;
use probe_application::{RunSuiteInput, RunSuiteOutput, catalog};
use probe_domain::ProbeConfig;
use probe_infrastructure::to_json_stable;
use tracing::info;

use crate::bootstrap;
use crate::commands::{OutputFormat, RunArgs};
use crate::presentation::render_run;

/// What to run and where the results go.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Group selectors: `all` or group numbers.
    pub groups: Vec<String>,
    /// Stop after the first failed group.
    pub fail_fast: bool,
    /// Write JSON and HTML report files.
    pub write_reports: bool,
}

impl From<&RunArgs> for RunOptions {
    fn from(args: &RunArgs) -> Self {
        Self {
            groups: args.groups.clone(),
            fail_fast: args.fail_fast,
            write_reports: !args.no_report,
        }
    }
}

/// Selects the groups and runs them over `client`.
///
/// # Errors
///
/// Returns an error for an unknown group selector or a failed report write.
pub async fn run(
    client: Arc<dyn HttpClient>,
    config: &ProbeConfig,
    options: &RunOptions,
) -> anyhow::Result<RunSuiteOutput> {
    let groups = catalog::select(catalog::builtin(config), &options.groups)
        .context("selecting groups")?;
    let suite = bootstrap::run_suite(client, config, options.write_reports);

    let output = suite
        .execute(RunSuiteInput {
            groups,
            fail_fast: options.fail_fast,
        })
        .await?;
    Ok(output)
}

/// Runs the selected groups against the live APIs and prints the outcome.
/// Returns true when every group passed.
///
/// # Errors
///
/// Returns an error for an unknown group, a client that cannot be built,
/// or a report that cannot be written.
pub async fn execute(config: &ProbeConfig, args: &RunArgs) -> anyhow::Result<bool> {
    let client = bootstrap::http_client(config)?;
    let output = run(client, config, &RunOptions::from(args)).await?;

    match args.format {
        OutputFormat::Console => {
            print!("{}", render_run(&output.report));
            for path in &output.written {
                println!("Report written to {}", path.display());
            }
        }
        OutputFormat::Json => {
            print!("{}", to_json_stable(&output.report)?);
        }
    }

    info!(summary = %output.report.summary_line(), "run finished");
    Ok(output.report.all_passed())
}
