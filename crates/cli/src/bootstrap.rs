//! Composition root.
//!
//! Loads the configuration and wires the infrastructure adapters into the
//! application use cases. Handlers receive ready-made use cases from here.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use probe_application::clients::{ApiSession, ReqResApi, Sessions};
use probe_application::ports::{HttpClient, ReportWriter};
use probe_application::{DebugReqRes, RunGroup, RunSuite};
use probe_domain::ProbeConfig;
use probe_infrastructure::{
    HtmlReportWriter, JsonReportWriter, ReqwestHttpClient, SystemClock, TestRunner, load_config,
};

/// Command line values that take precedence over the configuration file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// JSONPlaceholder base URL.
    pub jsonplaceholder_url: Option<String>,
    /// `ReqRes` base URL.
    pub reqres_url: Option<String>,
    /// Per-request timeout.
    pub timeout_ms: Option<u64>,
    /// Report directory.
    pub report_dir: Option<PathBuf>,
}

impl ConfigOverrides {
    /// Writes every set value into `config`.
    pub fn apply(&self, config: &mut ProbeConfig) {
        if let Some(url) = &self.jsonplaceholder_url {
            config.targets.jsonplaceholder = url.trim_end_matches('/').to_string();
        }
        if let Some(url) = &self.reqres_url {
            config.targets.reqres = url.trim_end_matches('/').to_string();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if let Some(dir) = &self.report_dir {
            config.report_dir = dir.display().to_string();
        }
    }
}

/// Loads the configuration file (if any) and applies the overrides.
///
/// # Errors
///
/// Returns an error when an explicit file is missing or a file is invalid.
pub async fn load(path: Option<&Path>, overrides: &ConfigOverrides) -> anyhow::Result<ProbeConfig> {
    let mut config = load_config(path).await.context("loading configuration")?;
    overrides.apply(&mut config);
    Ok(config)
}

/// HTTP client configured with the run's timeout and `User-Agent`.
///
/// # Errors
///
/// Returns an error when the TLS backend cannot be initialised.
pub fn http_client(config: &ProbeConfig) -> anyhow::Result<Arc<dyn HttpClient>> {
    let client = ReqwestHttpClient::from_config(config).context("creating HTTP client")?;
    Ok(Arc::new(client))
}

/// Group runner over `client`.
#[must_use]
pub fn run_group(client: Arc<dyn HttpClient>, config: &ProbeConfig) -> RunGroup {
    RunGroup::new(
        client,
        Arc::new(TestRunner::new()),
        Sessions::from_config(config),
    )
}

/// Suite runner, with JSON and HTML writers unless reports are disabled.
#[must_use]
pub fn run_suite(client: Arc<dyn HttpClient>, config: &ProbeConfig, write_reports: bool) -> RunSuite {
    let suite = RunSuite::new(run_group(client, config), Arc::new(SystemClock::new()));
    if !write_reports {
        return suite;
    }

    let writers: [Arc<dyn ReportWriter>; 2] = [
        Arc::new(JsonReportWriter::new(&config.report_dir)),
        Arc::new(HtmlReportWriter::new(&config.report_dir)),
    ];
    writers
        .into_iter()
        .fold(suite, |suite, writer| suite.with_writer(writer))
}

/// `ReqRes` diagnostic over `client`.
#[must_use]
pub fn debug_reqres(client: Arc<dyn HttpClient>, config: &ProbeConfig) -> DebugReqRes {
    DebugReqRes::new(client, ReqResApi::new(ApiSession::reqres(config)))
}
