//! YAML configuration loading.
//!
//! A run reads `probe.yaml` from the working directory unless another path
//! is given. Only an explicitly requested file has to exist.

use std::path::{Path, PathBuf};

use probe_domain::ProbeConfig;
use tokio::fs;
use tracing::debug;

/// File read when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "probe.yaml";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The requested file does not exist.
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid configuration YAML.
    #[error("invalid config in {path}: {source}")]
    Parse {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_yaml::Error,
    },
}

/// Loads the run configuration.
///
/// With `path` set the file must exist. Without it, [`DEFAULT_CONFIG_FILE`]
/// is read when present and defaults are used otherwise. An empty file also
/// yields defaults.
///
/// # Errors
///
/// Returns [`ConfigError`] when an explicit file is missing, or when a file
/// cannot be read or parsed.
pub async fn load_config(path: Option<&Path>) -> Result<ProbeConfig, ConfigError> {
    let (path, explicit) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    let content = match fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if explicit {
                return Err(ConfigError::NotFound(path));
            }
            debug!("no {DEFAULT_CONFIG_FILE}, using defaults");
            return Ok(ProbeConfig::default());
        }
        Err(source) => return Err(ConfigError::Io { path, source }),
    };

    let config = parse_config(&content).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;
    debug!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Parses configuration YAML. Blank input yields defaults.
///
/// # Errors
///
/// Returns the YAML error when the text is not a valid configuration.
pub fn parse_config(content: &str) -> Result<ProbeConfig, serde_yaml::Error> {
    if content.trim().is_empty() {
        return Ok(ProbeConfig::default());
    }
    serde_yaml::from_str(content)
}
