//! `probe manifest`.

use std::path::Path;

use anyhow::Context;
use probe_domain::{Manifest, ManifestError, ManifestIssue};

use crate::presentation::render_manifest_checks;

/// Outcome of checking one manifest file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestCheck {
    /// File label shown in the output.
    pub label: String,
    /// The parsed manifest, absent when some line is malformed.
    pub manifest: Option<Manifest>,
    /// Everything found wrong with the file.
    pub issues: Vec<ManifestIssue>,
}

impl ManifestCheck {
    /// Parses and lints `text`.
    #[must_use]
    pub fn lint(label: impl Into<String>, text: &str) -> Self {
        let label = label.into();
        match Manifest::parse(text) {
            Ok(manifest) => Self {
                label,
                issues: manifest.lint().issues,
                manifest: Some(manifest),
            },
            Err(ManifestError::Malformed(issues)) => Self {
                label,
                manifest: None,
                issues,
            },
        }
    }

    /// True when nothing was found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Lints the full manifest and, when given, the minimal one plus its
/// subset relation to the full one.
#[must_use]
pub fn inspect(full: (&str, &str), minimal: Option<(&str, &str)>) -> Vec<ManifestCheck> {
    let full_check = ManifestCheck::lint(full.0, full.1);
    let Some((label, text)) = minimal else {
        return vec![full_check];
    };

    let mut minimal_check = ManifestCheck::lint(label, text);
    if let (Some(full_manifest), Some(minimal_manifest)) =
        (&full_check.manifest, &minimal_check.manifest)
    {
        minimal_check
            .issues
            .extend(Manifest::check_subset(minimal_manifest, full_manifest).issues);
    }
    vec![full_check, minimal_check]
}

/// Reads, checks and prints the manifests. Returns true when both are clean.
///
/// # Errors
///
/// Returns an error if a file cannot be read.
pub async fn execute(full: &Path, minimal: Option<&Path>) -> anyhow::Result<bool> {
    let full_text = read(full).await?;
    let minimal_text = match minimal {
        Some(path) => Some(read(path).await?),
        None => None,
    };

    let full_label = full.display().to_string();
    let minimal_label = minimal.map(|p| p.display().to_string());
    let checks = inspect(
        (&full_label, &full_text),
        minimal_label.as_deref().zip(minimal_text.as_deref()),
    );

    print!("{}", render_manifest_checks(&checks));
    Ok(checks.iter().all(ManifestCheck::is_clean))
}

async fn read(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading manifest {}", path.display()))
}
