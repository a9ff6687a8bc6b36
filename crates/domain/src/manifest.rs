//! Pinned dependency manifests.
//!
//! A manifest is plain text with one `name==version` declaration per line.
//! Blank lines are ignored and `#` starts a comment; a comment on its own
//! line is recorded as a section header.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use pep440_rs::Version;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single `name==version` declaration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Requirement {
    /// Package name as written.
    pub name: String,
    /// Pinned version as written.
    pub version: String,
    /// 1-based line number.
    pub line: usize,
}

impl Requirement {
    /// Name normalized for comparison: lowercase, runs of `-`, `_` and `.`
    /// collapsed to a single `-`.
    #[must_use]
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }
}

/// A problem found in a manifest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ManifestIssue {
    /// Line is not a comment, blank, or `name==version`.
    MalformedLine {
        /// 1-based line number.
        line: usize,
        /// Line content.
        content: String,
    },
    /// Version string is not a valid release version.
    InvalidVersion {
        /// 1-based line number.
        line: usize,
        /// Package name.
        name: String,
        /// Offending version.
        version: String,
    },
    /// The same package is declared twice.
    DuplicatePackage {
        /// Package name as written on the second declaration.
        name: String,
        /// Line of the first declaration.
        first_line: usize,
        /// Line of the repeated declaration.
        line: usize,
    },
    /// A package of the minimal manifest is missing from the full one.
    NotInFull {
        /// Package name.
        name: String,
    },
}

impl fmt::Display for ManifestIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedLine { line, content } => {
                write!(f, "line {line}: expected `name==version`, found `{content}`")
            }
            Self::InvalidVersion {
                line,
                name,
                version,
            } => write!(f, "line {line}: invalid version `{version}` for {name}"),
            Self::DuplicatePackage {
                name,
                first_line,
                line,
            } => write!(
                f,
                "line {line}: {name} is already declared on line {first_line}"
            ),
            Self::NotInFull { name } => {
                write!(f, "{name} is in the minimal manifest but not in the full one")
            }
        }
    }
}

/// Errors from parsing a manifest.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ManifestError {
    /// One or more lines are not declarations.
    #[error("{} malformed line(s), first: {}", .0.len(), first_issue(.0))]
    Malformed(Vec<ManifestIssue>),
}

fn first_issue(issues: &[ManifestIssue]) -> String {
    issues.first().map(ToString::to_string).unwrap_or_default()
}

/// Issues found by a lint or subset check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ManifestReport {
    /// Issues in line order.
    pub issues: Vec<ManifestIssue>,
}

impl ManifestReport {
    /// True when no issue was found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// A parsed manifest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Manifest {
    /// Declarations in file order.
    pub requirements: Vec<Requirement>,
    /// Comment headers in file order.
    pub sections: Vec<String>,
}

impl Manifest {
    /// Parses manifest text, collecting every malformed line.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Malformed`] listing each line that is not
    /// blank, a comment, or a `name==version` declaration.
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        let mut manifest = Self::default();
        let mut malformed = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let raw = raw.trim_end_matches('\r');
            let trimmed = raw.trim();

            if trimmed.is_empty() {
                continue;
            }
            if let Some(comment) = trimmed.strip_prefix('#') {
                let header = comment.trim();
                if !header.is_empty() {
                    manifest.sections.push(header.to_string());
                }
                continue;
            }

            let declaration = trimmed.split('#').next().unwrap_or_default().trim();
            match parse_declaration(declaration) {
                Some((name, version)) => manifest.requirements.push(Requirement {
                    name: name.to_string(),
                    version: version.to_string(),
                    line,
                }),
                None => malformed.push(ManifestIssue::MalformedLine {
                    line,
                    content: raw.trim().to_string(),
                }),
            }
        }

        if malformed.is_empty() {
            Ok(manifest)
        } else {
            Err(ManifestError::Malformed(malformed))
        }
    }

    /// Reports invalid versions and duplicated package names.
    #[must_use]
    pub fn lint(&self) -> ManifestReport {
        let mut issues = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();

        for req in &self.requirements {
            if !is_valid_version(&req.version) {
                issues.push(ManifestIssue::InvalidVersion {
                    line: req.line,
                    name: req.name.clone(),
                    version: req.version.clone(),
                });
            }
            match seen.get(&req.normalized_name()) {
                Some(&first_line) => issues.push(ManifestIssue::DuplicatePackage {
                    name: req.name.clone(),
                    first_line,
                    line: req.line,
                }),
                None => {
                    seen.insert(req.normalized_name(), req.line);
                }
            }
        }

        ManifestReport { issues }
    }

    /// Reports packages of `minimal` that `full` does not declare.
    #[must_use]
    pub fn check_subset(minimal: &Self, full: &Self) -> ManifestReport {
        let issues = minimal
            .requirements
            .iter()
            .filter(|req| full.get(&req.name).is_none())
            .map(|req| ManifestIssue::NotInFull {
                name: req.name.clone(),
            })
            .collect();
        ManifestReport { issues }
    }

    /// Normalized package names in file order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.requirements
            .iter()
            .map(Requirement::normalized_name)
            .collect()
    }

    /// Finds a declaration by name, ignoring case and separator style.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Requirement> {
        let wanted = normalize_name(name);
        self.requirements
            .iter()
            .find(|r| r.normalized_name() == wanted)
    }

    /// Number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    /// True when nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }
}

impl FromStr for Manifest {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_declaration(declaration: &str) -> Option<(&str, &str)> {
    let (name, version) = declaration.split_once("==")?;
    let name = name.trim();
    let version = version.trim();

    let valid_version = !version.is_empty()
        && !version
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '=' | '<' | '>' | '~' | ','));

    (is_valid_name(name) && valid_version).then_some((name, version))
}

fn is_valid_name(name: &str) -> bool {
    let starts_and_ends_alnum = name.chars().next().is_some_and(|c| c.is_ascii_alphanumeric())
        && name.chars().last().is_some_and(|c| c.is_ascii_alphanumeric());
    starts_and_ends_alnum
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// A dotted numeric release, optionally with a pre, post or dev suffix.
/// Epochs, local labels and wildcards are rejected.
fn is_valid_version(version: &str) -> bool {
    let starts_with_digit = version.chars().next().is_some_and(|c| c.is_ascii_digit());
    starts_with_digit
        && !version.contains(['!', '+', '*'])
        && Version::from_str(version).is_ok()
}

fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_separator = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !last_was_separator {
                out.push('-');
            }
            last_was_separator = true;
        } else {
            out.push(c.to_ascii_lowercase());
            last_was_separator = false;
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FULL: &str = "\
# Core Testing Framework
pytest==7.4.3
pytest-html==4.1.1

# HTTP Client
requests==2.31.0

# Schema Validation
jsonschema==4.20.0
pytest-json-report==1.5.0
";

    const MINIMAL: &str = "\
pytest==7.4.3
pytest-html==4.1.1
requests==2.31.0
jsonschema==4.20.0
pytest_json_report==1.5.0
";

    #[test]
    fn test_parse_sections_and_requirements() {
        let manifest = Manifest::parse(FULL).unwrap();
        assert_eq!(manifest.len(), 5);
        assert_eq!(
            manifest.sections,
            vec!["Core Testing Framework", "HTTP Client", "Schema Validation"]
        );
        let requests = manifest.get("Requests").unwrap();
        assert_eq!(requests.version, "2.31.0");
        assert_eq!(requests.line, 6);
    }

    #[test]
    fn test_parse_collects_all_malformed_lines() {
        let err = Manifest::parse("pytest>=7.0\nrequests==2.31.0\njust-a-name\n").unwrap_err();
        let ManifestError::Malformed(issues) = err;
        assert_eq!(
            issues,
            vec![
                ManifestIssue::MalformedLine {
                    line: 1,
                    content: "pytest>=7.0".to_string()
                },
                ManifestIssue::MalformedLine {
                    line: 3,
                    content: "just-a-name".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_inline_comments_and_crlf() {
        let manifest = Manifest::parse("faker==20.1.0  # optional\r\nlocust==2.17.0\r\n").unwrap();
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.requirements[0].version, "20.1.0");
        assert_eq!(manifest.requirements[1].version, "2.17.0");
    }

    #[test]
    fn test_empty_manifest_is_valid_subset() {
        let empty = Manifest::parse("").unwrap();
        let full = Manifest::parse(FULL).unwrap();
        assert!(empty.is_empty());
        assert!(empty.lint().is_clean());
        assert!(Manifest::check_subset(&empty, &full).is_clean());
    }

    #[test]
    fn test_lint_invalid_version() {
        let manifest = Manifest::parse("black==23.x\nflake8==6.1.0\nmypy==1.7.0rc1\n").unwrap();
        let report = manifest.lint();
        assert_eq!(
            report.issues,
            vec![ManifestIssue::InvalidVersion {
                line: 1,
                name: "black".to_string(),
                version: "23.x".to_string(),
            }]
        );
    }

    #[test]
    fn test_lint_rejects_local_and_wildcard_versions() {
        let manifest = Manifest::parse("a==1.0+local\nb==1.*\nc==1!2.0\n").unwrap();
        assert_eq!(manifest.lint().issues.len(), 3);
    }

    #[test]
    fn test_lint_duplicates_normalized() {
        let manifest = Manifest::parse("pytest-html==4.1.1\nPytest_HTML==4.1.1\n").unwrap();
        assert_eq!(
            manifest.lint().issues,
            vec![ManifestIssue::DuplicatePackage {
                name: "Pytest_HTML".to_string(),
                first_line: 1,
                line: 2,
            }]
        );
    }

    #[test]
    fn test_subset() {
        let full = Manifest::parse(FULL).unwrap();
        let minimal = Manifest::parse(MINIMAL).unwrap();
        assert!(Manifest::check_subset(&minimal, &full).is_clean());

        let extra = Manifest::parse("httpx==0.25.2\n").unwrap();
        assert_eq!(
            Manifest::check_subset(&extra, &full).issues,
            vec![ManifestIssue::NotInFull {
                name: "httpx".to_string()
            }]
        );
    }

    #[test]
    fn test_names_are_normalized() {
        let manifest = Manifest::parse("Pytest.JSON__Report==1.5.0\n").unwrap();
        assert_eq!(manifest.names(), vec!["pytest-json-report"]);
    }

    #[test]
    fn test_issue_display() {
        let issue = ManifestIssue::NotInFull {
            name: "httpx".to_string(),
        };
        assert_eq!(
            issue.to_string(),
            "httpx is in the minimal manifest but not in the full one"
        );
    }
}
