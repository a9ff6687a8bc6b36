//! Probe configuration.
//!
//! Every field has a default so a partial (or absent) configuration file
//! yields a usable configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Base URLs of the APIs under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Targets {
    /// JSONPlaceholder base URL.
    #[serde(default = "default_jsonplaceholder")]
    pub jsonplaceholder: String,
    /// `ReqRes` base URL, including the `/api` prefix.
    #[serde(default = "default_reqres")]
    pub reqres: String,
}

fn default_jsonplaceholder() -> String {
    "https://jsonplaceholder.typicode.com".to_string()
}

fn default_reqres() -> String {
    "https://reqres.in/api".to_string()
}

impl Default for Targets {
    fn default() -> Self {
        Self {
            jsonplaceholder: default_jsonplaceholder(),
            reqres: default_reqres(),
        }
    }
}

/// Payload used to create and update posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostFixture {
    /// Post title.
    pub title: String,
    /// Post body.
    pub body: String,
    /// Owning user.
    #[serde(rename = "userId")]
    pub user_id: u64,
}

impl Default for PostFixture {
    fn default() -> Self {
        Self {
            title: "Test Post Title".to_string(),
            body: "This is a test post body for API testing".to_string(),
            user_id: 1,
        }
    }
}

/// Payload used to create `ReqRes` users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFixture {
    /// User name.
    pub name: String,
    /// Job title.
    pub job: String,
}

impl Default for UserFixture {
    fn default() -> Self {
        Self {
            name: "John Doe".to_string(),
            job: "QA Automation Engineer".to_string(),
        }
    }
}

/// Email and password pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Creates credentials.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

fn default_login() -> Credentials {
    Credentials::new("eve.holt@reqres.in", "cityslicka")
}

fn default_register() -> Credentials {
    Credentials::new("eve.holt@reqres.in", "pistol")
}

/// Test payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixtures {
    /// Post payload.
    #[serde(default)]
    pub post: PostFixture,
    /// User payload.
    #[serde(default)]
    pub user: UserFixture,
    /// Valid login credentials.
    #[serde(default = "default_login")]
    pub login: Credentials,
    /// Valid registration credentials.
    #[serde(default = "default_register")]
    pub register: Credentials,
}

impl Default for Fixtures {
    fn default() -> Self {
        Self {
            post: PostFixture::default(),
            user: UserFixture::default(),
            login: default_login(),
            register: default_register(),
        }
    }
}

/// Runtime configuration of a probe run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// API base URLs.
    #[serde(default)]
    pub targets: Targets,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Upper bound used by response time assertions.
    #[serde(default = "default_max_response_time_ms")]
    pub max_response_time_ms: u64,
    /// `User-Agent` header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Directory report files are written to.
    #[serde(default = "default_report_dir")]
    pub report_dir: String,
    /// Test payloads.
    #[serde(default)]
    pub fixtures: Fixtures,
}

const fn default_timeout_ms() -> u64 {
    5000
}

const fn default_max_response_time_ms() -> u64 {
    3000
}

fn default_user_agent() -> String {
    format!("probe/{}", env!("CARGO_PKG_VERSION"))
}

fn default_report_dir() -> String {
    "reports".to_string()
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            targets: Targets::default(),
            timeout_ms: default_timeout_ms(),
            max_response_time_ms: default_max_response_time_ms(),
            user_agent: default_user_agent(),
            report_dir: default_report_dir(),
            fixtures: Fixtures::default(),
        }
    }
}

impl ProbeConfig {
    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
