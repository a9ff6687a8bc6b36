//! Per-API request defaults.

use probe_domain::request::{Headers, HttpMethod, RequestBodyKind, RequestSpec};
use probe_domain::{ProbeConfig, Target};

const AUTHORIZATION: &str = "Authorization";
const CONTENT_TYPE: &str = "Content-Type";

/// Base URL, default headers and optional bearer token shared by the
/// requests sent to one API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSession {
    base_url: String,
    default_headers: Headers,
    timeout_ms: Option<u64>,
}

impl ApiSession {
    /// Creates a session with no default headers.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            default_headers: Headers::new(),
            timeout_ms: None,
        }
    }

    /// Session for JSONPlaceholder: JSON `Content-Type` and `Accept`.
    #[must_use]
    pub fn jsonplaceholder(config: &ProbeConfig) -> Self {
        Self::new(&config.targets.jsonplaceholder)
            .with_default_header(CONTENT_TYPE, "application/json")
            .with_default_header("Accept", "application/json")
            .with_default_header("User-Agent", &config.user_agent)
            .with_timeout_ms(config.timeout_ms)
    }

    /// Session for `ReqRes`: only `Accept`, bodies declare their own type.
    #[must_use]
    pub fn reqres(config: &ProbeConfig) -> Self {
        Self::new(&config.targets.reqres)
            .with_default_header("Accept", "application/json")
            .with_default_header("User-Agent", &config.user_agent)
            .with_timeout_ms(config.timeout_ms)
    }

    /// Adds a default header.
    #[must_use]
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.set(name, value);
        self
    }

    /// Sets the timeout applied to requests that do not carry one.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Headers added to every request.
    #[must_use]
    pub const fn default_headers(&self) -> &Headers {
        &self.default_headers
    }

    /// Sends `Authorization: Bearer <token>` from now on.
    pub fn set_auth_token(&mut self, token: &str) {
        self.default_headers
            .set(AUTHORIZATION, format!("Bearer {token}"));
    }

    /// Stops sending the bearer token. Returns whether one was set.
    pub fn remove_auth_token(&mut self) -> bool {
        self.default_headers.remove(AUTHORIZATION)
    }

    /// The bearer token, if set.
    #[must_use]
    pub fn auth_token(&self) -> Option<&str> {
        self.default_headers
            .get(AUTHORIZATION)
            .and_then(|v| v.strip_prefix("Bearer "))
    }

    /// Absolute URL of an endpoint such as `/posts/1`.
    #[must_use]
    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }
        if endpoint.is_empty() || endpoint.starts_with('/') || endpoint.starts_with('?') {
            format!("{}{endpoint}", self.base_url)
        } else {
            format!("{}/{endpoint}", self.base_url)
        }
    }

    /// Builds a request against this API with the defaults applied.
    #[must_use]
    pub fn request(&self, method: HttpMethod, endpoint: &str) -> RequestSpec {
        self.prepare(RequestSpec::with_method(method, endpoint))
    }

    /// Makes a relative URL absolute and fills in defaults the request does
    /// not set itself.
    ///
    /// The default `Content-Type` is only added to requests without a body;
    /// a body always decides its own content type, including none at all.
    #[must_use]
    pub fn prepare(&self, mut request: RequestSpec) -> RequestSpec {
        if !request.is_absolute() {
            request.url = self.url(&request.url);
        }

        let has_body = !matches!(request.body.kind, RequestBodyKind::None);
        for header in self.default_headers.enabled() {
            let skip = has_body && header.name.eq_ignore_ascii_case(CONTENT_TYPE);
            if !skip && !request.headers.contains(&header.name) {
                request.headers.add(header.clone());
            }
        }

        if request.timeout_ms.is_none() {
            request.timeout_ms = self.timeout_ms;
        }
        request
    }
}

/// One session per target API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sessions {
    /// JSONPlaceholder session.
    pub jsonplaceholder: ApiSession,
    /// `ReqRes` session.
    pub reqres: ApiSession,
}

impl Sessions {
    /// Builds both sessions from configuration.
    #[must_use]
    pub fn from_config(config: &ProbeConfig) -> Self {
        Self {
            jsonplaceholder: ApiSession::jsonplaceholder(config),
            reqres: ApiSession::reqres(config),
        }
    }

    /// Session for a target.
    #[must_use]
    pub const fn for_target(&self, target: Target) -> &ApiSession {
        match target {
            Target::JsonPlaceholder => &self.jsonplaceholder,
            Target::ReqRes => &self.reqres,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use probe_domain::request::RequestBody;

    fn config() -> ProbeConfig {
        ProbeConfig::default()
    }

    #[test]
    fn test_url_joining() {
        let session = ApiSession::new("https://reqres.in/api/");
        assert_eq!(session.url("/users"), "https://reqres.in/api/users");
        assert_eq!(session.url("users/2"), "https://reqres.in/api/users/2");
        assert_eq!(session.url("https://other.test/x"), "https://other.test/x");
    }

    #[test]
    fn test_jsonplaceholder_defaults() {
        let request = ApiSession::jsonplaceholder(&config()).request(HttpMethod::Get, "/posts");
        assert_eq!(request.url, "https://jsonplaceholder.typicode.com/posts");
        assert_eq!(request.headers.get("content-type"), Some("application/json"));
        assert_eq!(request.headers.get("accept"), Some("application/json"));
        assert_eq!(request.timeout_ms, Some(5000));
    }

    #[test]
    fn test_reqres_has_no_default_content_type() {
        let request = ApiSession::reqres(&config()).request(HttpMethod::Get, "/users");
        assert!(request.headers.get("content-type").is_none());
        assert_eq!(request.headers.get("accept"), Some("application/json"));
    }

    #[test]
    fn test_prepare_keeps_request_headers_and_bare_bodies() {
        let session = ApiSession::jsonplaceholder(&config());
        let request = RequestSpec::post("/posts")
            .with_header("Accept", "*/*")
            .with_body(RequestBody::raw("{}", None));

        let prepared = session.prepare(request);
        assert_eq!(prepared.headers.get("accept"), Some("*/*"));
        assert!(prepared.headers.get("content-type").is_none());
    }

    #[test]
    fn test_auth_token_lifecycle() {
        let mut session = ApiSession::reqres(&config());
        assert!(session.auth_token().is_none());

        session.set_auth_token("QpwL5tke4Pnpja7X4");
        assert_eq!(session.auth_token(), Some("QpwL5tke4Pnpja7X4"));
        let request = session.request(HttpMethod::Get, "/users/2");
        assert_eq!(
            request.headers.get("authorization"),
            Some("Bearer QpwL5tke4Pnpja7X4")
        );

        assert!(session.remove_auth_token());
        assert!(!session.remove_auth_token());
    }

    #[test]
    fn test_sessions_for_target() {
        let sessions = Sessions::from_config(&config());
        assert_eq!(
            sessions.for_target(Target::ReqRes).base_url(),
            "https://reqres.in/api"
        );
    }
}
