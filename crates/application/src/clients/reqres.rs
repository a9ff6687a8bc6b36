//! `ReqRes` endpoints.

use probe_domain::request::{HttpMethod, RequestSpec};
use probe_domain::settings::{Credentials, UserFixture};
use serde_json::json;

use super::ApiSession;

/// Request builders for the `ReqRes` API.
#[derive(Debug, Clone)]
pub struct ReqResApi {
    session: ApiSession,
}

impl ReqResApi {
    /// Wraps a session.
    #[must_use]
    pub const fn new(session: ApiSession) -> Self {
        Self { session }
    }

    /// The underlying session.
    #[must_use]
    pub const fn session(&self) -> &ApiSession {
        &self.session
    }

    /// Mutable session, for setting the bearer token after login.
    pub const fn session_mut(&mut self) -> &mut ApiSession {
        &mut self.session
    }

    /// `GET /users`, optionally with `?page=`.
    #[must_use]
    pub fn get_users(&self, page: Option<u32>) -> RequestSpec {
        let request = self.session.request(HttpMethod::Get, "/users");
        match page {
            Some(page) => request.with_query("page", page.to_string()),
            None => request,
        }
    }

    /// `GET /users/{id}`
    #[must_use]
    pub fn get_user(&self, id: u64) -> RequestSpec {
        self.session
            .request(HttpMethod::Get, &format!("/users/{id}"))
    }

    /// `POST /users` with a JSON body.
    #[must_use]
    pub fn create_user(&self, user: &UserFixture) -> RequestSpec {
        self.session
            .request(HttpMethod::Post, "/users")
            .with_json(&json!({"name": user.name, "job": user.job}))
    }

    /// `PUT /users/{id}` with a JSON body.
    #[must_use]
    pub fn update_user(&self, id: u64, user: &UserFixture) -> RequestSpec {
        self.session
            .request(HttpMethod::Put, &format!("/users/{id}"))
            .with_json(&json!({"name": user.name, "job": user.job}))
    }

    /// `DELETE /users/{id}`
    #[must_use]
    pub fn delete_user(&self, id: u64) -> RequestSpec {
        self.session
            .request(HttpMethod::Delete, &format!("/users/{id}"))
    }

    /// `POST /login`
    #[must_use]
    pub fn login(&self, credentials: &Credentials) -> RequestSpec {
        self.session
            .request(HttpMethod::Post, "/login")
            .with_json(&json!({"email": credentials.email, "password": credentials.password}))
    }

    /// `POST /register`
    #[must_use]
    pub fn register(&self, credentials: &Credentials) -> RequestSpec {
        self.session
            .request(HttpMethod::Post, "/register")
            .with_json(&json!({"email": credentials.email, "password": credentials.password}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use probe_domain::ProbeConfig;

    fn api() -> ReqResApi {
        ReqResApi::new(ApiSession::reqres(&ProbeConfig::default()))
    }

    #[test]
    fn test_paged_users() {
        assert_eq!(
            api().get_users(Some(2)).full_url(),
            "https://reqres.in/api/users?page=2"
        );
        assert_eq!(api().get_users(None).full_url(), "https://reqres.in/api/users");
    }

    #[test]
    fn test_login_body() {
        let request = api().login(&Credentials::new("eve.holt@reqres.in", "cityslicka"));
        assert_eq!(request.url, "https://reqres.in/api/login");
        assert_eq!(request.body.content_type(), Some("application/json"));
        assert!(request.body.content.contains("cityslicka"));
    }

    #[test]
    fn test_bearer_token_applies_to_later_requests() {
        let mut api = api();
        api.session_mut().set_auth_token("tok");
        assert_eq!(
            api.get_user(2).headers.get("Authorization"),
            Some("Bearer tok")
        );
    }

    #[test]
    fn test_delete_user_targets_user_resource() {
        let request = api().delete_user(2);
        assert_eq!(request.method, HttpMethod::Delete);
        assert_eq!(request.full_url(), "https://reqres.in/api/users/2");
        assert!(request.body.content.is_empty());
    }
}
