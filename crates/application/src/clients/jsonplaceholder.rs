//! JSONPlaceholder endpoints.

use probe_domain::request::{HttpMethod, RequestSpec};
use serde_json::Value;

use super::ApiSession;

/// Request builders for the JSONPlaceholder API.
#[derive(Debug, Clone)]
pub struct JsonPlaceholderApi {
    session: ApiSession,
}

impl JsonPlaceholderApi {
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

    /// `GET <endpoint>` with the session defaults.
    #[must_use]
    pub fn get(&self, endpoint: &str) -> RequestSpec {
        self.session.request(HttpMethod::Get, endpoint)
    }

    /// `GET /posts`
    #[must_use]
    pub fn get_all_posts(&self) -> RequestSpec {
        self.get("/posts")
    }

    /// `GET /posts/{id}`
    #[must_use]
    pub fn get_post(&self, id: impl std::fmt::Display) -> RequestSpec {
        self.get(&format!("/posts/{id}"))
    }

    /// `POST /posts` with a JSON body.
    #[must_use]
    pub fn create_post(&self, post: &Value) -> RequestSpec {
        self.session
            .request(HttpMethod::Post, "/posts")
            .with_json(post)
    }

    /// `PUT /posts/{id}` with a JSON body.
    #[must_use]
    pub fn update_post(&self, id: u64, post: &Value) -> RequestSpec {
        self.session
            .request(HttpMethod::Put, &format!("/posts/{id}"))
            .with_json(post)
    }

    /// `PATCH /posts/{id}` with a partial JSON body.
    #[must_use]
    pub fn patch_post(&self, id: u64, fields: &Value) -> RequestSpec {
        self.session
            .request(HttpMethod::Patch, &format!("/posts/{id}"))
            .with_json(fields)
    }

    /// `DELETE /posts/{id}`
    #[must_use]
    pub fn delete_post(&self, id: u64) -> RequestSpec {
        self.session
            .request(HttpMethod::Delete, &format!("/posts/{id}"))
    }

    /// `GET /posts/{id}/comments`
    #[must_use]
    pub fn get_post_comments(&self, id: impl std::fmt::Display) -> RequestSpec {
        self.get(&format!("/posts/{id}/comments"))
    }

    /// `GET /posts?userId={user_id}`
    #[must_use]
    pub fn get_posts_by_user(&self, user_id: i64) -> RequestSpec {
        self.get("/posts").with_query("userId", user_id.to_string())
    }

    /// `GET /comments?postId={post_id}`
    #[must_use]
    pub fn get_comments_by_post(&self, post_id: u64) -> RequestSpec {
        self.get("/comments").with_query("postId", post_id.to_string())
    }

    /// `GET /users`
    #[must_use]
    pub fn get_users(&self) -> RequestSpec {
        self.get("/users")
    }

    /// `GET /users/{id}`
    #[must_use]
    pub fn get_user(&self, id: u64) -> RequestSpec {
        self.get(&format!("/users/{id}"))
    }

    /// `GET /users/{id}/albums`
    #[must_use]
    pub fn get_user_albums(&self, id: u64) -> RequestSpec {
        self.get(&format!("/users/{id}/albums"))
    }

    /// `GET /albums/{id}/photos`
    #[must_use]
    pub fn get_album_photos(&self, id: impl std::fmt::Display) -> RequestSpec {
        self.get(&format!("/albums/{id}/photos"))
    }

    /// `GET /todos`
    #[must_use]
    pub fn get_todos(&self) -> RequestSpec {
        self.get("/todos")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use probe_domain::ProbeConfig;
    use serde_json::json;

    fn api() -> JsonPlaceholderApi {
        JsonPlaceholderApi::new(ApiSession::jsonplaceholder(&ProbeConfig::default()))
    }

    #[test]
    fn test_create_post() {
        let request = api().create_post(&json!({"title": "t", "userId": 1}));
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "https://jsonplaceholder.typicode.com/posts");
        assert!(request.body.is_json());
        assert_eq!(
            serde_json::from_str::<Value>(&request.body.content).ok(),
            Some(json!({"title": "t", "userId": 1}))
        );
    }

    #[test]
    fn test_posts_by_user_query() {
        let request = api().get_posts_by_user(1);
        assert_eq!(
            request.full_url(),
            "https://jsonplaceholder.typicode.com/posts?userId=1"
        );
    }

    #[test]
    fn test_nested_routes() {
        assert_eq!(
            api().get_album_photos("{{album_id}}").url,
            "https://jsonplaceholder.typicode.com/albums/{{album_id}}/photos"
        );
        assert_eq!(api().delete_post(1).method, HttpMethod::Delete);
    }
}
