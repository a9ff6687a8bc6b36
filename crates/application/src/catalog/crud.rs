//! Group 1: basic CRUD operations.

use probe_domain::testing::{Assertion, FieldRule, JsonKind};
use probe_domain::{CheckCase, CheckGroup, ProbeConfig, Step, Target};
use serde_json::json;

use super::{each_eq, within};
use crate::clients::JsonPlaceholderApi;

pub(super) fn group(api: &JsonPlaceholderApi, config: &ProbeConfig) -> CheckGroup {
    let post = &config.fixtures.post;
    let payload = json!({"title": post.title, "body": post.body, "userId": post.user_id});
    let update = json!({
        "id": 1,
        "title": "Updated Test Title",
        "body": "Updated test body content",
        "userId": 1,
    });

    CheckGroup::new(1, "Basic CRUD Operations", Target::JsonPlaceholder)
        .case(
            CheckCase::new("1.1", "List all posts")
                .described("GET /posts returns 100 posts with the standard fields")
                .step(Step::new(api.get_all_posts()).expect_all([
                    Assertion::status(200),
                    Assertion::json_len("$", 100),
                    Assertion::each_has_fields("$", &["id", "title", "body", "userId"]),
                    within(config.max_response_time_ms),
                ])),
        )
        .case(
            CheckCase::new("1.2", "Get single post")
                .described("GET /posts/1 returns post 1 with content")
                .step(Step::new(api.get_post(1)).expect_all([
                    Assertion::status(200),
                    Assertion::json_eq("$.id", json!(1)),
                    Assertion::JsonFields {
                        path: "$".to_string(),
                        fields: vec![
                            FieldRule::typed("title", JsonKind::NonEmptyString),
                            FieldRule::typed("body", JsonKind::NonEmptyString),
                            FieldRule::typed("userId", JsonKind::Integer),
                        ],
                        each: false,
                    },
                ])),
        )
        .case(
            CheckCase::new("1.3", "Create post")
                .described("POST /posts answers 201 and echoes the payload")
                .step(Step::new(api.create_post(&payload)).expect_all([
                    Assertion::status(201),
                    Assertion::json_eq("$.title", json!(post.title)),
                    Assertion::json_eq("$.body", json!(post.body)),
                    Assertion::json_eq("$.userId", json!(post.user_id)),
                    Assertion::JsonType {
                        path: "$.id".to_string(),
                        kind: JsonKind::Integer,
                    },
                ])),
        )
        .case(
            CheckCase::new("1.4", "Update post")
                .described("PUT /posts/1 replaces the post")
                .step(Step::new(api.update_post(1, &update)).expect_all([
                    Assertion::status(200),
                    Assertion::json_eq("$.id", json!(1)),
                    Assertion::json_eq("$.title", update["title"].clone()),
                    Assertion::json_eq("$.body", update["body"].clone()),
                ])),
        )
        .case(
            CheckCase::new("1.5", "Delete post")
                .described("DELETE /posts/1 answers 200")
                .step(Step::new(api.delete_post(1)).expect(Assertion::status(200))),
        )
        .case(
            CheckCase::new("1.6", "List users")
                .described("GET /users returns 10 users with contact fields")
                .step(Step::new(api.get_users()).expect_all([
                    Assertion::status(200),
                    Assertion::json_len("$", 10),
                    Assertion::each_has_fields("$", &["id", "name", "username", "email"]),
                ])),
        )
        .case(
            CheckCase::new("1.7", "Comments of a post")
                .described("GET /posts/1/comments returns its 5 comments")
                .step(Step::new(api.get_post_comments(1)).expect_all([
                    Assertion::status(200),
                    Assertion::json_len("$", 5),
                    Assertion::each_has_fields("$", &["id", "name", "email", "body", "postId"]),
                    each_eq("$", "postId", json!(1)),
                ])),
        )
        .case(
            CheckCase::new("1.8", "Posts of a user")
                .described("GET /posts?userId=1 returns the 10 posts of user 1")
                .step(Step::new(api.get_posts_by_user(1)).expect_all([
                    Assertion::status(200),
                    Assertion::json_len("$", 10),
                    each_eq("$", "userId", json!(1)),
                ])),
        )
}
