//! Group 3: data relationships and filtering.

use probe_domain::testing::{Assertion, ComparisonOperator, FieldRule, JsonKind};
use probe_domain::{Capture, CheckCase, CheckGroup, Step, Target};
use serde_json::json;

use super::{each, each_eq, non_empty};
use crate::clients::JsonPlaceholderApi;

pub(super) fn group(api: &JsonPlaceholderApi) -> CheckGroup {
    let filter_steps = [1, 2, 3].into_iter().map(|user_id| {
        Step::new(api.get_posts_by_user(user_id)).expect_all([
            Assertion::status(200),
            non_empty("$"),
            each_eq("$", "userId", json!(user_id)),
        ])
    });

    let comment_steps = [1u64, 2, 3].into_iter().flat_map(|post_id| {
        [
            Step::new(api.get_post_comments(post_id))
                .expect(Assertion::status(200))
                .capture(Capture::length("nested_count", "$")),
            Step::new(api.get_comments_by_post(post_id)).expect_all([
                Assertion::status(200),
                non_empty("$"),
                each_eq("$", "postId", json!(post_id)),
                Assertion::JsonLength {
                    path: "$".to_string(),
                    operator: ComparisonOperator::Equals,
                    length: json!("{{nested_count}}"),
                },
            ]),
        ]
    });

    let limit_steps = [5usize, 10, 20].into_iter().map(|limit| {
        Step::new(api.get_all_posts().with_query("_limit", limit.to_string())).expect_all([
            Assertion::status(200),
            Assertion::json_len("$", limit),
            Assertion::json_eq("$[0].id", json!(1)),
            Assertion::json_eq(format!("$[{}].id", limit - 1), json!(limit)),
        ])
    });

    CheckGroup::new(3, "Data Relationships & Filtering", Target::JsonPlaceholder)
        .case(
            CheckCase::new("3.1", "Post and its comments")
                .described("Every comment of post 1 points back to it")
                .step(
                    Step::new(api.get_post(1))
                        .expect(Assertion::status(200))
                        .capture(Capture::value("post_id", "$.id")),
                )
                .step(Step::new(api.get_post_comments(1)).expect_all([
                    Assertion::status(200),
                    non_empty("$"),
                    each_eq("$", "postId", json!("{{post_id}}")),
                    Assertion::each_has_fields("$", &["id", "name", "email", "body", "postId"]),
                    each("$", "email", ComparisonOperator::Contains, json!("@")),
                ])),
        )
        .case(
            CheckCase::new("3.2", "User and their posts")
                .described("Every post of user 1 belongs to that user and has content")
                .step(
                    Step::new(api.get("/users/1"))
                        .expect(Assertion::status(200))
                        .capture(Capture::value("user_id", "$.id")),
                )
                .step(Step::new(api.get_posts_by_user(1)).expect_all([
                    Assertion::status(200),
                    non_empty("$"),
                    each_eq("$", "userId", json!("{{user_id}}")),
                    Assertion::JsonFields {
                        path: "$".to_string(),
                        fields: vec![
                            FieldRule::required("id"),
                            FieldRule::typed("title", JsonKind::NonEmptyString),
                            FieldRule::typed("body", JsonKind::NonEmptyString),
                            FieldRule::required("userId"),
                        ],
                        each: true,
                    },
                ])),
        )
        .case(
            CheckCase::new("3.3", "User, albums and photos")
                .described("Photos of the first album of user 1 belong to that album")
                .step(
                    Step::new(api.get_user_albums(1))
                        .expect_all([Assertion::status(200), non_empty("$")])
                        .capture(Capture::value("album_id", "$[0].id")),
                )
                .step(Step::new(api.get_album_photos("{{album_id}}")).expect_all([
                    Assertion::status(200),
                    non_empty("$"),
                    each_eq("$", "albumId", json!("{{album_id}}")),
                    Assertion::each_has_fields("$", &["id", "title", "url", "thumbnailUrl", "albumId"]),
                    each("$", "url", ComparisonOperator::StartsWith, json!("http")),
                    each("$", "thumbnailUrl", ComparisonOperator::StartsWith, json!("http")),
                ])),
        )
        .case(
            CheckCase::new("3.4", "Filter posts by user")
                .described("userId filters for users 1 to 3, and none for user 999")
                .steps(filter_steps)
                .step(Step::new(api.get_posts_by_user(999)).expect_all([
                    Assertion::status(200),
                    Assertion::json_len("$", 0),
                ])),
        )
        .case(
            CheckCase::new("3.5", "Filter comments by post")
                .described("postId filter and nested route return the same comments")
                .steps(comment_steps),
        )
        .case(
            CheckCase::new("3.6", "Pagination")
                .described("_limit and _start page through posts in id order")
                .steps(limit_steps)
                .step(
                    Step::new(
                        api.get_all_posts()
                            .with_query("_start", "10")
                            .with_query("_limit", "5"),
                    )
                    .expect_all([
                        Assertion::status(200),
                        Assertion::json_len("$", 5),
                        Assertion::json_eq("$[0].id", json!(11)),
                    ]),
                ),
        )
        .case(
            CheckCase::new("3.7", "Combined filters")
                .described("Several query parameters combine; unknown ones are ignored")
                .step(
                    Step::new(
                        api.get_all_posts()
                            .with_query("userId", "1")
                            .with_query("_limit", "3"),
                    )
                    .expect_all([
                        Assertion::status(200),
                        Assertion::json_len("$", 3),
                        each_eq("$", "userId", json!(1)),
                    ]),
                )
                .step(
                    Step::new(api.get_todos().with_query("completed", "true")).expect_all([
                        Assertion::status(200),
                        non_empty("$"),
                        each_eq("$", "completed", json!(true)),
                    ]),
                )
                .step(
                    Step::new(
                        api.get_todos()
                            .with_query("userId", "1")
                            .with_query("completed", "false")
                            .with_query("_limit", "5"),
                    )
                    .expect_all([
                        Assertion::status(200),
                        each_eq("$", "userId", json!(1)),
                        each_eq("$", "completed", json!(false)),
                    ]),
                )
                .step(
                    Step::new(api.get_all_posts().with_query("invalidParam", "test"))
                        .expect_all([Assertion::status(200), Assertion::json_len("$", 100)]),
                ),
        )
}
