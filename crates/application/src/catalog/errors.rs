//! Group 4: error handling and edge cases.

use probe_domain::request::{HttpMethod, RequestBody, RequestSpec};
use probe_domain::testing::Assertion;
use probe_domain::{CheckCase, CheckGroup, LoadProfile, Step, Target};
use serde_json::json;

use super::within;
use crate::clients::JsonPlaceholderApi;

const MISSING_PATHS: [&str; 9] = [
    "/posts/999",
    "/posts/0",
    "/posts/-1",
    "/users/999",
    "/albums/999",
    "/comments/999",
    "/todos/999",
    "/nonexistent",
    "/posts/abc",
];

const MALFORMED_BODIES: [&str; 5] = [
    r#"{"title": "test", "body": "test", "userId": }"#,
    r#"{"title": "test", "body": "test" "userId": 1}"#,
    r#"{"title": "test", "body": "test", "userId": 1"#,
    r#"{title: "test", body: "test", userId: 1}"#,
    r#"{"title": "test", "body": "test", "userId": "abc"}"#,
];

const VALID_BODY: &str = r#"{"title": "test", "body": "test", "userId": 1}"#;

const BOUNDARY_USER_IDS: [i64; 5] = [0, -1, 999_999, 2_147_483_647, -2_147_483_648];

const TITLE_LENGTHS: [usize; 4] = [0, 1, 1_000, 10_000];

const SPECIAL_BODIES: [(&str, &str); 8] = [
    ("Unicode and emoji", "Unicode: 你好世界 🌍"),
    ("HTML/Script tags", r#"HTML: <script>alert("test")</script>"#),
    ("SQL injection characters", "SQL: '; DROP TABLE posts; --"),
    ("Various quote types", r#"Quotes: "test" 'test' `test`"#),
    ("Special symbols", "Symbols: !@#$%^&*()_+-=[]{}|;:,.<>?"),
    ("Line breaks", "Newlines:\nLine 1\nLine 2\r\nLine 3"),
    ("Tab characters", "Tabs:\t\tIndented text"),
    ("Null bytes", "Null bytes: test\u{0}test"),
];

pub(super) fn group(api: &JsonPlaceholderApi) -> CheckGroup {
    let session = api.session();

    let missing_steps = MISSING_PATHS.iter().map(|path| {
        Step::new(api.get(path)).expect_all([Assertion::status(404), within(3000)])
    });

    let method_steps = [
        (HttpMethod::Patch, "/posts"),
        (HttpMethod::Head, "/posts/1"),
        (HttpMethod::Options, "/posts/1"),
        (HttpMethod::Trace, "/posts/1"),
    ]
    .into_iter()
    .map(|(method, path)| {
        Step::new(session.request(method, path))
            .named(format!("{method} {path}"))
            .expect(Assertion::status_in(&[200, 204, 404, 405, 501]))
            .tolerating_transport_errors()
    });

    let malformed_steps = MALFORMED_BODIES.iter().map(|body| {
        Step::new(
            session.prepare(
                RequestSpec::post("/posts")
                    .with_body(RequestBody::raw(*body, Some("application/json"))),
            ),
        )
        .expect(Assertion::status_in(&[200, 201, 400, 422, 500]))
        .tolerating_transport_errors()
    });

    // A body without Content-Type, then one declared as plain text.
    let content_type_steps = [None, Some("text/plain")].into_iter().map(|content_type| {
        Step::new(
            session.prepare(
                RequestSpec::post("/posts").with_body(RequestBody::raw(VALID_BODY, content_type)),
            ),
        )
        .named(format!("POST /posts as {}", content_type.unwrap_or("no content type")))
        .expect(Assertion::status_in(&[200, 201, 400, 415]))
    });

    let boundary_steps = BOUNDARY_USER_IDS.iter().map(|user_id| {
        let post = json!({"title": "Boundary Test", "body": "Testing extreme values", "userId": user_id});
        Step::new(api.create_post(&post))
            .named(format!("userId {user_id}"))
            .expect(Assertion::status_in(&[200, 201, 400, 422]))
    });

    let length_steps = TITLE_LENGTHS.iter().map(|len| {
        let post = json!({"title": "a".repeat(*len), "body": "Test body", "userId": 1});
        Step::new(api.create_post(&post))
            .named(format!("title of {len} characters"))
            .expect(Assertion::status_in(&[200, 201, 400, 413]))
    });

    let special_steps = SPECIAL_BODIES.iter().map(|(label, content)| {
        let post = json!({
            "title": format!("Special Chars Test: {label}"),
            "body": content,
            "userId": 1,
        });
        Step::new(api.create_post(&post))
            .named(*label)
            .expect(Assertion::status_in(&[200, 201, 400]))
            .tolerating_transport_errors()
    });

    let stress_post = json!({"title": "Stress", "body": "Test", "userId": 1});
    let concurrent_post = json!({"title": "Concurrent Test Post", "body": "Created concurrently", "userId": 1});
    let created = || Assertion::status_in(&[200, 201]);

    CheckGroup::new(4, "Error Handling & Edge Cases", Target::JsonPlaceholder)
        .case(
            CheckCase::new("4.1", "Not found")
                .described("Missing resources and endpoints answer 404 quickly")
                .steps(missing_steps),
        )
        .case(
            CheckCase::new("4.2", "Unusual methods")
                .described("PATCH on a collection, HEAD, OPTIONS and TRACE are answered sensibly")
                .steps(method_steps),
        )
        .case(
            CheckCase::new("4.3", "Malformed requests")
                .described("Broken JSON and missing or wrong content types are handled")
                .steps(malformed_steps)
                .steps(content_type_steps),
        )
        .case(
            CheckCase::new("4.4", "Boundary values")
                .described("Extreme user ids and title lengths are accepted or rejected cleanly")
                .steps(boundary_steps)
                .steps(length_steps),
        )
        .case(
            CheckCase::new("4.5", "Special characters")
                .described("Unicode, markup, quotes and control characters survive a round trip")
                .steps(special_steps),
        )
        .case(
            CheckCase::new("4.6", "Rapid and concurrent requests")
                .described("Bursts, parallel creates and mixed operations succeed")
                .step(
                    Step::new(api.get_post(1))
                        .named("10 rapid requests")
                        .expect(Assertion::status(200))
                        .under_load(LoadProfile::sequential(10).with_min_success_rate(0.8)),
                )
                .step(
                    Step::new(api.create_post(&concurrent_post))
                        .named("5 concurrent creates")
                        .expect(created())
                        .under_load(LoadProfile::concurrent(5, 5).with_min_success_rate(0.6)),
                )
                .steps([
                    Step::new(api.get_all_posts()).expect(created()),
                    Step::new(api.get_post(1)).expect(created()),
                    Step::new(api.create_post(&stress_post)).expect(created()),
                    Step::new(api.get_users()).expect(created()),
                    Step::new(api.get_comments_by_post(1)).expect(created()),
                ]),
        )
}
